use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};

use chirp_core::fetch::{FetchOutcome, FetchTask};
use chirp_core::post_view::{ClickTarget, ItemEffect};
use chirp_core::schedule::Debouncer;
use chirp_core::screen::{BookmarksScreen, ExploreScreen, HomeScreen, ProfileScreen, Screen, ScreenKind, SearchSettled};
use chirp_core::{Action, Profile, Store};

use crate::command::Command;
use crate::config::Config;

/// The store and the four screens, routing commands and fetch outcomes.
pub struct App {
    store: Store,
    current: ScreenKind,
    home: HomeScreen,
    explore: ExploreScreen,
    bookmarks: BookmarksScreen,
    profile: ProfileScreen,
    own: Profile,
    page_size: u32,
}

impl App {
    pub fn new(config: &Config, debouncer: Debouncer<SearchSettled>) -> Self {
        Self {
            store: Store::new(),
            current: ScreenKind::Home,
            home: HomeScreen::new(config.page_size, config.profile.clone(), debouncer),
            explore: ExploreScreen::new(config.page_size),
            bookmarks: BookmarksScreen::new(),
            profile: ProfileScreen::new(config.page_size, config.profile.clone(), None),
            own: config.profile.clone(),
            page_size: config.page_size,
        }
    }

    pub fn current(&self) -> ScreenKind {
        self.current
    }

    /// Mount the home feed.
    pub fn start(&mut self) -> Vec<FetchTask> {
        self.switch(ScreenKind::Home)
    }

    pub fn handle(&mut self, command: Command, now: DateTime<Utc>) -> Result<Vec<FetchTask>> {
        let tasks = match command {
            Command::Home => self.switch(ScreenKind::Home),
            Command::Explore => self.switch(ScreenKind::Explore),
            Command::Bookmarks => self.switch(ScreenKind::Bookmarks),
            Command::Profile(username) => self.open_profile(username),
            Command::Search(text) => {
                let mut tasks = self.switch(ScreenKind::Home);
                tasks.extend(self.home.set_search_text(&mut self.store, &text));
                tasks
            }
            Command::Tag(tag) => {
                let mut tasks = self.switch(ScreenKind::Explore);
                tasks.push(self.explore.toggle_tag(&tag));
                tasks
            }
            Command::ClearTags => {
                let mut tasks = self.switch(ScreenKind::Explore);
                tasks.extend(self.explore.clear_tags());
                tasks
            }
            Command::More => {
                let (screen, store) = self.active();
                let last = screen.posts(store).last().map(|post| post.id.clone());
                last.and_then(|id| screen.on_item_visible(&id)).into_iter().collect()
            }
            Command::Retry => self.active().0.retry().into_iter().collect(),
            Command::Select(position) => {
                self.click(position, ClickTarget::Body)?;
                Vec::new()
            }
            Command::Like(position) => {
                self.click(position, ClickTarget::Like)?;
                Vec::new()
            }
            Command::Bookmark(position) => {
                self.click(position, ClickTarget::Bookmark)?;
                Vec::new()
            }
            Command::Author(position) => match self.click(position, ClickTarget::Author)? {
                ItemEffect::OpenProfile(username) => self.open_profile(Some(username)),
                _ => Vec::new(),
            },
            Command::Post(text) => {
                let mut tasks = self.switch(ScreenKind::Home);
                tasks.push(self.home.compose(&text, now)?);
                tasks
            }
            Command::Delete(position) => {
                if self.current != ScreenKind::Home {
                    bail!("Posts can only be removed from the home feed");
                }
                let id = position
                    .checked_sub(1)
                    .and_then(|index| self.home.posts(&self.store).get(index))
                    .map(|post| post.id.clone())
                    .ok_or_else(|| anyhow!("No post at position {}", position))?;
                self.store.dispatch(Action::DeletePost(id));
                Vec::new()
            }
            Command::Help | Command::Quit => Vec::new(),
        };
        Ok(tasks)
    }

    pub fn on_search_settled(&mut self, settled: SearchSettled) -> Vec<FetchTask> {
        self.home.on_search_settled(settled).into_iter().collect()
    }

    /// Hand an outcome to the screen that issued it. Returns false when it was dropped.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let (screen, store) = self.parts(outcome.screen());
        screen.apply(store, outcome)
    }

    /// Re-attach every visibility sensor after the lists changed.
    pub fn sync(&mut self) {
        self.home.sync(&self.store);
        self.explore.sync(&self.store);
        self.bookmarks.sync(&self.store);
        self.profile.sync(&self.store);
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.home.take_alert()
    }

    pub fn render(&self) -> String {
        let screen: &dyn Screen = match self.current {
            ScreenKind::Home => &self.home,
            ScreenKind::Explore => &self.explore,
            ScreenKind::Bookmarks => &self.bookmarks,
            ScreenKind::Profile => &self.profile,
        };
        screen.render(&self.store).to_string()
    }

    fn switch(&mut self, kind: ScreenKind) -> Vec<FetchTask> {
        if self.current != kind {
            tracing::info!("Switched from {} to {}", self.current, kind);
            self.current = kind;
        }
        let (screen, store) = self.active();
        screen.mount(store)
    }

    fn open_profile(&mut self, username: Option<String>) -> Vec<FetchTask> {
        let username = username.filter(|username| *username != self.own.username);
        self.profile = ProfileScreen::new(self.page_size, self.own.clone(), username);
        self.switch(ScreenKind::Profile)
    }

    fn click(&mut self, position: usize, target: ClickTarget) -> Result<ItemEffect> {
        let (screen, store) = self.active();
        position
            .checked_sub(1)
            .and_then(|index| screen.click(store, index, target))
            .ok_or_else(|| anyhow!("No post at position {}", position))
    }

    fn active(&mut self) -> (&mut dyn Screen, &mut Store) {
        self.parts(self.current)
    }

    fn parts(&mut self, kind: ScreenKind) -> (&mut dyn Screen, &mut Store) {
        let screen: &mut dyn Screen = match kind {
            ScreenKind::Home => &mut self.home,
            ScreenKind::Explore => &mut self.explore,
            ScreenKind::Bookmarks => &mut self.bookmarks,
            ScreenKind::Profile => &mut self.profile,
        };
        (screen, &mut self.store)
    }
}

#[cfg(test)]
mod test;
