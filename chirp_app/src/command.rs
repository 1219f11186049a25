use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const HELP: &str = "\
Commands:
  home | explore | bookmarks     switch screen
  profile [user]                 show your profile or the one of user
  search [text]                  search the home feed, empty text clears
  tag <tag> | clear-tags         toggle a tag filter on explore
  more                           scroll to the end of the list
  retry                          retry the failed load
  select <n>                     expand or collapse the comments of post n
  like <n> | bookmark <n>        toggle like or bookmark of post n
  author <n>                     open the profile of the author of post n
  post <text>                    publish a post
  delete <n>                     remove post n from the home feed
  help | quit";

/// One line typed by the user. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    Explore,
    Bookmarks,
    Profile(Option<String>),
    Search(String),
    Tag(String),
    ClearTags,
    More,
    Retry,
    Select(usize),
    Like(usize),
    Bookmark(usize),
    Author(usize),
    Post(String),
    Delete(usize),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "home" => Command::Home,
            "explore" => Command::Explore,
            "bookmarks" => Command::Bookmarks,
            "profile" => Command::Profile(if rest.is_empty() {
                None
            } else {
                Some(rest.trim_start_matches('@').to_string())
            }),
            "search" => Command::Search(rest.to_string()),
            "tag" => {
                if rest.is_empty() {
                    bail!("Usage: tag <tag>");
                }
                if rest.starts_with('#') {
                    Command::Tag(rest.to_string())
                } else {
                    Command::Tag(format!("#{}", rest))
                }
            }
            "clear-tags" => Command::ClearTags,
            "more" => Command::More,
            "retry" => Command::Retry,
            "select" => Command::Select(position(rest)?),
            "like" => Command::Like(position(rest)?),
            "bookmark" => Command::Bookmark(position(rest)?),
            "author" => Command::Author(position(rest)?),
            "post" => {
                if rest.is_empty() {
                    bail!("Usage: post <text>");
                }
                Command::Post(rest.to_string())
            }
            "delete" => Command::Delete(position(rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => bail!("Empty command"),
            other => bail!("Unknown command {:?}, type help for the list", other),
        };
        Ok(command)
    }
}

fn position(arg: &str) -> Result<usize> {
    let n: usize = arg
        .parse()
        .with_context(|| format!("Expected a post position, got {:?}", arg))?;
    if n == 0 {
        bail!("Post positions start at 1");
    }
    Ok(n)
}
