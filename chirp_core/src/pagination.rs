// Page/limit pagination state of one screen.
//
// Idle -> Loading -> Success | Error, Success loops back through Loading for the next
// page until the source is exhausted. Every reset starts a new generation and only the
// response to the current (generation, page) request is accepted.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Generations are unique across all controllers, so a response can never be
/// mistaken for one issued by a screen that was replaced in the meantime.
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Success,
    Error(String),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    generation: u64,
    state: LoadState,
    has_more: bool,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            generation: next_generation(),
            state: LoadState::Idle,
            has_more: true,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Mount trigger. Loads the first page unless something is loaded or loading already.
    pub fn start(&mut self) -> Option<PageRequest> {
        match self.state {
            LoadState::Idle => Some(self.begin()),
            _ => None,
        }
    }

    /// Filter or query change: back to page 1 under a new generation.
    pub fn reset(&mut self) -> PageRequest {
        self.page = 1;
        self.has_more = true;
        self.generation = next_generation();
        self.state = LoadState::Idle;
        tracing::debug!("Pagination reset, generation {}", self.generation);
        self.begin()
    }

    /// The last item became visible. After a success this moves on to the next page,
    /// after a failure it retries the failed one.
    pub fn advance(&mut self) -> Option<PageRequest> {
        match self.state {
            LoadState::Idle => Some(self.begin()),
            LoadState::Success if self.has_more => {
                self.page += 1;
                Some(self.begin())
            }
            LoadState::Error(_) => Some(self.begin()),
            _ => None,
        }
    }

    /// Explicit retry of the failed page.
    pub fn retry(&mut self) -> Option<PageRequest> {
        match self.state {
            LoadState::Error(_) => Some(self.begin()),
            _ => None,
        }
    }

    pub fn is_current(&self, request: &PageRequest) -> bool {
        self.state == LoadState::Loading && request.generation == self.generation && request.page == self.page
    }

    /// Record a successful fetch. Returns false and changes nothing when the request is stale.
    pub fn succeed(&mut self, request: &PageRequest, fetched: usize, total_count: Option<u64>) -> bool {
        if !self.is_current(request) {
            tracing::debug!("Dropped stale page {} of generation {}", request.page, request.generation);
            return false;
        }
        self.has_more = has_more(request.page, request.page_size, fetched, total_count);
        self.state = if self.has_more {
            LoadState::Success
        } else {
            LoadState::Exhausted
        };
        true
    }

    /// Record a failed fetch. Returns false and changes nothing when the request is stale.
    pub fn fail(&mut self, request: &PageRequest, message: impl Into<String>) -> bool {
        if !self.is_current(request) {
            tracing::debug!("Dropped stale failure of page {}", request.page);
            return false;
        }
        self.state = LoadState::Error(message.into());
        true
    }

    fn begin(&mut self) -> PageRequest {
        self.state = LoadState::Loading;
        PageRequest {
            page: self.page,
            page_size: self.page_size,
            generation: self.generation,
        }
    }
}

/// With a known total, more pages remain while `page * page_size < total`.
/// Without one, a full page suggests there is more.
pub fn has_more(page: u32, page_size: u32, fetched: usize, total_count: Option<u64>) -> bool {
    match total_count {
        Some(total) => (page as u64) * (page_size as u64) < total,
        None => fetched == page_size as usize,
    }
}
