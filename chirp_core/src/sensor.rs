use crate::model::PostId;

/// Watches the last rendered item of a list and fires once it becomes visible.
///
/// The sensor is rebuilt whenever `loading` or `has_more` change. A rebuilt sensor
/// observes nothing until the screen attaches the current last item again.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySensor {
    observed: Option<PostId>,
    armed: bool,
    loading: bool,
    has_more: bool,
}

impl VisibilitySensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down and recreate the sensor if its inputs changed.
    pub fn update(&mut self, loading: bool, has_more: bool) {
        if self.loading == loading && self.has_more == has_more && self.armed == (!loading && has_more) {
            return;
        }
        self.loading = loading;
        self.has_more = has_more;
        self.observed = None;
        self.armed = !loading && has_more;
    }

    /// Attach to the last rendered item, replacing the previous one.
    /// Nothing is observed while a page is loading.
    pub fn observe(&mut self, last: Option<&str>) {
        if self.loading {
            self.observed = None;
            return;
        }
        self.observed = last.map(str::to_string);
    }

    pub fn observed(&self) -> Option<&str> {
        self.observed.as_deref()
    }

    /// Returns true when `id` is the observed item and the sensor may trigger a fetch.
    pub fn notify_visible(&mut self, id: &str) -> bool {
        if !self.armed || self.observed.as_deref() != Some(id) {
            return false;
        }
        // One trigger per sensor instance. The next state change rebuilds it.
        self.armed = false;
        true
    }
}
