use bridge_types::ExitEventId;

/// The set of exit ids that were honored. It only ever grows.
pub trait ProcessedExitsRegistry: Send + Sync {
    /// Mark the id processed. Returns false, changing nothing, if it already was. The check and
    /// the insert are one atomic step for the given id.
    fn try_mark_processed(&self, id: ExitEventId) -> bool;

    fn is_processed(&self, id: ExitEventId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registry owned by this process. Inserts of different ids do not contend.
#[derive(Default)]
pub struct LocalProcessedExits {
    ids: scc::HashSet<ExitEventId>,
}

impl LocalProcessedExits {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessedExitsRegistry for LocalProcessedExits {
    fn try_mark_processed(&self, id: ExitEventId) -> bool {
        self.ids.insert(id).is_ok()
    }

    fn is_processed(&self, id: ExitEventId) -> bool {
        self.ids.contains(&id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
