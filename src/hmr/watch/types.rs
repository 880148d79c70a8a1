use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Debounced changes that affect the route set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Route files, sorted by path.
    pub routes: Vec<(PathBuf, ChangeKind)>,
    /// The external metadata source changed.
    pub metadata: bool,
    /// The routes directory was re-attached; rediscover everything.
    pub rescan: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && !self.metadata && !self.rescan
    }
}
