//! git::status
//!
//! Per-file status labels.
//!
//! libgit2 reports a file's status as a bitmask. Here it is unpacked into
//! [`StatusFlags`], named booleans, and mapped onto [`StatusLabel`]s in a
//! fixed order. The mapping is a pure function of the flags.

use serde::Serialize;

/// Human-readable status of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    #[serde(rename = "Current")]
    Current,
    #[serde(rename = "Conflicted")]
    Conflicted,
    #[serde(rename = "Ignored")]
    Ignored,
    #[serde(rename = "Index deleted")]
    IndexDeleted,
    #[serde(rename = "Index modified")]
    IndexModified,
    #[serde(rename = "New Index")]
    IndexNew,
    #[serde(rename = "Working tree deleted")]
    WorkTreeDeleted,
    #[serde(rename = "Working tree modified")]
    WorkTreeModified,
    #[serde(rename = "New working tree")]
    WorkTreeNew,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Current => "Current",
            StatusLabel::Conflicted => "Conflicted",
            StatusLabel::Ignored => "Ignored",
            StatusLabel::IndexDeleted => "Index deleted",
            StatusLabel::IndexModified => "Index modified",
            StatusLabel::IndexNew => "New Index",
            StatusLabel::WorkTreeDeleted => "Working tree deleted",
            StatusLabel::WorkTreeModified => "Working tree modified",
            StatusLabel::WorkTreeNew => "New working tree",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one file as named flags.
///
/// `current` is set only for an entirely clean status. Renames, type
/// changes and unreadable files have no flag of their own, so such an
/// entry has every field false and no labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub current: bool,
    pub conflicted: bool,
    pub ignored: bool,
    pub index_deleted: bool,
    pub index_modified: bool,
    pub index_new: bool,
    pub wt_deleted: bool,
    pub wt_modified: bool,
    pub wt_new: bool,
}

impl StatusFlags {
    /// Every flag set.
    pub fn all() -> Self {
        Self {
            current: false,
            conflicted: true,
            ignored: true,
            index_deleted: true,
            index_modified: true,
            index_new: true,
            wt_deleted: true,
            wt_modified: true,
            wt_new: true,
        }
    }

    /// Unchanged and tracked.
    pub fn current() -> Self {
        Self {
            current: true,
            ..Self::default()
        }
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    /// Labels in check order: current, conflicted, ignored, index
    /// deleted/modified/new, working tree deleted/modified/new.
    pub fn labels(&self) -> Vec<StatusLabel> {
        if self.is_current() {
            return vec![StatusLabel::Current];
        }

        [
            (self.conflicted, StatusLabel::Conflicted),
            (self.ignored, StatusLabel::Ignored),
            (self.index_deleted, StatusLabel::IndexDeleted),
            (self.index_modified, StatusLabel::IndexModified),
            (self.index_new, StatusLabel::IndexNew),
            (self.wt_deleted, StatusLabel::WorkTreeDeleted),
            (self.wt_modified, StatusLabel::WorkTreeModified),
            (self.wt_new, StatusLabel::WorkTreeNew),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

impl From<git2::Status> for StatusFlags {
    fn from(status: git2::Status) -> Self {
        Self {
            current: status.is_empty(),
            conflicted: status.is_conflicted(),
            ignored: status.is_ignored(),
            index_deleted: status.is_index_deleted(),
            index_modified: status.is_index_modified(),
            index_new: status.is_index_new(),
            wt_deleted: status.is_wt_deleted(),
            wt_modified: status.is_wt_modified(),
            wt_new: status.is_wt_new(),
        }
    }
}

/// Status of one path in the working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub path: String,
    pub labels: Vec<StatusLabel>,
}

impl StatusEntry {
    pub fn new(path: impl Into<String>, flags: StatusFlags) -> Self {
        Self {
            path: path.into(),
            labels: flags.labels(),
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.labels.contains(&StatusLabel::Ignored)
    }
}
