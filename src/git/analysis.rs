//! git::analysis
//!
//! Merge analysis classification.

/// How a target commit relates to HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAnalysis {
    /// Target is already reachable from HEAD.
    UpToDate,
    /// HEAD can be advanced to the target.
    FastForward,
    /// Histories diverged; a three-way merge is needed.
    Normal,
    /// HEAD has no commit yet.
    Unborn,
    /// The engine reported nothing recognizable.
    Unknown,
}

impl MergeAnalysis {
    /// Classify engine flags, checking up-to-date, fast-forward, normal,
    /// then unborn.
    ///
    /// libgit2 reports an unborn HEAD as fast-forward *and* unborn, which
    /// classifies as [`MergeAnalysis::FastForward`].
    pub fn classify(flags: git2::MergeAnalysis) -> Self {
        if flags.is_up_to_date() {
            MergeAnalysis::UpToDate
        } else if flags.is_fast_forward() {
            MergeAnalysis::FastForward
        } else if flags.is_normal() {
            MergeAnalysis::Normal
        } else if flags.is_unborn() {
            MergeAnalysis::Unborn
        } else {
            MergeAnalysis::Unknown
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MergeAnalysis::UpToDate => "up-to-date",
            MergeAnalysis::FastForward => "fast-forward",
            MergeAnalysis::Normal => "normal",
            MergeAnalysis::Unborn => "unborn",
            MergeAnalysis::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MergeAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
