/// What to do with one lesson unit before any network traffic happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAction {
    /// The artifact is on disk. `repair_ledger` is set when the ledger is
    /// behind the filesystem and needs the completed marker added.
    Skip { repair_ledger: bool },
    /// The ledger says completed but the artifact is gone.
    Refetch,
    /// Nothing recorded anywhere.
    Fetch,
}

/// Single reconciliation point between the filesystem and the ledger.
///
/// The filesystem decides whether work is still needed; the ledger is only
/// consulted to tell a first download from a repair.
pub fn reconcile(artifact_exists: bool, ledger_completed: bool) -> LessonAction {
    match (artifact_exists, ledger_completed) {
        (true, completed) => LessonAction::Skip {
            repair_ledger: !completed,
        },
        (false, true) => LessonAction::Refetch,
        (false, false) => LessonAction::Fetch,
    }
}
