use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use course_core::{ProgressLedger, UnitId};
use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::config::Clock;
use crate::persist::{write_atomic, PersistError};

/// The progress ledger bound to its JSON file.
///
/// Mutations that change something are flushed immediately, stamped with the
/// clock's current time.
pub struct LedgerStore {
    path: PathBuf,
    ledger: ProgressLedger,
    clock: Clock,
}

impl LedgerStore {
    /// Reads `path`; a missing or unreadable file starts an empty ledger.
    pub fn load(path: impl Into<PathBuf>, clock: Clock) -> Self {
        let path = path.into();
        let ledger = read_ledger(&path);
        Self {
            path,
            ledger,
            clock,
        }
    }

    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    pub fn is_completed(&self, slug: &str, module_id: &UnitId, lesson_id: &UnitId) -> bool {
        self.ledger.is_completed(slug, module_id, lesson_id)
    }

    pub fn is_module_completed(&self, slug: &str, module_id: &UnitId) -> bool {
        self.ledger.is_module_completed(slug, module_id)
    }

    pub fn mark_completed(
        &mut self,
        slug: &str,
        title: &str,
        module_id: &UnitId,
        lesson_id: &UnitId,
    ) -> Result<bool, PersistError> {
        let changed = self.ledger.mark_completed(slug, title, module_id, lesson_id);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    pub fn mark_module_completed(
        &mut self,
        slug: &str,
        title: &str,
        module_id: &UnitId,
    ) -> Result<bool, PersistError> {
        let changed = self.ledger.mark_module_completed(slug, title, module_id);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    fn save(&mut self) -> Result<(), PersistError> {
        self.ledger.stamp((self.clock)());
        let json = serde_json::to_string_pretty(&self.ledger)?;
        write_atomic(&self.path, &json)?;
        engine_debug!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

fn read_ledger(path: &Path) -> ProgressLedger {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            engine_info!("No progress file at {}, starting fresh", path.display());
            return ProgressLedger::new();
        }
        Err(err) => {
            engine_warn!("Cannot read progress file {}: {}", path.display(), err);
            return ProgressLedger::new();
        }
    };
    match serde_json::from_str::<ProgressLedger>(&raw) {
        Ok(ledger) => {
            engine_info!(
                "Loaded progress from {} ({} lessons completed)",
                path.display(),
                ledger.completed_lesson_count()
            );
            ledger
        }
        Err(err) => {
            engine_warn!(
                "Progress file {} is corrupt ({}), starting fresh",
                path.display(),
                err
            );
            ProgressLedger::new()
        }
    }
}
