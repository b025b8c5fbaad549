use engine_logging::{engine_error, engine_warn};
use tokio_util::sync::CancellationToken;

/// Exit status for a run stopped by a second interrupt.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Let the lesson in flight finish, then stop.
    Drain,
    /// Leave now. Artifacts and progress are written atomically and partial
    /// downloads live in temp files, so nothing half-written is left behind.
    Exit,
}

/// First interrupt cancels the run gracefully; any later one exits.
pub fn on_interrupt(cancel: &CancellationToken) -> InterruptAction {
    if cancel.is_cancelled() {
        InterruptAction::Exit
    } else {
        cancel.cancel();
        InterruptAction::Drain
    }
}

/// Listens for Ctrl-C for the lifetime of the process.
pub fn spawn_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                engine_error!("Cannot listen for interrupts: {}", err);
                return;
            }
            match on_interrupt(&cancel) {
                InterruptAction::Drain => engine_warn!(
                    "Interrupt received, stopping after the current lesson (press Ctrl-C again to quit now)"
                ),
                InterruptAction::Exit => {
                    engine_warn!("Second interrupt, exiting");
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    });
}
