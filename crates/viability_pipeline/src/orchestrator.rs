//! Debounced background recomputation.
//!
//! Interactive callers submit a fresh input document on every edit. The
//! orchestrator coalesces bursts of submissions (last edit wins), runs
//! the pipeline on a worker thread, and publishes results by atomic
//! replacement: readers always see either the previous complete result
//! set or the new one, never a partial state. A submission arriving
//! while a run is in flight bumps the generation counter, which the
//! pipeline polls to abort the stale run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use crate::compute::compute_with_cancel;
use crate::error::EngineError;
use crate::input::EngineInput;
use crate::output::EngineOutput;

/// Default debounce window between an edit and the recompute it triggers.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

enum Command {
    Submit(EngineInput),
    Shutdown,
}

type Published = Arc<RwLock<Option<Arc<EngineOutput>>>>;

/// Debounced analysis scheduler.
///
/// Dropping the orchestrator shuts the worker down and joins it; a run
/// in flight at that point is abandoned.
pub struct Orchestrator {
    tx: mpsc::Sender<Command>,
    generation: Arc<AtomicU64>,
    published: Published,
    worker: Option<JoinHandle<()>>,
}

impl Orchestrator {
    /// Create an orchestrator with the default debounce window.
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE_WINDOW)
    }

    /// Create an orchestrator with a custom debounce window.
    pub fn with_debounce(window: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let generation = Arc::new(AtomicU64::new(0));
        let published: Published = Arc::new(RwLock::new(None));

        let worker_generation = Arc::clone(&generation);
        let worker_published = Arc::clone(&published);
        let worker = thread::spawn(move || {
            worker_loop(rx, window, worker_generation, worker_published);
        });

        Self {
            tx,
            generation,
            published,
            worker: Some(worker),
        }
    }

    /// Submit a new input document.
    ///
    /// Never blocks on the pipeline. Supersedes any run in flight and
    /// restarts the debounce window; only the last document of a burst
    /// is computed.
    pub fn submit(&self, input: EngineInput) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        // Send can only fail after shutdown, when no one is listening
        // anyway.
        let _ = self.tx.send(Command::Submit(input));
    }

    /// The most recently published result set, if any run has completed.
    pub fn latest(&self) -> Option<Arc<EngineOutput>> {
        self.published.read().ok().and_then(|guard| guard.clone())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    rx: mpsc::Receiver<Command>,
    window: Duration,
    generation: Arc<AtomicU64>,
    published: Published,
) {
    loop {
        let mut pending = match rx.recv() {
            Ok(Command::Submit(input)) => input,
            Ok(Command::Shutdown) | Err(_) => return,
        };

        // Debounce: keep absorbing newer documents until the window
        // elapses with no further edits.
        loop {
            match rx.recv_timeout(window) {
                Ok(Command::Submit(input)) => pending = input,
                Ok(Command::Shutdown) => return,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        let run_generation = generation.load(Ordering::SeqCst);
        let cancelled = || generation.load(Ordering::SeqCst) != run_generation;

        match compute_with_cancel(&pending, &cancelled) {
            Ok(output) => {
                // Re-check before publishing: a newer submission may have
                // arrived in the gap after the last pipeline poll.
                if cancelled() {
                    debug!("discarding superseded result");
                    continue;
                }
                if let Ok(mut guard) = published.write() {
                    *guard = Some(Arc::new(output));
                }
            }
            Err(EngineError::Superseded) => {
                debug!("run superseded mid-flight");
            }
            Err(err) => {
                // Keep the previous publication; a broken edit must not
                // blank the dashboard.
                warn!(%err, "analysis failed, keeping previous result");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ClubProfile;
    use serde_json::json;
    use std::time::Instant;

    fn input_with_fields(num_fields: u32) -> EngineInput {
        let mut input = EngineInput {
            club: ClubProfile {
                name: None,
                num_fields,
                members: 0,
            },
            ..EngineInput::default()
        };
        input
            .revenues
            .categories
            .insert("membership".into(), json!(40_000));
        input
            .costs
            .categories
            .insert("personnel".into(), json!(20_000));
        input
    }

    fn wait_for<F: Fn() -> bool>(predicate: F, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if predicate() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_submit_publishes_after_debounce() {
        let orchestrator = Orchestrator::with_debounce(Duration::from_millis(20));
        assert!(orchestrator.latest().is_none());

        orchestrator.submit(input_with_fields(2));
        assert!(wait_for(
            || orchestrator.latest().is_some(),
            Duration::from_secs(5)
        ));
        let output = orchestrator.latest().unwrap();
        assert_eq!(output.investment.total, 435_000.0);
    }

    #[test]
    fn test_burst_of_edits_computes_last_only() {
        let orchestrator = Orchestrator::with_debounce(Duration::from_millis(50));

        // Three rapid edits; only the 4-field document should land.
        orchestrator.submit(input_with_fields(1));
        orchestrator.submit(input_with_fields(2));
        orchestrator.submit(input_with_fields(4));

        assert!(wait_for(
            || orchestrator.latest().is_some(),
            Duration::from_secs(5)
        ));
        let output = orchestrator.latest().unwrap();
        // 4 × (120k + 25k) + 145k fixed.
        assert_eq!(output.investment.total, 725_000.0);
    }

    #[test]
    fn test_failed_run_keeps_previous_publication() {
        let orchestrator = Orchestrator::with_debounce(Duration::from_millis(20));

        orchestrator.submit(input_with_fields(2));
        assert!(wait_for(
            || orchestrator.latest().is_some(),
            Duration::from_secs(5)
        ));
        let before = orchestrator.latest().unwrap();

        // Structurally invalid edit: zero fields.
        orchestrator.submit(input_with_fields(0));
        thread::sleep(Duration::from_millis(300));

        let after = orchestrator.latest().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_newer_submission_supersedes_and_wins() {
        let orchestrator = Orchestrator::with_debounce(Duration::from_millis(20));

        let mut slow = input_with_fields(2);
        slow.options.monte_carlo = true;
        slow.options.iterations = Some(500_000);
        slow.options.seed = Some(1);
        orchestrator.submit(slow);

        // Give the slow run time to start, then replace it.
        thread::sleep(Duration::from_millis(60));
        orchestrator.submit(input_with_fields(3));

        assert!(wait_for(
            || orchestrator
                .latest()
                .map(|o| o.investment.total == 580_000.0)
                .unwrap_or(false),
            Duration::from_secs(10)
        ));
        // The superseded run must not have published its Monte Carlo.
        assert!(orchestrator.latest().unwrap().monte_carlo.is_none());
    }

    #[test]
    fn test_drop_joins_worker() {
        let orchestrator = Orchestrator::with_debounce(Duration::from_millis(20));
        orchestrator.submit(input_with_fields(2));
        drop(orchestrator);
    }
}
