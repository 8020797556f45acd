//! Terminal states of a generation attempt and batch progress.

use promptcanvas_error::ClientErrorKind;
use std::time::{Duration, Instant};

/// A required generation input that was blank after trimming.
///
/// The display text is what lands in the Response card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationFailure {
    /// LLM card missing or its host blank
    #[display(
        "Error: No host specified. Enter the address of your Ollama server in the LLM card."
    )]
    MissingHost,
    /// LLM card model blank
    #[display("Error: No model specified. Enter a model name in the LLM card.")]
    MissingModel,
    /// Every prompt card muted or empty
    #[display("Error: The prompt is empty. Add text to at least one unmuted prompt card.")]
    EmptyPrompt,
}

/// How a call to `generate_response` ended.
///
/// Every variant except [`GenerationOutcome::StackMissing`] has written text
/// into the stack's Response card. A stack removed while its request was in
/// flight reports `StackMissing`, whatever the client answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model answered
    Completed {
        /// Wall-clock time from start of the attempt to the answer
        elapsed: Duration,
    },
    /// A required input was blank; the client was never called
    Invalid(ValidationFailure),
    /// The reachability probe failed; `generate` was never called
    Unreachable {
        /// Host that was probed
        host: String,
    },
    /// The generate call failed
    Failed(ClientErrorKind),
    /// The stack did not exist when the attempt started, or was removed before
    /// the result could be written
    StackMissing,
}

impl GenerationOutcome {
    /// True only for [`GenerationOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Text written for a failed probe.
pub fn unreachable_message(host: &str) -> String {
    format!(
        "Error: Cannot connect to the server at {host}. Make sure it is running and accessible."
    )
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
pub fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Snapshot of the all-stacks generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchProgress {
    /// Whether a batch is running
    pub is_generating: bool,
    /// Time since the running batch started, or the last batch's total
    pub elapsed: Duration,
}

/// Clock behind [`BatchProgress`]. Overlapping batches share one run.
#[derive(Debug, Default)]
pub(crate) struct BatchClock {
    active: usize,
    started_at: Option<Instant>,
    last_elapsed: Duration,
}

impl BatchClock {
    pub(crate) fn start(&mut self) {
        if self.active == 0 {
            self.started_at = Some(Instant::now());
            self.last_elapsed = Duration::ZERO;
        }
        self.active += 1;
    }

    /// Returns the batch's total once the last overlapping batch stops.
    pub(crate) fn stop(&mut self) -> Option<Duration> {
        self.active = self.active.saturating_sub(1);
        if self.active > 0 {
            return None;
        }
        let started_at = self.started_at.take()?;
        self.last_elapsed = started_at.elapsed();
        Some(self.last_elapsed)
    }

    pub(crate) fn progress(&self) -> BatchProgress {
        match self.started_at {
            Some(started_at) => BatchProgress {
                is_generating: true,
                elapsed: started_at.elapsed(),
            },
            None => BatchProgress {
                is_generating: false,
                elapsed: self.last_elapsed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_missing_field() {
        assert!(ValidationFailure::MissingHost.to_string().contains("host"));
        assert!(ValidationFailure::MissingModel.to_string().contains("model"));
        assert!(ValidationFailure::EmptyPrompt.to_string().contains("prompt"));
        assert!(ValidationFailure::MissingHost.to_string().starts_with("Error: "));
    }

    #[test]
    fn test_unreachable_message_mentions_host() {
        let message = unreachable_message("localhost:11434");
        assert!(message.contains("localhost:11434"));
        assert!(message.contains("running and accessible"));
    }

    #[test]
    fn test_elapsed_millis_saturates() {
        assert_eq!(elapsed_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_clock_idle_by_default() {
        let clock = BatchClock::default();
        assert_eq!(clock.progress(), BatchProgress::default());
    }

    #[test]
    fn test_clock_keeps_last_elapsed() {
        let mut clock = BatchClock::default();
        clock.start();
        assert!(clock.progress().is_generating);
        std::thread::sleep(Duration::from_millis(5));
        let total = clock.stop().unwrap();

        let progress = clock.progress();
        assert!(!progress.is_generating);
        assert_eq!(progress.elapsed, total);
        assert!(total >= Duration::from_millis(5));
    }

    #[test]
    fn test_clock_overlapping_batches() {
        let mut clock = BatchClock::default();
        clock.start();
        clock.start();
        assert_eq!(clock.stop(), None);
        assert!(clock.progress().is_generating);
        assert!(clock.stop().is_some());
        assert!(!clock.progress().is_generating);
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let mut clock = BatchClock::default();
        assert_eq!(clock.stop(), None);
        assert!(!clock.progress().is_generating);
    }
}
