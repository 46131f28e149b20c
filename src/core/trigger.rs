//! Glue between an editable input, a renderer and a display.
//!
//! Each trigger reads the whole input, renders it and replaces the display.
//! Renders are never coalesced or retried. Every dispatch gets a sequence
//! number, and a result is only shown if no later-dispatched result has been
//! shown already, so a slow render cannot overwrite a newer one.

use crate::domain::ports::{InputSource, MarkupRenderer, OutputSink};
use crate::utils::error::{PlaybookError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A dispatched render waiting for its result.
#[derive(Debug, Clone)]
pub struct PendingRender {
    pub ticket: RenderTicket,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { seq: u64 },
    Failed { seq: u64, message: String },
    /// A later render already reached the display; this result was dropped.
    Superseded { seq: u64 },
}

#[derive(Debug, Default)]
struct SequenceGate {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SequenceGate {
    fn issue(&self) -> RenderTicket {
        RenderTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claims the display for `ticket` if it is the newest result so far,
    /// returning the sequence number it displaced.
    fn claim(&self, ticket: RenderTicket) -> Option<u64> {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        (previous < ticket.0).then_some(previous)
    }

    /// Undoes a claim whose write never reached the display. A newer claim
    /// made in the meantime is left alone.
    fn release(&self, ticket: RenderTicket, previous: u64) {
        let _ = self.applied.compare_exchange(
            ticket.0,
            previous,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

pub struct RenderTrigger<R, I, O> {
    renderer: R,
    input: I,
    output: O,
    gate: SequenceGate,
}

impl<R, I, O> RenderTrigger<R, I, O>
where
    R: MarkupRenderer,
    I: InputSource,
    O: OutputSink,
{
    pub fn new(renderer: R, input: I, output: O) -> Self {
        Self {
            renderer,
            input,
            output,
            gate: SequenceGate::default(),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Reads the input and renders it synchronously.
    ///
    /// Render failures are shown on the output and reported as
    /// [`RenderOutcome::Failed`]; only input or output failures return `Err`.
    pub fn fire(&self) -> Result<RenderOutcome> {
        let pending = self.begin()?;
        let result = self.renderer.render(&pending.input);
        self.complete(pending, result)
    }

    /// Dispatch half of a render whose result arrives later.
    pub fn begin(&self) -> Result<PendingRender> {
        let input = self.input.read_text()?;
        let ticket = self.gate.issue();
        tracing::debug!(seq = ticket.seq(), bytes = input.len(), "Dispatching render");
        Ok(PendingRender { ticket, input })
    }

    pub fn complete(&self, pending: PendingRender, result: Result<String>) -> Result<RenderOutcome> {
        let ticket = pending.ticket;
        let seq = ticket.seq();
        let Some(previous) = self.gate.claim(ticket) else {
            tracing::debug!(seq, "Discarding superseded render");
            return Ok(RenderOutcome::Superseded { seq });
        };

        let (written, outcome) = match result {
            Ok(markup) => {
                tracing::debug!(seq, bytes = markup.len(), "Applying render");
                (self.output.replace(&markup), RenderOutcome::Rendered { seq })
            }
            Err(e) => {
                let message = e.to_string();
                tracing::debug!(seq, error = %message, "Render failed");
                (
                    self.output.show_error(&message),
                    RenderOutcome::Failed { seq, message },
                )
            }
        };

        if let Err(e) = written {
            self.gate.release(ticket, previous);
            return Err(output_failure(e));
        }
        Ok(outcome)
    }
}

fn output_failure(e: PlaybookError) -> PlaybookError {
    match e {
        PlaybookError::OutputError { .. } => e,
        other => PlaybookError::OutputError {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FixedInput(&'static str);

    impl InputSource for FixedInput {
        fn read_text(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Display(RefCell<String>);

    impl OutputSink for Display {
        fn replace(&self, content: &str) -> Result<()> {
            *self.0.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    fn echo(input: &str) -> Result<String> {
        Ok(format!("<svg>{}</svg>", input))
    }

    #[test]
    fn test_tickets_increase_from_one() {
        let gate = SequenceGate::default();
        assert_eq!(gate.issue().seq(), 1);
        assert_eq!(gate.issue().seq(), 2);
    }

    #[test]
    fn test_gate_rejects_older_results() {
        let gate = SequenceGate::default();
        let first = gate.issue();
        let second = gate.issue();
        assert_eq!(gate.claim(second), Some(0));
        assert_eq!(gate.claim(first), None);
    }

    #[test]
    fn test_release_keeps_newer_claims() {
        let gate = SequenceGate::default();
        let first = gate.issue();
        let second = gate.issue();

        let previous = gate.claim(first).unwrap();
        assert_eq!(gate.claim(second), Some(1));
        gate.release(first, previous);
        assert_eq!(gate.claim(first), None);
    }

    #[test]
    fn test_fire_renders_into_output() {
        let trigger = RenderTrigger::new(echo, FixedInput("p1"), Display::default());
        let outcome = trigger.fire().unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered { seq: 1 });
        assert_eq!(*trigger.output().0.borrow(), "<svg>p1</svg>");
    }

    #[test]
    fn test_out_of_order_completion_keeps_newest() {
        let trigger = RenderTrigger::new(echo, FixedInput("x"), Display::default());
        let older = trigger.begin().unwrap();
        let newer = trigger.begin().unwrap();

        let applied = trigger.complete(newer, Ok("new".to_string())).unwrap();
        let dropped = trigger.complete(older, Ok("old".to_string())).unwrap();

        assert_eq!(applied, RenderOutcome::Rendered { seq: 2 });
        assert_eq!(dropped, RenderOutcome::Superseded { seq: 1 });
        assert_eq!(*trigger.output().0.borrow(), "new");
    }

    #[test]
    fn test_superseded_failure_does_not_clobber_output() {
        let trigger = RenderTrigger::new(echo, FixedInput("x"), Display::default());
        let older = trigger.begin().unwrap();
        let newer = trigger.begin().unwrap();
        trigger.complete(newer, Ok("fresh".to_string())).unwrap();

        let late_error = Err(PlaybookError::SemanticError {
            message: "stale".to_string(),
        });
        assert_eq!(
            trigger.complete(older, late_error).unwrap(),
            RenderOutcome::Superseded { seq: 1 }
        );
        assert_eq!(*trigger.output().0.borrow(), "fresh");
    }

    /// Fails the first write, then behaves like [`Display`].
    #[derive(Default)]
    struct FlakyDisplay {
        failed_once: Cell<bool>,
        shown: RefCell<String>,
    }

    impl OutputSink for FlakyDisplay {
        fn replace(&self, content: &str) -> Result<()> {
            if !self.failed_once.replace(true) {
                return Err(PlaybookError::OutputError {
                    message: "display busy".to_string(),
                });
            }
            *self.shown.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_does_not_supersede_older_results() {
        let trigger = RenderTrigger::new(echo, FixedInput("x"), FlakyDisplay::default());
        let older = trigger.begin().unwrap();
        let newer = trigger.begin().unwrap();

        assert!(trigger.complete(newer, Ok("new".to_string())).is_err());
        assert_eq!(
            trigger.complete(older, Ok("old".to_string())).unwrap(),
            RenderOutcome::Rendered { seq: 1 }
        );
        assert_eq!(*trigger.output().shown.borrow(), "old");
    }
}
