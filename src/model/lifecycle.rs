use std::fmt;
use std::ops::Deref;

/// Stage of a conversion or compression request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Processed,
    Delivered,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Processed => "processed",
            Stage::Delivered => "delivered",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl Stage {
    /// Whether `next` may follow `self`.
    ///
    /// Failure is only possible before processing finishes; once a result
    /// exists it is always delivered.
    pub fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Received, Stage::Validated)
                | (Stage::Validated, Stage::Processed)
                | (Stage::Processed, Stage::Delivered)
                | (Stage::Received, Stage::Failed)
                | (Stage::Validated, Stage::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Delivered | Stage::Failed)
    }
}

/// Tracks one request through its stages and logs each transition
#[derive(Debug)]
pub struct RequestLifecycle {
    label: &'static str,
    stage: Stage,
}

impl RequestLifecycle {
    pub fn new(label: &'static str) -> Self {
        log::debug!("{}: {}", label, Stage::Received);
        Self {
            label,
            stage: Stage::Received,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move to `next`; illegal transitions are ignored and logged
    pub fn advance(&mut self, next: Stage) -> bool {
        if self.stage.can_advance_to(next) {
            log::debug!("{}: {} -> {}", self.label, self.stage, next);
            self.stage = next;
            true
        } else {
            log::warn!(
                "{}: ignoring transition {} -> {}",
                self.label,
                self.stage,
                next
            );
            false
        }
    }

    pub fn fail(&mut self) -> bool {
        self.advance(Stage::Failed)
    }

    /// Close processing and hold `output` until the transport hands it over
    pub fn processed<T>(mut self, output: T) -> Processed<T> {
        self.advance(Stage::Processed);
        Processed {
            output,
            lifecycle: self,
        }
    }
}

/// A finished result whose request has not been delivered yet.
///
/// Derefs to the output so callers can inspect it before sending.
#[derive(Debug)]
pub struct Processed<T> {
    output: T,
    lifecycle: RequestLifecycle,
}

impl<T> Processed<T> {
    pub fn stage(&self) -> Stage {
        self.lifecycle.stage()
    }

    /// Pass the output to `send`; the request counts as delivered only when
    /// `send` succeeds.
    pub fn deliver<R, E>(self, send: impl FnOnce(T) -> Result<R, E>) -> Result<R, E> {
        let Processed {
            output,
            mut lifecycle,
        } = self;
        let outcome = send(output);
        if outcome.is_ok() {
            lifecycle.advance(Stage::Delivered);
        } else {
            log::warn!("{}: result was not delivered", lifecycle.label);
        }
        outcome
    }
}

impl<T> Deref for Processed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.output
    }
}
