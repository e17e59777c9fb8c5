//! Shared utilities for use cases.
//!
//! Cancellation checks and message numbering used by both the discussion
//! engine and the session controller.

use crate::ports::progress::MessageId;
use crate::use_cases::run_discussion::TurnAbort;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(TurnAbort::Cancelled)` once the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), TurnAbort> {
    if token.is_cancelled() {
        return Err(TurnAbort::Cancelled);
    }
    Ok(())
}

/// Milliseconds since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Hands out increasing message ids for one session.
#[derive(Debug, Default)]
pub(crate) struct MessageCounter(AtomicU64);

impl MessageCounter {
    pub(crate) fn next(&self) -> MessageId {
        MessageId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        let token = CancellationToken::new();
        assert!(check_cancelled(&token).is_ok());
        token.cancel();
        assert!(matches!(check_cancelled(&token), Err(TurnAbort::Cancelled)));
    }

    #[test]
    fn test_message_ids_increase() {
        let counter = MessageCounter::default();
        assert_eq!(counter.next(), MessageId(1));
        assert_eq!(counter.next(), MessageId(2));
    }
}
