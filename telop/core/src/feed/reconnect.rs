//! Reconnect Supervision
//!
//! Pure bookkeeping for the feed connection lifecycle: connection state,
//! the bounded retry counter, and the retry-or-give-up decision. The live
//! driver in the parent module consults this after every disconnect; no
//! socket is involved here so the bound is unit-testable.

use std::time::Duration;

/// Lifecycle state of the feed connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet started.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// Connected and reading frames.
    Open,
    /// Disconnected; a retry may be pending.
    Closed,
}

/// Bounded fixed-delay retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Maximum consecutive reconnect attempts before giving up.
    pub max_attempts: u32,
    /// Fixed delay before each reconnect attempt.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

/// What to do after a disconnect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Sleep the given delay, then reconnect.
    RetryAfter(Duration),
    /// The attempt budget is exhausted; surface the terminal condition.
    GiveUp,
}

/// Tracks connection state and the consecutive-failure counter against a
/// [`ReconnectPolicy`]. The counter resets to zero on every successful
/// open, so the bound applies to consecutive failures only.
#[derive(Clone, Debug)]
pub struct ConnectionSupervisor {
    policy: ReconnectPolicy,
    state: ConnectionState,
    attempts: u32,
}

impl ConnectionSupervisor {
    /// Create a supervisor in the idle state.
    #[must_use]
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Idle,
            attempts: 0,
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Consecutive failed attempts since the last successful open.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// A connect attempt is starting.
    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// The connection opened; the failure counter resets.
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Open;
        self.attempts = 0;
    }

    /// The connection closed or the connect attempt failed. Returns
    /// whether to retry (and after what delay) or give up.
    pub fn on_closed(&mut self) -> Decision {
        self.state = ConnectionState::Closed;
        if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            Decision::RetryAfter(self.policy.delay)
        } else {
            Decision::GiveUp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts,
            delay: Duration::from_secs(5),
        }
    }

    #[test]
    fn retries_exactly_max_attempts_then_gives_up() {
        let mut supervisor = ConnectionSupervisor::new(policy(3));
        for attempt in 1..=3 {
            supervisor.on_connecting();
            assert_eq!(
                supervisor.on_closed(),
                Decision::RetryAfter(Duration::from_secs(5))
            );
            assert_eq!(supervisor.attempts(), attempt);
        }
        supervisor.on_connecting();
        assert_eq!(supervisor.on_closed(), Decision::GiveUp);
        assert_eq!(supervisor.state(), ConnectionState::Closed);
    }

    #[test]
    fn successful_open_resets_the_counter() {
        let mut supervisor = ConnectionSupervisor::new(policy(2));
        supervisor.on_connecting();
        assert!(matches!(supervisor.on_closed(), Decision::RetryAfter(_)));
        assert!(matches!(supervisor.on_closed(), Decision::RetryAfter(_)));

        supervisor.on_connecting();
        supervisor.on_open();
        assert_eq!(supervisor.state(), ConnectionState::Open);
        assert_eq!(supervisor.attempts(), 0);

        // Fresh budget after the successful open.
        assert!(matches!(supervisor.on_closed(), Decision::RetryAfter(_)));
        assert!(matches!(supervisor.on_closed(), Decision::RetryAfter(_)));
        assert_eq!(supervisor.on_closed(), Decision::GiveUp);
    }

    #[test]
    fn zero_attempts_gives_up_immediately() {
        let mut supervisor = ConnectionSupervisor::new(policy(0));
        assert_eq!(supervisor.on_closed(), Decision::GiveUp);
    }

    #[test]
    fn state_transitions() {
        let mut supervisor = ConnectionSupervisor::new(ReconnectPolicy::default());
        assert_eq!(supervisor.state(), ConnectionState::Idle);
        supervisor.on_connecting();
        assert_eq!(supervisor.state(), ConnectionState::Connecting);
        supervisor.on_open();
        assert_eq!(supervisor.state(), ConnectionState::Open);
        supervisor.on_closed();
        assert_eq!(supervisor.state(), ConnectionState::Closed);
    }
}
