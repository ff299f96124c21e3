//! Circuit breaker state machine for the inventory dependency.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls short-circuit without touching the network.
    Open,
    /// A single trial call is admitted to probe recovery.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Tuning for the circuit breaker.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Failures within `window` that flip the breaker open.
    pub failure_threshold: u32,
    /// Trailing window over which failures are counted.
    pub window: Duration,
    /// How long the breaker stays open before admitting a trial call.
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            window: Duration::from_secs(60),
            cooldown: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Closed { failures: VecDeque<Instant> },
    Open { since: Instant },
    HalfOpen { probing: bool },
}

/// Explicit circuit breaker state machine.
///
/// Owned by the guard and shared by handle; every transition happens in
/// [`admit`](Self::admit), [`record_success`](Self::record_success), or
/// [`record_failure`](Self::record_failure), which makes the machine
/// directly testable and injectable.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    phase: Mutex<Phase>,
}

impl CircuitBreaker {
    /// Creates a closed breaker with the given tuning.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            phase: Mutex::new(Phase::Closed {
                failures: VecDeque::new(),
            }),
        }
    }

    /// Current state, with the open-to-half-open transition applied lazily
    /// once the cooldown has elapsed.
    pub fn state(&self) -> CircuitState {
        let mut phase = self.phase.lock().unwrap();
        self.roll(&mut phase);
        match *phase {
            Phase::Closed { .. } => CircuitState::Closed,
            Phase::Open { .. } => CircuitState::Open,
            Phase::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    /// Whether a call may proceed right now.
    ///
    /// Half-open admits one probe at a time; further callers are rejected
    /// until the probe reports back through `record_success` or
    /// `record_failure`.
    pub fn admit(&self) -> bool {
        let mut phase = self.phase.lock().unwrap();
        self.roll(&mut phase);
        match &mut *phase {
            Phase::Closed { .. } => true,
            Phase::Open { .. } => false,
            Phase::HalfOpen { probing } => {
                if *probing {
                    false
                } else {
                    *probing = true;
                    true
                }
            }
        }
    }

    /// Records a successful call, closing the breaker from half-open.
    pub fn record_success(&self) {
        let mut phase = self.phase.lock().unwrap();
        if matches!(*phase, Phase::HalfOpen { .. }) {
            *phase = Phase::Closed {
                failures: VecDeque::new(),
            };
        }
    }

    /// Records a failed call.
    ///
    /// Opens the breaker when the rolling failure count inside the window
    /// reaches the threshold, or immediately when a half-open probe fails.
    pub fn record_failure(&self) {
        let now = Instant::now();
        let mut phase = self.phase.lock().unwrap();
        match &mut *phase {
            Phase::Closed { failures } => {
                failures.push_back(now);
                while let Some(oldest) = failures.front() {
                    if now.duration_since(*oldest) > self.config.window {
                        failures.pop_front();
                    } else {
                        break;
                    }
                }
                if failures.len() as u32 >= self.config.failure_threshold {
                    *phase = Phase::Open { since: now };
                }
            }
            Phase::HalfOpen { .. } => {
                *phase = Phase::Open { since: now };
            }
            Phase::Open { .. } => {}
        }
    }

    /// Forces the breaker open, as if the failure threshold had just been
    /// crossed.
    pub fn trip(&self) {
        *self.phase.lock().unwrap() = Phase::Open {
            since: Instant::now(),
        };
    }

    fn roll(&self, phase: &mut Phase) {
        if let Phase::Open { since } = *phase
            && since.elapsed() >= self.config.cooldown
        {
            *phase = Phase::HalfOpen { probing: false };
        }
    }
}
