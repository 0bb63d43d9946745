//! Hold timers - pure state machines driven by millisecond timestamps
//! Callers pass `now_ms` each frame; nothing here reads a wall clock

use serde::{Deserialize, Serialize};

/// Timing for the V-sign capture hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    /// Hold time before the countdown appears
    pub countdown_start_ms: u64,
    /// Hold time at which the capture fires
    pub capture_after_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            countdown_start_ms: 1000,
            capture_after_ms: 3000,
        }
    }
}

/// Output of one hold-timer step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldSignal {
    /// Countdown digit to display (3, 2, 1) while inside the countdown window
    pub countdown: Option<u8>,
    /// True on the single frame where the hold completes
    pub capture: bool,
}

/// Idle -> Holding(since) -> Fired(since); any release returns to Idle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoldTimer {
    #[default]
    Idle,
    Holding { since_ms: u64 },
    Fired { since_ms: u64 },
}

impl HoldTimer {
    /// Advance with whether the qualifying gesture is held this frame
    pub fn step(self, held: bool, now_ms: u64, config: &HoldConfig) -> (HoldTimer, HoldSignal) {
        if !held {
            return (HoldTimer::Idle, HoldSignal::default());
        }

        match self {
            HoldTimer::Idle => {
                let next = HoldTimer::Holding { since_ms: now_ms };
                // A zero-length hold would fire on the first frame
                next.step(true, now_ms, config)
            }
            HoldTimer::Holding { since_ms } => {
                let elapsed = now_ms.saturating_sub(since_ms);
                if elapsed >= config.capture_after_ms {
                    (
                        HoldTimer::Fired { since_ms },
                        HoldSignal {
                            countdown: None,
                            capture: true,
                        },
                    )
                } else {
                    (
                        self,
                        HoldSignal {
                            countdown: countdown_digit(elapsed, config),
                            capture: false,
                        },
                    )
                }
            }
            HoldTimer::Fired { .. } => (self, HoldSignal::default()),
        }
    }

    /// Apply `step` in place, returning the signal
    pub fn advance(&mut self, held: bool, now_ms: u64, config: &HoldConfig) -> HoldSignal {
        let (next, signal) = self.step(held, now_ms, config);
        *self = next;
        signal
    }

    pub fn is_holding(&self) -> bool {
        matches!(self, HoldTimer::Holding { .. })
    }
}

/// Splits [countdown_start, capture_after) into three phases showing 3, 2, 1
fn countdown_digit(elapsed: u64, config: &HoldConfig) -> Option<u8> {
    if elapsed < config.countdown_start_ms || elapsed >= config.capture_after_ms {
        return None;
    }
    let window = config.capture_after_ms - config.countdown_start_ms;
    let into = elapsed - config.countdown_start_ms;
    let phase = (into * 3 / window).min(2) as u8;
    Some(3 - phase)
}
