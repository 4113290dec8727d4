//! Pacing for stats API calls
//!
//! The limiter only spaces calls out. It never repeats a failed one.

use crate::config::RateLimitConfig;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
enum Policy {
    None,
    FixedInterval(Duration),
    TokenBucket { capacity: u32, refill: Duration },
}

#[derive(Debug, Default)]
struct State {
    /// Start of the previous call
    last_call: Option<Instant>,

    /// Tokens left, and when the bucket was last topped up
    tokens: u32,
    last_refill: Option<Instant>,
}

/// Spaces consecutive calls according to a [`RateLimitConfig`]
///
/// The first call through a fresh limiter is never delayed. Callers are
/// served one at a time; the lock is held while waiting.
#[derive(Debug)]
pub struct RateLimiter {
    policy: Policy,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let policy = match config {
            RateLimitConfig::None => Policy::None,
            RateLimitConfig::FixedInterval { interval_ms } => {
                Policy::FixedInterval(Duration::from_millis(*interval_ms))
            }
            RateLimitConfig::TokenBucket {
                capacity,
                refill_interval_ms,
            } => Policy::TokenBucket {
                capacity: (*capacity).max(1),
                refill: Duration::from_millis((*refill_interval_ms).max(1)),
            },
        };

        Self {
            policy,
            state: Mutex::new(State::default()),
        }
    }

    /// Wait until the next call is allowed
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        match self.policy {
            Policy::None => {}
            Policy::FixedInterval(interval) => {
                if let Some(last) = state.last_call {
                    let next = last + interval;
                    if Instant::now() < next {
                        tracing::trace!(wait_ms = (next - Instant::now()).as_millis() as u64, "Pacing stats API call");
                        tokio::time::sleep_until(next).await;
                    }
                }
            }
            Policy::TokenBucket { capacity, refill } => {
                let now = Instant::now();
                let last_refill = match state.last_refill {
                    Some(at) => at,
                    None => {
                        state.tokens = capacity;
                        now
                    }
                };
                state.last_refill = Some(last_refill);
                refill_tokens(&mut state, capacity, refill, now);

                if state.tokens == 0 {
                    let next = state.last_refill.unwrap_or(now) + refill;
                    tokio::time::sleep_until(next).await;
                    refill_tokens(&mut state, capacity, refill, Instant::now());
                }
                state.tokens = state.tokens.saturating_sub(1);
            }
        }

        state.last_call = Some(Instant::now());
    }
}

fn refill_tokens(state: &mut State, capacity: u32, refill: Duration, now: Instant) {
    let Some(last_refill) = state.last_refill else {
        return;
    };

    let elapsed = now.saturating_duration_since(last_refill);
    let earned = (elapsed.as_nanos() / refill.as_nanos()) as u64;
    if earned == 0 {
        return;
    }

    state.tokens = (state.tokens as u64 + earned).min(capacity as u64) as u32;
    state.last_refill = Some(last_refill + refill * earned as u32);
}
