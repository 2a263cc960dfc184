use crate::core::Ledger;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Difficulty used when the controller is not running
pub const DEFAULT_DIFFICULTY: u32 = 5;

// Controller constants
const RETUNE_INTERVAL: Duration = Duration::from_secs(1);
const SAMPLE_WINDOW: usize = 10;
const SCALE_TO_MILLIS: f64 = 1000.0;
const DECREMENT_RATIO: f64 = 1.5;

/// The difficulty and throttle delay consumed by the next block
/// construction. Shared between the controller task and the miner.
pub struct MiningPolicy {
    inner: RwLock<PolicyValues>,
}

struct PolicyValues {
    difficulty: u32,
    throttle_ms: u64,
}

impl MiningPolicy {
    pub fn new(difficulty: u32) -> MiningPolicy {
        MiningPolicy {
            inner: RwLock::new(PolicyValues {
                difficulty,
                throttle_ms: 0,
            }),
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.inner
            .read()
            .expect("Failed to acquire read lock on mining policy - this should never happen")
            .difficulty
    }

    pub fn throttle_ms(&self) -> u64 {
        self.inner
            .read()
            .expect("Failed to acquire read lock on mining policy - this should never happen")
            .throttle_ms
    }

    pub fn publish(&self, difficulty: u32, throttle_ms: u64) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on mining policy - this should never happen");
        inner.difficulty = difficulty;
        inner.throttle_ms = throttle_ms;
    }

    /// Back to a fixed difficulty and zero delay
    pub fn reset(&self, difficulty: u32) {
        self.publish(difficulty, 0);
    }
}

impl Default for MiningPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

/// Map a target block interval (seconds) to a difficulty tier.
///
/// Keyed on the target rather than the observed interval; the decrement in
/// `plan_retune` reacts to the observed/target ratio instead.
fn tier_for_target(target_secs: f64) -> u32 {
    if target_secs < 0.5 {
        3
    } else if target_secs < 9.5 {
        4
    } else if target_secs < 200.0 {
        5
    } else {
        6
    }
}

/// One retune step over block timestamps (newest first, milliseconds).
/// Returns the `(difficulty, throttle_ms)` to publish, or `None` when the
/// history is too short to average.
fn plan_retune(timestamps_newest_first: &[i64], target_secs: f64) -> Option<(u32, u64)> {
    if timestamps_newest_first.len() < 2 {
        return None;
    }

    let deltas: Vec<i64> = timestamps_newest_first
        .windows(2)
        .map(|pair| (pair[0] - pair[1]) / 1000)
        .collect();
    let observed_secs = deltas.iter().sum::<i64>() as f64 / deltas.len() as f64;

    let mut difficulty = tier_for_target(target_secs);
    let raw_throttle = ((target_secs - observed_secs) * SCALE_TO_MILLIS) as i64;
    let throttle_ms = if raw_throttle < 0 {
        // Mining is already slower than target: no artificial delay, and
        // ease the difficulty when it is badly behind.
        if observed_secs / target_secs > DECREMENT_RATIO {
            difficulty = difficulty.saturating_sub(1);
        }
        0
    } else {
        raw_throttle as u64
    };

    Some((difficulty, throttle_ms))
}

/// Periodic feedback loop steering difficulty and throttle toward a target
/// block interval. Runs on its own thread until `stop`.
pub struct DifficultyController {
    running: Arc<AtomicBool>,
    policy: Arc<MiningPolicy>,
    handle: Option<JoinHandle<()>>,
}

impl DifficultyController {
    pub fn start(
        ledger: Arc<Ledger>,
        policy: Arc<MiningPolicy>,
        target_interval_secs: f64,
    ) -> DifficultyController {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let loop_policy = Arc::clone(&policy);

        let handle = thread::spawn(move || {
            info!("Difficulty controller started (target interval: {target_interval_secs:.2}s)");
            while flag.load(Ordering::Relaxed) {
                Self::retune(&ledger, &loop_policy, target_interval_secs);
                thread::sleep(RETUNE_INTERVAL);
            }
        });

        DifficultyController {
            running,
            policy,
            handle: Some(handle),
        }
    }

    fn retune(ledger: &Ledger, policy: &MiningPolicy, target_secs: f64) {
        let timestamps = ledger.recent_timestamps(SAMPLE_WINDOW);
        match plan_retune(&timestamps, target_secs) {
            Some((difficulty, throttle_ms)) => {
                policy.publish(difficulty, throttle_ms);
                info!(
                    "Difficulty retune: target {target_secs:.2}s -> difficulty {difficulty}, throttle {throttle_ms}ms"
                );
            }
            None => {
                info!(
                    "Difficulty retune skipped: insufficient history ({} blocks sampled)",
                    timestamps.len()
                );
            }
        }
    }

    /// Halt the loop and restore the default fixed difficulty with zero
    /// delay.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.policy.reset(DEFAULT_DIFFICULTY);
        info!("Difficulty controller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_mapping() {
        assert_eq!(tier_for_target(0.4), 3);
        assert_eq!(tier_for_target(0.5), 4);
        assert_eq!(tier_for_target(9.4), 4);
        assert_eq!(tier_for_target(9.5), 5);
        assert_eq!(tier_for_target(199.9), 5);
        assert_eq!(tier_for_target(200.0), 6);
    }

    #[test]
    fn test_insufficient_history_skips() {
        assert_eq!(plan_retune(&[], 10.0), None);
        assert_eq!(plan_retune(&[1_000], 10.0), None);
    }

    #[test]
    fn test_throttle_when_mining_faster_than_target() {
        // Blocks 2 seconds apart against a 10 second target: 8s of
        // artificial delay.
        let timestamps = vec![20_000, 18_000, 16_000];
        assert_eq!(plan_retune(&timestamps, 10.0), Some((5, 8_000)));
    }

    #[test]
    fn test_throttle_clamped_when_slower_than_target() {
        // 12 seconds observed, 10 target: clamp to zero, ratio 1.2 is
        // under the decrement threshold.
        let timestamps = vec![24_000, 12_000, 0];
        assert_eq!(plan_retune(&timestamps, 10.0), Some((5, 0)));
    }

    #[test]
    fn test_difficulty_decrement_when_badly_behind() {
        // 20 seconds observed against a 10 second target: ratio 2.0 eases
        // the tier by one.
        let timestamps = vec![40_000, 20_000, 0];
        assert_eq!(plan_retune(&timestamps, 10.0), Some((4, 0)));
    }

    #[test]
    fn test_policy_publish_and_reset() {
        let policy = MiningPolicy::new(2);
        assert_eq!(policy.difficulty(), 2);
        assert_eq!(policy.throttle_ms(), 0);

        policy.publish(4, 750);
        assert_eq!(policy.difficulty(), 4);
        assert_eq!(policy.throttle_ms(), 750);

        policy.reset(DEFAULT_DIFFICULTY);
        assert_eq!(policy.difficulty(), DEFAULT_DIFFICULTY);
        assert_eq!(policy.throttle_ms(), 0);
    }
}
