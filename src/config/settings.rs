use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

const DIFFICULTY_KEY: &str = "LEDGER_DIFFICULTY";
const WORKERS_KEY: &str = "LEDGER_WORKERS";
const BLOCK_CAPACITY_KEY: &str = "LEDGER_BLOCK_CAPACITY";
const TARGET_INTERVAL_KEY: &str = "LEDGER_TARGET_INTERVAL";
const TX_LOG_KEY: &str = "LEDGER_TX_LOG";

const DEFAULT_DIFFICULTY: &str = "5";
const DEFAULT_WORKERS: &str = "2";
const DEFAULT_BLOCK_CAPACITY: &str = "3";
const DEFAULT_TARGET_INTERVAL: &str = "10.0";
const DEFAULT_TX_LOG: &str = "transaction_log.txt";

/// Process-wide settings, seeded from the environment with built-in
/// defaults. Unparsable values fall back to the defaults.
pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();
        for (key, default) in [
            (DIFFICULTY_KEY, DEFAULT_DIFFICULTY),
            (WORKERS_KEY, DEFAULT_WORKERS),
            (BLOCK_CAPACITY_KEY, DEFAULT_BLOCK_CAPACITY),
            (TARGET_INTERVAL_KEY, DEFAULT_TARGET_INTERVAL),
            (TX_LOG_KEY, DEFAULT_TX_LOG),
        ] {
            let value = env::var(key).unwrap_or_else(|_| String::from(default));
            map.insert(String::from(key), value);
        }

        Config {
            inner: RwLock::new(map),
        }
    }

    fn get(&self, key: &str) -> String {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(key)
            .expect("Config keys are all seeded at startup")
            .clone()
    }

    fn set(&self, key: &str, value: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(key), value);
    }

    /// Difficulty used when no controller is steering it
    pub fn default_difficulty(&self) -> u32 {
        self.get(DIFFICULTY_KEY).parse().unwrap_or(5)
    }

    pub fn worker_count(&self) -> usize {
        self.get(WORKERS_KEY).parse().unwrap_or(2)
    }

    /// Transactions per block, excluding the reward transaction
    pub fn block_capacity(&self) -> usize {
        self.get(BLOCK_CAPACITY_KEY).parse().unwrap_or(3)
    }

    /// Target block interval in seconds for the difficulty controller
    pub fn target_interval(&self) -> f64 {
        self.get(TARGET_INTERVAL_KEY).parse().unwrap_or(10.0)
    }

    pub fn tx_log_path(&self) -> String {
        self.get(TX_LOG_KEY)
    }

    pub fn set_tx_log_path(&self, path: String) {
        self.set(TX_LOG_KEY, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.default_difficulty(), 5);
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.block_capacity(), 3);
        assert_eq!(config.target_interval(), 10.0);
        assert_eq!(config.tx_log_path(), "transaction_log.txt");
    }

    #[test]
    fn test_set_tx_log_path() {
        let config = Config::new();
        config.set_tx_log_path(String::from("other.txt"));
        assert_eq!(config.tx_log_path(), "other.txt");
    }
}
