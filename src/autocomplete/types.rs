use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Lifecycle of an `AutocompleteService`.
///
/// `Uninitialized -> Hydrating -> Ready`, or `Hydrating -> Failed` when hydration
/// aborts. Only `Ready` serves traffic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Uninitialized,
    Hydrating,
    Ready,
    Failed,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceState::Uninitialized => "uninitialized",
            ServiceState::Hydrating => "hydrating",
            ServiceState::Ready => "ready",
            ServiceState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What to do when the store cannot be read at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HydrationPolicy {
    /// Refuse to become ready; the process should exit.
    Abort,
    /// Become ready with an empty index and report the hydration as degraded.
    StartEmpty,
}

impl FromStr for HydrationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(HydrationPolicy::Abort),
            "start-empty" | "start_empty" | "empty" => Ok(HydrationPolicy::StartEmpty),
            other => Err(anyhow::anyhow!("unknown hydration policy '{}'", other)),
        }
    }
}

/// Tunables for the service and its write-through queue.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Prefixes shorter than this (in chars) get no suggestions.
    pub min_prefix_len: usize,
    /// Upper bound for a single store write.
    pub persist_timeout: Duration,
    /// Total tries per write, first attempt included.
    pub persist_max_attempts: usize,
    /// Pending writes beyond this are dropped.
    pub persist_queue_capacity: usize,
    pub hydration_policy: HydrationPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_prefix_len: 1,
            persist_timeout: Duration::from_millis(500),
            persist_max_attempts: 3,
            persist_queue_capacity: 1024,
            hydration_policy: HydrationPolicy::Abort,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `MIN_PREFIX_LEN`, `PERSIST_TIMEOUT_MS`,
    /// `PERSIST_MAX_ATTEMPTS`, `PERSIST_QUEUE_CAPACITY` and `HYDRATION_POLICY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("MIN_PREFIX_LEN") {
            config.min_prefix_len = parse_var("MIN_PREFIX_LEN", &raw)?;
        }
        if let Some(raw) = lookup("PERSIST_TIMEOUT_MS") {
            config.persist_timeout =
                Duration::from_millis(parse_var("PERSIST_TIMEOUT_MS", &raw)?);
        }
        if let Some(raw) = lookup("PERSIST_MAX_ATTEMPTS") {
            config.persist_max_attempts = parse_var::<usize>("PERSIST_MAX_ATTEMPTS", &raw)?.max(1);
        }
        if let Some(raw) = lookup("PERSIST_QUEUE_CAPACITY") {
            config.persist_queue_capacity =
                parse_var::<usize>("PERSIST_QUEUE_CAPACITY", &raw)?.max(1);
        }
        if let Some(raw) = lookup("HYDRATION_POLICY") {
            config.hydration_policy = parse_var("HYDRATION_POLICY", &raw)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid value '{}' for {}", raw, name))
}

/// Outcome of a hydration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HydrationReport {
    /// Records replayed into the index.
    pub loaded: usize,
    /// Records ignored because their word or frequency was empty.
    pub skipped: usize,
    /// Distinct words in the index afterwards.
    pub words: usize,
    /// Set when the store could not be read and the index started empty.
    pub degraded: bool,
}

/// Point-in-time counters of the write-through queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistenceSnapshot {
    pub enqueued: u64,
    pub persisted: u64,
    pub retried: u64,
    pub failed: u64,
    /// Writes abandoned after the timeout; they may or may not have landed.
    pub timed_out: u64,
    pub dropped: u64,
}

impl PersistenceSnapshot {
    /// Increments applied in memory that are not confirmed in the store.
    ///
    /// Timed-out writes count here even if they landed later.
    pub fn unpersisted(&self) -> u64 {
        (self.enqueued + self.dropped).saturating_sub(self.persisted)
    }
}

/// Service-wide view served on the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    pub state: ServiceState,
    pub words: usize,
    pub persistence: PersistenceSnapshot,
}
