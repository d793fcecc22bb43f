//! # Runtime Configuration
//!
//! Deduplication, ingest and telemetry settings for one bridge process.
//!
//! The window and cache bound are required: a bridge between two interfaces
//! on one ECU and a bridge across a gateway need different values, so there
//! is no silent default. [`RuntimeConfig::recommended`] gives documented
//! starting values for callers that want them.

use bridge_telemetry::TelemetryConfig;
use cb_01_frame_dedup::{DedupConfig, DedupConfigBuilder, DedupError, LedgerPolicy, SignatureWidth};
use std::env;
use thiserror::Error;

/// Default capacity of the shared ingest queue.
pub const DEFAULT_INGEST_QUEUE: usize = 1_024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid deduplication settings: {0}")]
    Dedup(#[from] DedupError),
}

/// Complete bridge runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Duplicate window in milliseconds.
    pub window_ms: u64,
    /// Maximum cached signatures.
    pub max_cache_size: usize,
    /// Stored signature width.
    pub signature_width: SignatureWidth,
    /// Ledger ordering on refresh.
    pub ledger_policy: LedgerPolicy,
    /// Capacity of the shared ingest queue.
    pub ingest_queue: usize,
    /// Logging and metrics settings.
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Recommended values for a bridged vehicle bus.
    pub fn recommended() -> Self {
        Self {
            window_ms: DedupConfig::RECOMMENDED_WINDOW_MS,
            max_cache_size: DedupConfig::RECOMMENDED_MAX_CACHE_SIZE,
            signature_width: SignatureWidth::default(),
            ledger_policy: LedgerPolicy::default(),
            ingest_queue: DEFAULT_INGEST_QUEUE,
            telemetry: TelemetryConfig::default(),
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CB_DEDUP_WINDOW_MS` (required): duplicate window in milliseconds
    /// - `CB_DEDUP_MAX_CACHE` (required): maximum cached signatures
    /// - `CB_SIGNATURE_BITS`: 32, 64 or 128 (default: 64)
    /// - `CB_LEDGER_POLICY`: `recency` or `first-insertion` (default: recency)
    /// - `CB_INGEST_QUEUE`: ingest queue capacity (default: 1024)
    /// - Telemetry variables, see [`TelemetryConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window_ms = required(&lookup, "CB_DEDUP_WINDOW_MS")?;
        let max_cache_size = required(&lookup, "CB_DEDUP_MAX_CACHE")?;

        let signature_width = match lookup("CB_SIGNATURE_BITS") {
            Some(raw) => {
                let bits: u32 = parse("CB_SIGNATURE_BITS", &raw)?;
                SignatureWidth::from_bits(bits).ok_or(DedupError::InvalidSignatureWidth(bits))?
            }
            None => SignatureWidth::default(),
        };

        let ledger_policy = match lookup("CB_LEDGER_POLICY") {
            Some(raw) => raw.parse::<LedgerPolicy>().map_err(|reason| ConfigError::Invalid {
                key: "CB_LEDGER_POLICY",
                value: raw.clone(),
                reason,
            })?,
            None => LedgerPolicy::default(),
        };

        let ingest_queue = match lookup("CB_INGEST_QUEUE") {
            Some(raw) => parse("CB_INGEST_QUEUE", &raw)?,
            None => DEFAULT_INGEST_QUEUE,
        };
        if ingest_queue == 0 {
            return Err(ConfigError::Invalid {
                key: "CB_INGEST_QUEUE",
                value: "0".to_string(),
                reason: "queue capacity must be > 0".to_string(),
            });
        }

        Ok(Self {
            window_ms,
            max_cache_size,
            signature_width,
            ledger_policy,
            ingest_queue,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Validated detector configuration.
    pub fn into_dedup_config(&self) -> Result<DedupConfig, ConfigError> {
        Ok(DedupConfigBuilder::new()
            .window_ms(self.window_ms)
            .max_cache_size(self.max_cache_size)
            .signature_width(self.signature_width)
            .ledger_policy(self.ledger_policy)
            .build()?)
    }
}

fn required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    parse(key, &raw)
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
