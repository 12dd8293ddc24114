//! Warehouse configuration loaded from the environment.

use serde::{Deserialize, Serialize};

use stockroom_observability::LogFormat;

pub const SEED_UNASSIGNED_VAR: &str = "STOCKROOM_SEED_UNASSIGNED";
pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Create the "Unassigned" location chain when the warehouse opens.
    pub seed_unassigned: bool,
    pub log_format: LogFormat,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            seed_unassigned: true,
            log_format: LogFormat::Json,
        }
    }
}

impl WarehouseConfig {
    /// Read `STOCKROOM_*` variables, falling back to defaults for anything
    /// unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed_unassigned = match lookup(SEED_UNASSIGNED_VAR) {
            None => defaults.seed_unassigned,
            Some(raw) => match raw.trim().parse::<bool>() {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        "{SEED_UNASSIGNED_VAR}={raw:?} is not a boolean, using {}",
                        defaults.seed_unassigned
                    );
                    defaults.seed_unassigned
                }
            },
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            None => defaults.log_format,
            Some(raw) => match raw.parse::<LogFormat>() {
                Ok(format) => format,
                Err(_) => {
                    tracing::warn!(
                        "{LOG_FORMAT_VAR}={raw:?} is not a log format, using {:?}",
                        defaults.log_format
                    );
                    defaults.log_format
                }
            },
        };

        Self {
            seed_unassigned,
            log_format,
        }
    }
}
