//! Configuration for an OpenSwap engine instance.

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SwapError, constants};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own identity inside every registry. Listers and
    /// executors authorize *this* address to move their assets.
    pub operator: Address,
    /// Accept fungible requests for an amount of `0`.
    #[serde(default)]
    pub allow_zero_amount: bool,
    /// Maximum number of trades one lister may ever create (0 = no cap).
    #[serde(default = "default_max_trades_per_lister")]
    pub max_trades_per_lister: usize,
    /// How long a state-changing call waits for another one in flight
    /// before failing with `GateTimeout` (0 = wait indefinitely).
    #[serde(default)]
    pub gate_timeout_ms: u64,
}

fn default_max_trades_per_lister() -> usize {
    constants::DEFAULT_MAX_TRADES_PER_LISTER
}

impl EngineConfig {
    /// Config with defaults for everything but the operator.
    #[must_use]
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            allow_zero_amount: false,
            max_trades_per_lister: constants::DEFAULT_MAX_TRADES_PER_LISTER,
            gate_timeout_ms: 0,
        }
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// `Serialization` on malformed JSON, `Configuration` on invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants that serde can't express.
    pub fn validate(&self) -> Result<()> {
        if self.operator.is_zero() {
            return Err(SwapError::Configuration(
                "operator must not be the zero address".into(),
            ));
        }
        Ok(())
    }

    /// The gate wait limit, or `None` to wait indefinitely.
    #[must_use]
    pub fn gate_timeout(&self) -> Option<std::time::Duration> {
        (self.gate_timeout_ms > 0).then(|| std::time::Duration::from_millis(self.gate_timeout_ms))
    }

    /// Whether `count` existing trades leaves room for one more.
    #[must_use]
    pub fn lister_has_capacity(&self, count: usize) -> bool {
        self.max_trades_per_lister == 0 || count < self.max_trades_per_lister
    }
}
