//! Error types for the OpenSwap engine.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input errors
//! - 2xx: Trade lifecycle errors
//! - 3xx: Authorization errors (remediable by the caller)
//! - 4xx: Execution errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, TradeId, TradeStatus};

/// Central error enum for all OpenSwap operations.
#[derive(Debug, Error)]
pub enum SwapError {
    // =================================================================
    // Input Errors (1xx)
    // =================================================================
    /// Malformed request: null registry, unknown registry, kind mismatch,
    /// degenerate amount, or a lister over its listing cap.
    #[error("OS_ERR_100: Invalid input: {reason}")]
    InvalidInput { reason: String },

    // =================================================================
    // Trade Lifecycle Errors (2xx)
    // =================================================================
    /// The trade ID is `0` or was never assigned.
    #[error("OS_ERR_200: Trade not found: {0}")]
    TradeNotFound(TradeId),

    /// A state-changing operation requires the trade to be OPEN.
    #[error("OS_ERR_201: Invalid state: {trade_id} is {status}")]
    InvalidState {
        trade_id: TradeId,
        status: TradeStatus,
    },

    /// Wrong caller for the requested action.
    #[error("OS_ERR_202: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The expected party does not currently own the referenced asset.
    #[error("OS_ERR_300: Not owner of {registry}#{asset_id}: expected {expected}, actual {actual:?}")]
    NotOwner {
        registry: Address,
        asset_id: u128,
        expected: Address,
        actual: Option<Address>,
    },

    /// The engine holds no transfer authorization for the asset.
    #[error("OS_ERR_301: Engine not approved for {registry}#{asset_id}")]
    NotApproved { registry: Address, asset_id: u128 },

    /// Fungible leg underfunded.
    #[error("OS_ERR_302: Insufficient balance in {registry}: need {needed}, have {available}")]
    InsufficientBalance {
        registry: Address,
        needed: u128,
        available: u128,
    },

    /// Fungible leg under-authorized.
    #[error("OS_ERR_303: Insufficient allowance in {registry}: need {needed}, have {available}")]
    InsufficientAllowance {
        registry: Address,
        needed: u128,
        available: u128,
    },

    // =================================================================
    // Execution Errors (4xx)
    // =================================================================
    /// A registry refused a transfer that passed the pre-checks.
    /// The swap was rolled back.
    #[error("OS_ERR_400: Transfer rejected by {registry}: {reason}")]
    TransferRejected { registry: Address, reason: String },

    /// A compensating transfer failed. Critical: requires operator attention.
    #[error("OS_ERR_401: Rollback failed in {registry}: {reason}")]
    RollbackFailed { registry: Address, reason: String },

    /// A state-changing call re-entered the engine while another one was
    /// still in flight.
    #[error("OS_ERR_402: Reentrant call rejected: {attempted} while {active} in flight")]
    ReentrantCall {
        active: &'static str,
        attempted: &'static str,
    },

    /// Another state-changing call held the engine longer than the
    /// configured gate timeout.
    #[error("OS_ERR_403: Engine busy: {attempted} waited {waited_ms} ms")]
    GateTimeout {
        attempted: &'static str,
        waited_ms: u64,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A registry adapter failed outside of a transfer.
    #[error("OS_ERR_900: Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("OS_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("OS_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("OS_ERR_903: Internal error: {0}")]
    Internal(String),
}

impl SwapError {
    /// The stable `OS_ERR_nnn` code of this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "OS_ERR_100",
            Self::TradeNotFound(_) => "OS_ERR_200",
            Self::InvalidState { .. } => "OS_ERR_201",
            Self::Unauthorized { .. } => "OS_ERR_202",
            Self::NotOwner { .. } => "OS_ERR_300",
            Self::NotApproved { .. } => "OS_ERR_301",
            Self::InsufficientBalance { .. } => "OS_ERR_302",
            Self::InsufficientAllowance { .. } => "OS_ERR_303",
            Self::TransferRejected { .. } => "OS_ERR_400",
            Self::RollbackFailed { .. } => "OS_ERR_401",
            Self::ReentrantCall { .. } => "OS_ERR_402",
            Self::GateTimeout { .. } => "OS_ERR_403",
            Self::Registry(_) => "OS_ERR_900",
            Self::Configuration(_) => "OS_ERR_901",
            Self::Serialization(_) => "OS_ERR_902",
            Self::Internal(_) => "OS_ERR_903",
        }
    }

    /// Authorization failures the caller can fix (approve, fund, re-acquire)
    /// and resubmit.
    #[must_use]
    pub fn is_remediable(&self) -> bool {
        matches!(
            self,
            Self::NotOwner { .. }
                | Self::NotApproved { .. }
                | Self::InsufficientBalance { .. }
                | Self::InsufficientAllowance { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors reported by ownership registry adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No asset with this identifier exists in the registry.
    #[error("unknown asset {0}")]
    UnknownAsset(u128),

    /// The operator may not move this asset / these funds.
    #[error("operator {operator} not authorized")]
    Unauthorized { operator: Address },

    /// Balance or allowance too small for the transfer.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    /// Any other refusal.
    #[error("rejected: {reason}")]
    Rejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = SwapError::TradeNotFound(TradeId(9));
        let msg = format!("{err}");
        assert!(msg.starts_with("OS_ERR_200"), "Got: {msg}");
        assert!(msg.contains("trade:9"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = SwapError::InsufficientBalance {
            registry: Address::from_low_u8(3),
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("OS_ERR_302"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn invalid_state_display() {
        let err = SwapError::InvalidState {
            trade_id: TradeId(1),
            status: TradeStatus::Closed,
        };
        assert!(format!("{err}").contains("CLOSED"));
    }

    #[test]
    fn code_matches_display_prefix() {
        let errors = vec![
            SwapError::InvalidInput { reason: "x".into() },
            SwapError::Unauthorized { reason: "x".into() },
            SwapError::NotApproved {
                registry: Address::ZERO,
                asset_id: 1,
            },
            SwapError::ReentrantCall {
                active: "execute",
                attempted: "execute",
            },
            SwapError::GateTimeout {
                attempted: "cancel",
                waited_ms: 10,
            },
            SwapError::Registry(RegistryError::UnknownAsset(4)),
            SwapError::Internal("test".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with(err.code()),
                "code {} does not prefix {msg}",
                err.code()
            );
        }
    }

    #[test]
    fn remediable_kinds() {
        assert!(
            SwapError::InsufficientAllowance {
                registry: Address::ZERO,
                needed: 1,
                available: 0
            }
            .is_remediable()
        );
        assert!(!SwapError::TradeNotFound(TradeId(1)).is_remediable());
    }

    #[test]
    fn registry_error_converts() {
        let err: SwapError = RegistryError::Rejected {
            reason: "paused".into(),
        }
        .into();
        assert!(matches!(err, SwapError::Registry(_)));
        assert!(format!("{err}").contains("paused"));
    }
}
