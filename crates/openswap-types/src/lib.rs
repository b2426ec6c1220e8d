//! # openswap-types
//!
//! Shared types, errors, and configuration for the **OpenSwap** swap engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`TradeId`], [`EventId`]
//! - **Asset references**: [`AssetRef`], [`AssetKind`]
//! - **Trade model**: [`Trade`], [`TradeStatus`]
//! - **Event model**: [`SwapEvent`], [`SwapEventKind`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`SwapError`] with `OS_ERR_` prefix codes, [`RegistryError`]
//! - **Constants**: system-wide limits and defaults

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod serde_util;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use openswap_types::{Address, Trade, TradeStatus, SwapError, ...};

pub use asset::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use trade::*;

// Constants are accessed via `openswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
