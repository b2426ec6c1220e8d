//! System-wide constants for the OpenSwap engine.

/// The first ID handed out by a fresh trade store. `0` is the "no trade"
/// sentinel.
pub const FIRST_TRADE_ID: u64 = 1;

/// Default cap on trades a single lister may create (0 = unlimited).
pub const DEFAULT_MAX_TRADES_PER_LISTER: usize = 10_000;

/// Domain separator mixed into every event digest.
pub const EVENT_DIGEST_DOMAIN: &[u8] = b"openswap:event:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSwap";
