//! State store and control loop constants.

/// Root prefix under which every stored object lives.
pub const REGISTRY_PREFIX: &str = "/registry";

/// Default interval between two reconciliation passes, in seconds.
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 30;
