//! Filesystem path constants.

/// Default config file path for the operator.
pub const DEFAULT_OPERATOR_CONFIG: &str = "/etc/extdns-operator/config.yaml";

/// Default data directory for the operator's state store.
pub const DEFAULT_DATA_DIR: &str = "/tmp/extdns-operator-data";
