//! API constants

/// Prefix shared by every API route
pub const API_PREFIX: &str = "/api";

/// Timeout applied to each dependency probe in health checks
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Storage key probed by the health check; expected to be absent
pub const HEALTH_PROBE_FILE_ID: &str = "health-check-probe";
