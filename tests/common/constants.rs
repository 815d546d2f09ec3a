//! Shared constants for end-to-end tests

// ============================================================================
// Target Server Bodies
// ============================================================================

/// Body served by the target's `/ok` route
pub const OK_BODY: &str = "ok";

/// Body served by the target's `/a` route
pub const A_BODY: &str = "target A";

/// Body served by the target's `/b` route
pub const B_BODY: &str = "target B";

/// Body served together with a 500 status by the target's `/error` route
pub const ERROR_BODY: &str = "internal failure";

/// A URL nothing listens on; connections to it are refused
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/";

// ============================================================================
// Server Settings
// ============================================================================

/// Request body limit configured on the test server
pub const TEST_MAX_BODY_SIZE: usize = 1024;

/// Fetch timeout configured on the test server
pub const TEST_FETCH_TIMEOUT_SECS: u64 = 2;

/// Maximum time to wait for a server to accept connections
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for requests made by the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Poll interval while waiting for a server to become ready
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
