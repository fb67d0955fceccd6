/// Default rest-to-work ratio for a freshly registered ledger
pub const DEFAULT_REST_TO_WORK_RATIO: i64 = 5;

/// Maximum username length (characters)
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length (characters)
pub const MIN_PASSWORD_LEN: usize = 6;

/// Allowed upper bound for task urgency and value scores
pub const MAX_TASK_SCORE: i64 = 3;

/// Longest accepted favorite quote seed (characters)
pub const MAX_QUOTE_SEED_LEN: usize = 60;

/// Marker sent back by the timer page when a countdown has elapsed
pub const TIMER_FROM_PAGE: &str = "timer";

/// Form-style truthy flag used by `repeat` fields
pub const FORM_TRUE: &str = "True";

/// Allowed clock skew for session tokens issued "in the future" (seconds)
pub const MAX_SESSION_CLOCK_SKEW_SECS: i64 = 60;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for empty item names
pub const ERR_EMPTY_NAME: &str = "Name must not be empty";

/// Error message for non-positive reward costs and task points
pub const ERR_POINTS_NOT_POSITIVE: &str = "Points must be a positive integer";

/// Error message for a zero point change
pub const ERR_ZERO_POINT_CHANGE: &str = "Point change must not be zero";

/// Error message for an unknown item kind
pub const ERR_UNKNOWN_KIND: &str = "Type must be either \"reward\" or \"task\"";

/// Error message for credentials that do not match
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid username or password";
