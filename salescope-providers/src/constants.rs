//! Constants for provider implementations

/// Provider name used in errors and logs
pub const GEMINI_PROVIDER: &str = "gemini";

/// Default Gemini API base URL
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Request timeout for provider calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Header carrying the Gemini API key
pub const GEMINI_API_KEY_HEADER: &str = "x-goog-api-key";
