/// Discogs endpoints and client defaults shared across the sync pipeline.

pub const API_BASE: &str = "https://api.discogs.com";
pub const WEB_BASE: &str = "https://www.discogs.com";

pub const DEFAULT_USER_AGENT: &str = "discogs-sync/0.1";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_SLEEP_SECONDS: f64 = 1.1;
pub const DEFAULT_OUTPUT: &str = "recordList.html";

// Per-request network timeout at the transport boundary
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
