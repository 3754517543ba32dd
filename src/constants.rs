//! Constants used throughout Ezyr
//!
//! Default ports, header names, upstream endpoints, and the token expiry
//! policy live here so the rest of the crate never hardcodes them.

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Environment variable: Google OAuth client id
pub const ENV_CLIENT_ID: &str = "EZYR_CLIENT_ID";

/// Environment variable: Google OAuth client secret
pub const ENV_CLIENT_SECRET: &str = "EZYR_CLIENT_SECRET";

/// Environment variable: target spreadsheet for the entry endpoints
pub const ENV_SPREADSHEET_ID: &str = "EZYR_SPREADSHEET_ID";

/// Environment variable: bind host
pub const ENV_HOST: &str = "EZYR_HOST";

/// Environment variable: bind port
pub const ENV_PORT: &str = "EZYR_PORT";

/// Environment variable: OAuth token endpoint override
pub const ENV_TOKEN_URL: &str = "EZYR_TOKEN_URL";

/// Environment variable: Sheets API base URL override
pub const ENV_SHEETS_BASE_URL: &str = "EZYR_SHEETS_BASE_URL";

/// Environment variable: Gmail API base URL override
pub const ENV_GMAIL_BASE_URL: &str = "EZYR_GMAIL_BASE_URL";

/// Environment variable: Airtable API base URL override
pub const ENV_AIRTABLE_BASE_URL: &str = "EZYR_AIRTABLE_BASE_URL";

// ============================================================================
// TOKENS
// ============================================================================

/// The single user id the in-memory token store is keyed by
pub const DEFAULT_USER_ID: &str = "default";

/// Refresh tokens this close to expiry (epoch-ms buffer)
pub const TOKEN_EXPIRY_BUFFER_MS: i64 = 5 * 60 * 1000;

/// Assumed token lifetime when the provider omits an expiry
pub const DEFAULT_TOKEN_TTL_MS: i64 = 3600 * 1000;

// ============================================================================
// HTTP HEADERS
// ============================================================================

/// Request header carrying the refresh token
pub const HEADER_REFRESH_TOKEN: &str = "x-refresh-token";

/// Response header advertising a refreshed access token
pub const HEADER_NEW_ACCESS_TOKEN: &str = "x-new-access-token";

/// Response header flagging that a refresh happened mid-request
pub const HEADER_TOKEN_REFRESHED: &str = "x-token-refreshed";

// ============================================================================
// UPSTREAM ENDPOINTS
// ============================================================================

/// Google OAuth 2.0 authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth 2.0 token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google Sheets API base URL
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

/// Gmail API base URL
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// Airtable REST API base URL
pub const AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";

// ============================================================================
// SHEETS & GMAIL DEFAULTS
// ============================================================================

/// Range rows are appended to
pub const SHEET_APPEND_RANGE: &str = "Sheet1!A1";

/// Range the block-level fetch reads (includes header row)
pub const SHEET_FETCH_RANGE: &str = "Sheet1!A1:Z1000";

/// Range the direct entries endpoint reads (name + email columns)
pub const ENTRIES_RANGE: &str = "Sheet1!A1:B1000";

/// Maximum Gmail messages returned per search
pub const GMAIL_MAX_RESULTS: usize = 10;

/// Gmail metadata headers extracted into search records
pub const GMAIL_METADATA_HEADERS: [&str; 3] = ["From", "Subject", "Date"];
