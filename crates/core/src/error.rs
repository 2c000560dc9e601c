/// Error type for all lookup operations. All public client methods return this.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned HTTP status {status}")]
    Http { status: u16 },

    #[error("Rate limited by API, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Malformed API response: {0}")]
    Decode(String),
}
