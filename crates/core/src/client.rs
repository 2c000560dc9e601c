//! Blocking client for the EAN-Search API.
//!
//! Every operation builds a query-string URL from the shared base URL, issues
//! an HTTP GET with the configured timeout, and decodes the JSON body via
//! [`crate::response`]. HTTP 429 is retried up to two extra times with a fixed
//! one-second delay; any other failure propagates to the caller.

use std::time::Duration;

use crate::error::LookupError;
use crate::response::{self, Record};

/// Language code the API defaults to (1 = English).
pub const DEFAULT_LANGUAGE: u32 = 1;

/// Per-request timeout applied until `set_timeout` is called.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

const MAX_API_TRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Pagination and language for the search operations.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Result page, starting at 0.
    pub page: u32,
    /// Language code (1 = English).
    pub language: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page: 0,
            language: DEFAULT_LANGUAGE,
        }
    }
}

/// Client for the EAN-Search product lookup API.
///
/// Calls are synchronous and blocking; one network round trip per call, plus
/// up to two retries on rate limiting. The client holds no state beyond the
/// base URL and the timeout, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct EanSearchClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::blocking::Client,
}

impl EanSearchClient {
    /// Build a client for the public API endpoint with the given API token.
    pub fn new(token: &str) -> Self {
        Self::with_endpoint(token, "https://api.ean-search.org")
    }

    /// Build a client against a different endpoint (self-hosted or mock
    /// server). `endpoint` is scheme + host, without the `/api` path.
    pub fn with_endpoint(token: &str, endpoint: &str) -> Self {
        Self {
            base_url: format!("{}/api?token={}&format=json", endpoint, token),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Set the timeout for all subsequent requests.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout = Duration::from_secs(seconds);
    }

    /// Product name for a GTIN/EAN barcode. `None` if the barcode is unknown
    /// or invalid.
    pub fn gtin_name(&self, ean: &str, language: u32) -> Result<Option<String>, LookupError> {
        let url = format!(
            "{}&op=barcode-lookup&ean={}&language={}",
            self.base_url, ean, language
        );
        response::scalar_field(&self.fetch(&url)?, "name")
    }

    /// Book title for an ISBN-10 or ISBN-13.
    pub fn isbn_title(&self, isbn: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}&op=barcode-lookup&isbn={}", self.base_url, isbn);
        response::scalar_field(&self.fetch(&url)?, "name")
    }

    /// Full product record for a GTIN/EAN barcode.
    pub fn gtin(&self, ean: &str, language: u32) -> Result<Option<Record>, LookupError> {
        let url = format!(
            "{}&op=barcode-lookup&ean={}&language={}",
            self.base_url, ean, language
        );
        response::first_record(&self.fetch(&url)?)
    }

    /// Full product record for a 12-digit UPC barcode.
    pub fn upc(&self, upc: &str, language: u32) -> Result<Option<Record>, LookupError> {
        let url = format!(
            "{}&op=barcode-lookup&ean={}&language={}",
            self.base_url, upc, language
        );
        response::first_record(&self.fetch(&url)?)
    }

    /// Verify the check digit of a barcode. `None` if the API rejects the
    /// input outright.
    pub fn verify_checksum(&self, ean: &str) -> Result<Option<bool>, LookupError> {
        let url = format!("{}&op=verify-checksum&ean={}", self.base_url, ean);
        response::bool_field(&self.fetch(&url)?, "valid")
    }

    /// Products whose name matches the given free-text query.
    pub fn product_search(
        &self,
        name: &str,
        opts: &SearchOptions,
    ) -> Result<Vec<Record>, LookupError> {
        let url = self.search_url("product-search", name, opts);
        response::product_list(&self.fetch(&url)?)
    }

    /// Fuzzy variant of [`product_search`](Self::product_search).
    pub fn similar_product_search(
        &self,
        name: &str,
        opts: &SearchOptions,
    ) -> Result<Vec<Record>, LookupError> {
        let url = self.search_url("similar-product-search", name, opts);
        response::product_list(&self.fetch(&url)?)
    }

    /// Products within a category, optionally filtered by name.
    pub fn category_search(
        &self,
        category: u32,
        name: &str,
        opts: &SearchOptions,
    ) -> Result<Vec<Record>, LookupError> {
        let url = format!(
            "{}&op=category-search&category={}&name={}&page={}&language={}",
            self.base_url,
            category,
            urlencoding::encode(name),
            opts.page,
            opts.language
        );
        response::product_list(&self.fetch(&url)?)
    }

    /// Products whose barcode starts with the given numeric prefix.
    pub fn barcode_prefix_search(
        &self,
        prefix: &str,
        opts: &SearchOptions,
    ) -> Result<Vec<Record>, LookupError> {
        let url = format!(
            "{}&op=barcode-prefix-search&prefix={}&page={}&language={}",
            self.base_url, prefix, opts.page, opts.language
        );
        response::product_list(&self.fetch(&url)?)
    }

    /// Country that issued the barcode number range.
    pub fn issuing_country(&self, ean: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}&op=issuing-country&ean={}", self.base_url, ean);
        response::scalar_field(&self.fetch(&url)?, "issuingCountry")
    }

    /// Rendered barcode image (base64 PNG payload, per the API contract).
    pub fn barcode_image(&self, ean: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}&op=barcode-image&ean={}", self.base_url, ean);
        response::scalar_field(&self.fetch(&url)?, "barcode")
    }

    fn search_url(&self, op: &str, name: &str, opts: &SearchOptions) -> String {
        format!(
            "{}&op={}&name={}&page={}&language={}",
            self.base_url,
            op,
            urlencoding::encode(name),
            opts.page,
            opts.language
        )
    }

    /// GET with bounded retry on HTTP 429. Returns the raw body on success.
    fn fetch(&self, url: &str) -> Result<String, LookupError> {
        for attempt in 1..=MAX_API_TRIES {
            let resp = self
                .http
                .get(url)
                .timeout(self.timeout)
                .send()
                .map_err(|e| LookupError::Network(e.to_string()))?;
            let status = resp.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt == MAX_API_TRIES {
                    break;
                }
                tracing::warn!(attempt, "rate limited by API, retrying after {:?}", RETRY_DELAY);
                std::thread::sleep(RETRY_DELAY);
                continue;
            }
            if !status.is_success() {
                return Err(LookupError::Http {
                    status: status.as_u16(),
                });
            }
            return resp.text().map_err(|e| LookupError::Network(e.to_string()));
        }
        Err(LookupError::RateLimited {
            attempts: MAX_API_TRIES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> EanSearchClient {
        EanSearchClient::new("abcdef")
    }

    #[test]
    fn base_url_embeds_token_and_format() {
        let c = client();
        assert_eq!(
            c.base_url,
            "https://api.ean-search.org/api?token=abcdef&format=json"
        );
    }

    #[test]
    fn with_endpoint_overrides_host() {
        let c = EanSearchClient::with_endpoint("t", "http://127.0.0.1:9999");
        assert_eq!(c.base_url, "http://127.0.0.1:9999/api?token=t&format=json");
    }

    #[test]
    fn search_url_percent_encodes_free_text() {
        let c = client();
        let url = c.search_url("product-search", "bio müsli & more", &SearchOptions::default());
        assert_eq!(
            url,
            "https://api.ean-search.org/api?token=abcdef&format=json\
             &op=product-search&name=bio%20m%C3%BCsli%20%26%20more&page=0&language=1"
        );
    }

    #[test]
    fn search_url_carries_page_and_language() {
        let c = client();
        let opts = SearchOptions { page: 3, language: 2 };
        let url = c.search_url("similar-product-search", "widget", &opts);
        assert!(url.ends_with("&op=similar-product-search&name=widget&page=3&language=2"));
    }

    #[test]
    fn default_search_options() {
        let opts = SearchOptions::default();
        assert_eq!(opts.page, 0);
        assert_eq!(opts.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn set_timeout_updates_duration() {
        let mut c = client();
        assert_eq!(c.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        c.set_timeout(5);
        assert_eq!(c.timeout, Duration::from_secs(5));
    }
}
