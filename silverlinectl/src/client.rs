//! HTTP client for the Silverline `ip_objects` REST API.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use silverline_core::api::{AddIpObjectRequest, IpObjectsResponse};
use silverline_core::error::{Result, SilverlineError};
use silverline_core::types::{ListType, PageParams};
use std::time::Duration;

/// Fixed API prefix appended to the portal base URL.
const API_SUFFIX: &str = "/api/v1/ip_lists";

/// Header carrying the Silverline API key.
const AUTH_HEADER: &str = "X-Authorization-Token";

/// Normalize a portal URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Build pagination query parameters from raw string arguments.
///
/// Both values must parse as integers; anything else is a validation error
/// and no request is issued.
pub fn paging_args_to_params(page_size: &str, page_number: &str) -> Result<PageParams> {
    let parse = |value: &str| {
        value.trim().parse::<u64>().map_err(|_| {
            SilverlineError::InvalidInput(
                "page_number and page_size should be numbers".to_string(),
            )
        })
    };

    Ok(PageParams {
        size: parse(page_size)?,
        number: parse(page_number)?,
    })
}

/// Decide whether the caller requested paging.
///
/// Paging is only in effect when both arguments are present; supplying one
/// alone is silently treated as "no paging", mirroring the remote API.
pub fn handle_paging(
    page_number: Option<&str>,
    page_size: Option<&str>,
) -> Result<Option<PageParams>> {
    match (page_number, page_size) {
        (Some(number), Some(size)) => Ok(Some(paging_args_to_params(size, number)?)),
        _ => Ok(None),
    }
}

/// HTTP client for the Silverline portal's IP-list endpoints.
///
/// One outbound request per call, no retries: any transport or API error
/// aborts the current command. The API key and content-type headers are
/// attached to every request.
#[derive(Debug, Clone)]
pub struct SilverlineClient {
    client: Client,
    base_url: String,
    verbose: bool,
}

impl SilverlineClient {
    /// Create a new client against the given portal URL.
    ///
    /// # Arguments
    ///
    /// * `portal_url` - Portal base URL (e.g., "https://portal.f5silverline.com")
    /// * `api_key` - Value for the `X-Authorization-Token` header
    /// * `timeout_secs` - Request timeout in seconds
    /// * `verify_tls` - Whether to validate the portal's TLS certificate
    /// * `use_proxy` - Whether to honor system proxy settings
    /// * `verbose` - Echo each request on stderr before sending it
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key contains characters that
    /// cannot appear in a header value, or if the HTTP client cannot be built.
    pub fn with_config(
        portal_url: &str,
        api_key: &str,
        timeout_secs: u64,
        verify_tls: bool,
        use_proxy: bool,
        verbose: bool,
    ) -> Result<Self> {
        let mut token = HeaderValue::from_str(api_key)
            .map_err(|_| SilverlineError::Config("API key is not a valid header value".to_string()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("silverlinectl/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .danger_accept_invalid_certs(!verify_tls);
        if !use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| SilverlineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("{}{}", normalize_url(portal_url), API_SUFFIX),
            verbose,
        })
    }

    /// Endpoint URL for a list collection or a single object within it.
    fn endpoint(&self, list_type: ListType, object_id: Option<&str>) -> String {
        match object_id {
            Some(id) => format!("{}/{}/ip_objects/{}", self.base_url, list_type, id),
            None => format!("{}/{}/ip_objects", self.base_url, list_type),
        }
    }

    fn debug_request(&self, method: &str, url: &str, page: Option<&PageParams>) {
        if self.verbose {
            eprintln!("request: method={} url={} page={:?}", method, url, page);
        }
    }

    /// Check the response status, mapping failures into the error taxonomy.
    ///
    /// A 401 or a body containing "Unauthorized" becomes the distinct
    /// authorization error; any other non-success status carries the remote
    /// detail.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .text()
            .await
            .unwrap_or_default();
        let detail = if detail.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            detail
        };

        if status == reqwest::StatusCode::UNAUTHORIZED || detail.contains("Unauthorized") {
            Err(SilverlineError::Unauthorized(detail))
        } else {
            Err(SilverlineError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }

    /// Deserialize a JSON response body into the IP-objects envelope.
    async fn read_objects(response: Response) -> Result<IpObjectsResponse> {
        let text = response
            .text()
            .await
            .map_err(|e| SilverlineError::Transport(format!("Failed to read response body: {}", e)))?;
        serde_json::from_str(&text)
            .map_err(|e| SilverlineError::Parse(format!("Malformed ip_objects response: {}", e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| SilverlineError::Transport(e.to_string()))?;
        Self::check_status(response).await
    }

    /// Fetch all IP objects in a list, optionally one page of them.
    pub async fn get_ip_objects(
        &self,
        list_type: ListType,
        page: Option<&PageParams>,
    ) -> Result<IpObjectsResponse> {
        let url = self.endpoint(list_type, None);
        self.debug_request("GET", &url, page);

        let mut request = self.client.get(&url);
        if let Some(page) = page {
            request = request.query(&page.as_query());
        }

        let response = self.send(request).await?;
        Self::read_objects(response).await
    }

    /// Fetch a single IP object by id.
    ///
    /// Page parameters are passed through when supplied; the API ignores
    /// them on single-object lookups.
    pub async fn get_ip_object(
        &self,
        list_type: ListType,
        object_id: &str,
        page: Option<&PageParams>,
    ) -> Result<IpObjectsResponse> {
        let url = self.endpoint(list_type, Some(object_id));
        self.debug_request("GET", &url, page);

        let mut request = self.client.get(&url);
        if let Some(page) = page {
            request = request.query(&page.as_query());
        }

        let response = self.send(request).await?;
        Self::read_objects(response).await
    }

    /// Create a new IP object. The API returns no body on success.
    pub async fn add_ip_object(
        &self,
        list_type: ListType,
        request: &AddIpObjectRequest,
    ) -> Result<()> {
        let url = self.endpoint(list_type, None);
        self.debug_request("POST", &url, None);

        self.send(self.client.post(&url).json(request)).await?;
        Ok(())
    }

    /// Delete an IP object by id. The API returns no body on success.
    pub async fn delete_ip_object(&self, list_type: ListType, object_id: &str) -> Result<()> {
        let url = self.endpoint(list_type, Some(object_id));
        self.debug_request("DELETE", &url, None);

        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://portal.f5silverline.com"),
            "https://portal.f5silverline.com"
        );
        assert_eq!(
            normalize_url("https://portal.f5silverline.com/"),
            "https://portal.f5silverline.com"
        );
        assert_eq!(
            normalize_url("https://portal.f5silverline.com///"),
            "https://portal.f5silverline.com"
        );
    }

    #[test]
    fn test_paging_args_to_params() {
        let params = paging_args_to_params("25", "3").unwrap();
        assert_eq!(params.size, 25);
        assert_eq!(params.number, 3);
    }

    #[test]
    fn test_paging_args_reject_non_numbers() {
        for (size, number) in [("abc", "3"), ("25", "three"), ("", ""), ("2.5", "1")] {
            let err = paging_args_to_params(size, number).unwrap_err();
            match err {
                SilverlineError::InvalidInput(msg) => {
                    assert_eq!(msg, "page_number and page_size should be numbers");
                }
                other => panic!("Expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_handle_paging_requires_both_arguments() {
        assert_eq!(handle_paging(None, None).unwrap(), None);
        assert_eq!(handle_paging(Some("3"), None).unwrap(), None);
        assert_eq!(handle_paging(None, Some("25")).unwrap(), None);

        let params = handle_paging(Some("3"), Some("25")).unwrap().unwrap();
        assert_eq!(params.number, 3);
        assert_eq!(params.size, 25);
    }

    #[test]
    fn test_handle_paging_propagates_validation_errors() {
        assert!(handle_paging(Some("x"), Some("25")).is_err());
        assert!(handle_paging(Some("3"), Some("x")).is_err());
    }

    #[test]
    fn test_endpoint_paths() {
        let client = SilverlineClient::with_config(
            "https://portal.f5silverline.com/",
            "test-key",
            10,
            true,
            false,
            false,
        )
        .unwrap();

        assert_eq!(
            client.endpoint(ListType::Denylist, None),
            "https://portal.f5silverline.com/api/v1/ip_lists/denylist/ip_objects"
        );
        assert_eq!(
            client.endpoint(ListType::Allowlist, Some("a1b2")),
            "https://portal.f5silverline.com/api/v1/ip_lists/allowlist/ip_objects/a1b2"
        );
    }

    #[test]
    fn test_invalid_api_key_is_a_config_error() {
        let result =
            SilverlineClient::with_config("https://x", "bad\nkey", 10, true, false, false);
        match result {
            Err(SilverlineError::Config(_)) => {}
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
