// ABOUTME: Page fetching with browser-like headers, private-network guard, and charset decoding.
// ABOUTME: Exposes fetch_page plus the FetchOptions and FetchedPage types.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use tracing::debug;
use url::Url;

use crate::error::ScrapeError;

/// Maximum allowed response size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Request headers sent with every page fetch, mimicking a desktop browser.
/// The User-Agent is configured on the HTTP client itself.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Connection", "keep-alive"),
];

static PRIVATE_V4: Lazy<[Ipv4Net; 5]> = Lazy::new(|| {
    [
        "10.0.0.0/8".parse().unwrap(),
        "172.16.0.0/12".parse().unwrap(),
        "192.168.0.0/16".parse().unwrap(),
        "127.0.0.0/8".parse().unwrap(),
        "169.254.0.0/16".parse().unwrap(),
    ]
});

static PRIVATE_V6: Lazy<[Ipv6Net; 2]> =
    Lazy::new(|| ["fc00::/7".parse().unwrap(), "fe80::/10".parse().unwrap()]);

/// Options for fetching a page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Extra headers layered over [`DEFAULT_HEADERS`].
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedPage {
    /// Decode the body to text using the charset from the Content-Type
    /// header when present, falling back to detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => ip.is_loopback() || PRIVATE_V6.iter().any(|net| net.contains(ip)),
    }
}

/// Refuse URLs whose host is, or resolves to, a private address.
async fn ensure_public_host(url: &Url, original: &str) -> Result<(), ScrapeError> {
    let Some(host) = url.host_str() else {
        return Ok(());
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(ScrapeError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
        return Ok(());
    }

    let port = url
        .port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ScrapeError::fetch(
            original,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed: {}", e)),
        )
    })?;
    for addr in addrs {
        if is_private_ip(&addr.ip()) {
            return Err(ScrapeError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("host resolves to a private address")),
            ));
        }
    }
    Ok(())
}

/// Decode body bytes using the charset from the Content-Type header, or
/// detection when no usable charset is declared.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(charset) = content_type.and_then(extract_charset) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let (decoded, _, _) = detector.guess(None, true).decode(body);
    decoded.into_owned()
}

/// Extract the charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("charset=").map(str::to_string))
        .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
}

/// Fetch a page from the given URL.
///
/// Validates the URL, guards against private hosts (before the request and
/// again on the post-redirect final URL), enforces [`MAX_CONTENT_LENGTH`],
/// and requires a 200-class status.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchedPage, ScrapeError> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, "Fetch", None));
    }

    let parsed = Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        ensure_public_host(&parsed, url).await?;
    }

    let mut request = client.get(url);
    for (key, value) in DEFAULT_HEADERS {
        request = request.header(*key, *value);
    }
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!(url, "fetching page");
    let response = request.send().await.map_err(|e| {
        ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    // Redirects may land somewhere else entirely; re-apply the host guard.
    if !opts.allow_private_networks {
        ensure_public_host(response.url(), url).await?;
    }

    let declared_length = response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    });
    if declared_length.is_some_and(|len| len as usize > MAX_CONTENT_LENGTH) {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if !(200..300).contains(&status) {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchedPage {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("minigrid-test")
            .build()
            .unwrap()
    }

    fn private_ok() -> FetchOptions {
        FetchOptions {
            allow_private_networks: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html>hello</html>");
        });

        let page = fetch_page(&test_client(), &server.url("/page"), &private_ok())
            .await
            .expect("fetch should succeed");
        mock.assert();

        assert_eq!(page.status, 200);
        assert_eq!(page.text(), "<html>hello</html>");
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("accept-language", "en-US,en;q=0.5");
            then.status(200).body("ok");
        });

        fetch_page(&test_client(), &server.url("/page"), &private_ok())
            .await
            .expect("fetch should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_extra_headers_applied() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page").header("x-probe", "1");
            then.status(200).body("ok");
        });

        let mut opts = private_ok();
        opts.headers.insert("x-probe".to_string(), "1".to_string());
        fetch_page(&test_client(), &server.url("/page"), &opts)
            .await
            .expect("fetch should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_non_200_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = fetch_page(&test_client(), &server.url("/missing"), &private_ok())
            .await
            .expect_err("404 should fail");
        mock.assert();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_private_ip_blocked() {
        let server = MockServer::start();
        let url = format!("http://127.0.0.1:{}/page", server.port());

        let err = fetch_page(&test_client(), &url, &FetchOptions::default())
            .await
            .expect_err("loopback should be refused");
        assert!(err.is_ssrf());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let err = fetch_page(&test_client(), "not a url", &FetchOptions::default())
            .await
            .expect_err("garbage URL should fail");
        assert!(err.is_invalid_url());

        let err = fetch_page(&test_client(), "", &FetchOptions::default())
            .await
            .expect_err("empty URL should fail");
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let err = fetch_page(&test_client(), "ftp://example.com/x", &FetchOptions::default())
            .await
            .expect_err("ftp scheme should fail");
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_is_private_ip() {
        assert!(is_private_ip(&"10.1.2.3".parse().unwrap()));
        assert!(is_private_ip(&"172.16.0.1".parse().unwrap()));
        assert!(is_private_ip(&"192.168.1.1".parse().unwrap()));
        assert!(is_private_ip(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"169.254.10.10".parse().unwrap()));
        assert!(is_private_ip(&"::1".parse().unwrap()));
        assert!(is_private_ip(&"fd00::1".parse().unwrap()));
        assert!(is_private_ip(&"fe80::1".parse().unwrap()));

        assert!(!is_private_ip(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_ip(&"172.32.0.1".parse().unwrap()));
        assert!(!is_private_ip(&"2606:4700::1111".parse().unwrap()));
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_decode_body_latin1() {
        // "café" in ISO-8859-1
        let bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        assert_eq!(
            decode_body(bytes, Some("text/html; charset=iso-8859-1")),
            "café"
        );
    }

    #[test]
    fn test_decode_body_detects_without_header() {
        let bytes = "plain ascii".as_bytes();
        assert_eq!(decode_body(bytes, None), "plain ascii");
    }
}
