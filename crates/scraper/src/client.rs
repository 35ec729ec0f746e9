// ABOUTME: The main Scraper struct wiring fetch, extraction, and persistence together.
// ABOUTME: Provides async scrape() and run() plus the offline extract_from_html() entry point.

use std::net::ToSocketAddrs;

use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::extract::extract;
use crate::grid;
use crate::options::{Options, ScraperBuilder};
use crate::record::PuzzleRecord;
use crate::resource::{fetch_page, is_private_ip, FetchOptions};
use crate::store::{save_record, SavedPaths};

/// The result of a full fetch-extract-save cycle.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub record: PuzzleRecord,
    pub paths: SavedPaths,
}

/// Fetches the daily puzzle page, extracts the puzzle, and saves it.
#[derive(Debug, Clone)]
pub struct Scraper {
    opts: Options,
    http: reqwest::Client,
}

impl Scraper {
    /// Create a ScraperBuilder for configuring a Scraper.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Create a Scraper directly from options.
    pub fn new(opts: Options) -> Self {
        let http = opts.http_client.clone().unwrap_or_else(|| {
            let allow_private = opts.allow_private_networks;
            // Redirects are vetted inline; async DNS is unavailable inside
            // the policy callback.
            let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
                if !allow_private && redirects_to_private(attempt.url()) {
                    return attempt.error("redirect to private address blocked");
                }
                attempt.follow()
            });

            reqwest::Client::builder()
                .redirect(redirect_policy)
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http }
    }

    /// The options this scraper was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch the configured page and extract a puzzle record.
    ///
    /// The fetch is the only failure surface; extraction always yields a
    /// record once the page text is in hand.
    pub async fn scrape(&self) -> Result<PuzzleRecord, ScrapeError> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };
        let page = fetch_page(&self.http, &self.opts.base_url, &fetch_opts).await?;
        info!(status = page.status, url = %page.final_url, "page fetched");

        Ok(self.extract_from_html(&page.text()))
    }

    /// Extract a puzzle record from already-fetched HTML.
    pub fn extract_from_html(&self, html: &str) -> PuzzleRecord {
        let record = extract(html);
        let conflicts = grid::find_conflicts(&record.puzzle);
        if !conflicts.is_empty() {
            warn!(
                count = conflicts.len(),
                "scraped puzzle has conflicting givens"
            );
        }
        record
    }

    /// Run one full fetch-extract-save cycle.
    pub async fn run(&self) -> Result<ScrapeOutcome, ScrapeError> {
        let record = self.scrape().await?;
        let paths = save_record(&self.opts.output_dir, &record)?;
        Ok(ScrapeOutcome { record, paths })
    }
}

/// Synchronous private-address check for redirect targets.
fn redirects_to_private(url: &url::Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if let Ok(ip) = host.parse::<std::net::IpAddr>() {
        return is_private_ip(&ip);
    }
    let port = url
        .port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });
    match (host, port).to_socket_addrs() {
        Ok(addrs) => {
            let mut addrs = addrs.peekable();
            addrs.peek().is_none() || addrs.any(|sa| is_private_ip(&sa.ip()))
        }
        // Unresolvable redirect targets are refused as well.
        Err(_) => true,
    }
}
