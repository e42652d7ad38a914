use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::models::Paper;
use crate::pubmed::parser::PubMedXmlParser;
use crate::pubmed::responses::ESearchResult;
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;
use crate::source::PaperSource;

/// ESearch refuses `retmax` above this value
const MAX_SEARCH_RESULTS: usize = 10_000;

/// Client for the NCBI E-utilities ESearch and EFetch endpoints
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// Uses default NCBI rate limiting (3 requests/second) and no API key.
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_affiliations::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_affiliations::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build configured HTTP client, using defaults");
                Client::new()
            });

        Self::with_client(client, config)
    }

    /// Create a PubMed client around an existing reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an E-utilities URL with the caller's API parameters appended
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.base_url, endpoint);
        let api_params = self.config.build_api_params();

        let all_params = params
            .iter()
            .map(|(key, value)| (*key, *value))
            .chain(api_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        for (index, (key, value)) in all_params.enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// GET `url` once: acquire a rate-limit token, check the status, read the body
    async fn get_once(&self, url: &str) -> Result<String> {
        self.rate_limiter.acquire().await?;

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("API request failed with status: {}", status);
            return Err(PubMedError::ApiError {
                status: status.as_u16(),
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            });
        }

        Ok(response.text().await?)
    }

    /// GET `url`, retrying transient failures per the configured policy
    async fn get_text(&self, url: &str, context: &str) -> Result<String> {
        with_retry(
            move || self.get_once(url),
            &self.config.retry_config,
            context,
        )
        .await
    }

    /// Search PubMed and return matching PMIDs
    ///
    /// An empty query or a zero limit returns no results without contacting
    /// the server. Limits above the ESearch maximum are clamped.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - If NCBI rejects the query
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::JsonError` - If JSON parsing fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_affiliations::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let pmids = client.search_articles("cancer immunotherapy", 10).await?;
    ///     println!("Found {} articles", pmids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(query = %query, limit = limit))]
    pub async fn search_articles(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if query.trim().is_empty() || limit == 0 {
            debug!("Empty query or zero limit, returning empty results");
            return Ok(Vec::new());
        }

        let retmax = if limit > MAX_SEARCH_RESULTS {
            warn!(
                requested = limit,
                maximum = MAX_SEARCH_RESULTS,
                "Search limit exceeds ESearch maximum, clamping"
            );
            MAX_SEARCH_RESULTS
        } else {
            limit
        };

        let retmax = retmax.to_string();
        let url = self.build_url(
            "esearch.fcgi",
            &[
                ("db", "pubmed"),
                ("term", query.trim()),
                ("retmax", &retmax),
                ("retmode", "json"),
            ],
        );

        debug!("Making ESearch API request");
        let body = self.get_text(&url, "esearch").await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;
        let data = search_result.esearchresult;

        if let Some(error) = data.error {
            if data.idlist.is_empty() {
                warn!(error = %error, "ESearch rejected the query");
                return Err(PubMedError::InvalidQuery(error));
            }
        }

        info!(
            results_found = data.idlist.len(),
            total_count = data.count.as_deref().unwrap_or("unknown"),
            "Search completed successfully"
        );

        Ok(data.idlist)
    }

    /// Fetch one paper by PMID
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmid` - If the PMID is not numeric (no request is made)
    /// * `PubMedError::ArticleNotFound` - If PubMed has no such article
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::XmlParseError` - If the response is not valid XML
    #[instrument(skip(self), fields(pmid = %pmid))]
    pub async fn fetch_paper(&self, pmid: &str) -> Result<Paper> {
        let pmid = validate_pmid(pmid)?;

        let url = self.build_url(
            "efetch.fcgi",
            &[("db", "pubmed"), ("id", pmid), ("retmode", "xml")],
        );

        debug!("Making EFetch API request");
        let xml = self.get_text(&url, "efetch").await?;
        let paper = PubMedXmlParser::parse_paper_from_xml(&xml, pmid)?;

        info!(
            title = %paper.title,
            authors_count = paper.authors.len(),
            "Successfully parsed paper"
        );

        Ok(paper)
    }

    /// Fetch many papers with batched EFetch requests
    ///
    /// All PMIDs are validated before any request is sent. PMIDs unknown to
    /// PubMed are absent from the result; order follows the responses.
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn fetch_papers(&self, pmids: &[String]) -> Result<Vec<Paper>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let validated = pmids
            .iter()
            .map(|pmid| validate_pmid(pmid))
            .collect::<Result<Vec<&str>>>()?;

        let mut papers = Vec::with_capacity(validated.len());
        for (batch_index, batch) in validated.chunks(self.config.batch_size).enumerate() {
            let ids = batch.join(",");
            let url = self.build_url(
                "efetch.fcgi",
                &[("db", "pubmed"), ("id", &ids), ("retmode", "xml")],
            );

            debug!(batch = batch_index, size = batch.len(), "Making batch EFetch API request");
            let xml = self.get_text(&url, "efetch").await?;
            let parsed = PubMedXmlParser::parse_papers_from_xml(&xml)?;

            if parsed.len() < batch.len() {
                warn!(
                    requested = batch.len(),
                    returned = parsed.len(),
                    "Some PMIDs were not returned by EFetch"
                );
            }
            papers.extend(parsed);
        }

        info!(papers_fetched = papers.len(), "Batch fetch completed");
        Ok(papers)
    }

    /// Search, then fetch every hit
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_affiliations::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let papers = client.search_and_fetch("mRNA vaccine", 5).await?;
    ///     for paper in papers {
    ///         println!("{}: {}", paper.pubmed_id, paper.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn search_and_fetch(&self, query: &str, limit: usize) -> Result<Vec<Paper>> {
        let pmids = self.search_articles(query, limit).await?;
        self.fetch_papers(&pmids).await
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for PubMedClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        self.search_articles(query, limit).await
    }

    async fn fetch(&self, pmid: &str) -> Result<Paper> {
        self.fetch_paper(pmid).await
    }

    async fn fetch_many(&self, pmids: &[String]) -> Result<Vec<Paper>> {
        self.fetch_papers(pmids).await
    }
}

fn validate_pmid(pmid: &str) -> Result<&str> {
    let trimmed = pmid.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        warn!(pmid = %pmid, "Invalid PMID format provided");
        return Err(PubMedError::InvalidPmid {
            pmid: pmid.to_string(),
        });
    }
    Ok(trimmed)
}
