//! Retrieval seam between the pipeline and the network
//!
//! [`PaperSource`] is what the pipeline needs from a paper database.
//! [`PubMedClient`](crate::PubMedClient) implements it; tests substitute an
//! in-memory source.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::affiliations::resolve_papers;
use crate::error::{PubMedError, Result};
use crate::models::{Paper, ResolvedPaper};

/// Anything that can search for and return papers
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Search and return up to `limit` paper identifiers
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    /// Fetch one paper by identifier
    async fn fetch(&self, pmid: &str) -> Result<Paper>;

    /// Fetch several papers
    ///
    /// The default fetches one at a time and skips identifiers the source
    /// does not know. Any other error stops the fetch.
    async fn fetch_many(&self, pmids: &[String]) -> Result<Vec<Paper>> {
        let mut papers = Vec::with_capacity(pmids.len());
        for pmid in pmids {
            match self.fetch(pmid).await {
                Ok(paper) => papers.push(paper),
                Err(PubMedError::ArticleNotFound { pmid }) => {
                    warn!(pmid = %pmid, "Article not found, skipping");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(papers)
    }
}

/// Search `source`, fetch every hit and classify the authors of each paper
///
/// Papers come back in the order the source returned them; nothing is
/// filtered.
#[instrument(skip(source), fields(query = %query, limit = limit))]
pub async fn collect_resolved<S>(source: &S, query: &str, limit: usize) -> Result<Vec<ResolvedPaper>>
where
    S: PaperSource + ?Sized,
{
    let pmids = source.search(query, limit).await?;
    if pmids.is_empty() {
        info!("No papers matched the query");
        return Ok(Vec::new());
    }
    debug!(found = pmids.len(), "Fetching matched papers");

    let papers = source.fetch_many(&pmids).await?;
    let resolved = resolve_papers(&papers);

    info!(
        fetched = papers.len(),
        with_industry_authors = resolved
            .iter()
            .filter(|paper| paper.has_non_academic_authors())
            .count(),
        "Classified papers"
    );

    Ok(resolved)
}
