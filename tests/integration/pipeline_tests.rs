//! End-to-end tests for search → fetch → classify → export
//!
//! Uses an in-memory PaperSource for the pipeline and wiremock for the
//! full path through PubMedClient.

mod common;

use std::collections::HashMap;

use async_trait::async_trait;
use pubmed_affiliations::{
    ClientConfig, Paper, PaperSource, PubMedClient, PubMedError, Result, collect_resolved,
    format_output_data, write_csv, write_csv_file,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{EFETCH_TWO_PAPERS, ESEARCH_TWO_IDS, academic_paper, industry_paper};

struct FixtureSource {
    papers: HashMap<String, Paper>,
    search_results: Vec<String>,
}

impl FixtureSource {
    fn new(papers: Vec<Paper>) -> Self {
        let search_results = papers.iter().map(|p| p.pubmed_id.clone()).collect();
        Self {
            papers: papers.into_iter().map(|p| (p.pubmed_id.clone(), p)).collect(),
            search_results,
        }
    }
}

#[async_trait]
impl PaperSource for FixtureSource {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self.search_results.iter().take(limit).cloned().collect())
    }

    async fn fetch(&self, pmid: &str) -> Result<Paper> {
        self.papers
            .get(pmid)
            .cloned()
            .ok_or_else(|| PubMedError::ArticleNotFound {
                pmid: pmid.to_string(),
            })
    }
}

struct FailingSource;

#[async_trait]
impl PaperSource for FailingSource {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>> {
        Ok(vec!["1".to_string()])
    }

    async fn fetch(&self, _pmid: &str) -> Result<Paper> {
        Err(PubMedError::ApiError {
            status: 503,
            message: "HTTP 503: Service Unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_pipeline_exports_expected_csv() {
    let source = FixtureSource::new(vec![industry_paper(), academic_paper()]);

    let resolved = collect_resolved(&source, "anything", 10).await.unwrap();
    let rows = format_output_data(&resolved);

    let mut buffer = Vec::new();
    write_csv(&rows, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    let expected = "\
PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email
12345678,Test Paper 1,2023/01/15,\"Doe, Jane; Smith, Bob\",Pfizer Inc.; Moderna Inc.,jane.doe@pfizer.com
87654321,Academic Study,2022,,,ann@stanford.edu
";
    assert_eq!(csv, expected);
}

#[tokio::test]
async fn test_pipeline_respects_limit() {
    let source = FixtureSource::new(vec![industry_paper(), academic_paper()]);

    let resolved = collect_resolved(&source, "anything", 1).await.unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].pubmed_id, "12345678");
}

#[tokio::test]
async fn test_pipeline_filtering_is_left_to_caller() {
    let source = FixtureSource::new(vec![academic_paper(), industry_paper()]);

    let resolved = collect_resolved(&source, "anything", 10).await.unwrap();
    assert_eq!(resolved.len(), 2);

    let industry: Vec<_> = resolved
        .into_iter()
        .filter(|paper| paper.has_non_academic_authors())
        .collect();
    assert_eq!(industry.len(), 1);
    assert_eq!(industry[0].pubmed_id, "12345678");
}

#[tokio::test]
async fn test_pipeline_propagates_retrieval_errors() {
    let result = collect_resolved(&FailingSource, "anything", 10).await;

    assert!(matches!(
        result,
        Err(PubMedError::ApiError { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_pipeline_through_mocked_pubmed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_TWO_IDS))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_PAPERS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PubMedClient::with_config(
        ClientConfig::new()
            .with_base_url(mock_server.uri())
            .with_rate_limit(100.0),
    );

    let resolved = collect_resolved(&client, "mrna vaccine", 10).await.unwrap();
    assert_eq!(resolved.len(), 2);

    let industry = &resolved[0];
    assert_eq!(industry.pubmed_id, "38000001");
    assert_eq!(
        industry.classification.non_academic_authors,
        vec!["Jane Doe"]
    );
    assert_eq!(
        industry.classification.company_affiliations,
        vec!["Moderna Therapeutics, Cambridge, MA, USA. jane.doe@modernatx.com"]
    );
    assert_eq!(
        industry.classification.corresponding_email.as_deref(),
        Some("jane.doe@modernatx.com")
    );
    assert!(!resolved[1].has_non_academic_authors());

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("results.csv");
    write_csv_file(&format_output_data(&resolved), &csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "38000001");
    assert_eq!(&records[0][3], "Jane Doe");
    assert_eq!(&records[1][3], "");
}
