//! # PubMed Affiliations
//!
//! Find PubMed papers with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! The crate searches PubMed through the NCBI E-utilities, classifies each
//! author's affiliations as academic or industry and exports the result as
//! CSV.
//!
//! ## Features
//!
//! - **PubMed API Integration**: ESearch and batched EFetch with rate limiting and retries
//! - **Affiliation Heuristics**: Keyword and email-domain classification of authors
//! - **CSV Export**: Fixed six-column output, to a file or any writer
//! - **Error Handling**: One error type for network, parsing and export failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_affiliations::{PubMedClient, collect_resolved, format_output_data, write_csv};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new();
//!
//!     let resolved = collect_resolved(&client, "cancer immunotherapy", 20).await?;
//!     let industry: Vec<_> = resolved
//!         .into_iter()
//!         .filter(|paper| paper.has_non_academic_authors())
//!         .collect();
//!
//!     write_csv(&format_output_data(&industry), std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Classifying Without the Network
//!
//! ```
//! use pubmed_affiliations::{Author, Paper, identify_company_authors};
//!
//! let paper = Paper {
//!     pubmed_id: "12345678".to_string(),
//!     title: "Test Paper".to_string(),
//!     publication_date: "2023".to_string(),
//!     authors: vec![
//!         Author::new("Doe, Jane").with_affiliation("Pfizer Inc."),
//!         Author::new("Roe, Rick").with_affiliation("Stanford University"),
//!     ],
//! };
//!
//! let result = identify_company_authors(&paper);
//! assert_eq!(result.non_academic_authors, vec!["Doe, Jane"]);
//! assert_eq!(result.company_affiliations, vec!["Pfizer Inc."]);
//! ```

pub mod affiliations;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod pubmed;
pub mod rate_limit;
pub mod retry;
pub mod source;

// Re-export main types for convenience
pub use affiliations::{
    AffiliationKind, classify_affiliation, extract_company_name, identify_company_authors,
    is_company_email, is_likely_academic, is_likely_company, resolve_paper, resolve_papers,
};
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use models::{Author, ClassificationResult, OutputRow, Paper, ResolvedPaper};
pub use output::{format_output_data, write_csv, write_csv_file};
pub use pubmed::{PubMedClient, PubMedXmlParser};
pub use rate_limit::RateLimiter;
pub use retry::RetryConfig;
pub use source::{PaperSource, collect_resolved};
