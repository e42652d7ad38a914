//! PubMed client for searching and fetching paper metadata
//!
//! This module talks to the NCBI E-utilities ESearch and EFetch endpoints
//! and turns their responses into [`Paper`](crate::models::Paper)s.

pub mod client;
pub mod parser;
pub(crate) mod responses;

// Re-export public types
pub use client::PubMedClient;
pub use parser::PubMedXmlParser;
