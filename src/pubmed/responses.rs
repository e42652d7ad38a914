use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchData {
    /// Total hits, reported as a string by NCBI
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
    /// Present when NCBI rejected the query
    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,
}
