use serde::{Deserialize, Serialize};

/// A paper retrieved from PubMed together with its author list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// PubMed ID
    pub pubmed_id: String,
    /// Article title
    pub title: String,
    /// Publication date as printed by PubMed (e.g. "2023 Jan 15")
    pub publication_date: String,
    /// Authors in byline order
    #[serde(default)]
    pub authors: Vec<Author>,
}

/// An author as listed on a single paper
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    /// Display name, "ForeName LastName" for PubMed records
    pub name: String,
    /// Free-text affiliation strings in document order
    #[serde(default)]
    pub affiliations: Vec<String>,
    /// Contact address if one was published
    #[serde(default)]
    pub email: Option<String>,
    /// Whether this author is the designated contact
    #[serde(default)]
    pub is_corresponding: bool,
}

impl Author {
    /// Create an author with no affiliations or email
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_affiliation<S: Into<String>>(mut self, affiliation: S) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn corresponding(mut self) -> Self {
        self.is_corresponding = true;
        self
    }

    /// Email with blank values treated as absent
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Outcome of classifying every author on a paper
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    /// Names of authors with industry affiliation, input order, not deduplicated
    pub non_academic_authors: Vec<String>,
    /// Verbatim company-classified affiliation strings
    pub company_affiliations: Vec<String>,
    /// Email of the first corresponding author that has one
    pub corresponding_email: Option<String>,
}

/// Scalar paper fields plus the classification, ready for formatting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPaper {
    pub pubmed_id: String,
    pub title: String,
    pub publication_date: String,
    pub classification: ClassificationResult,
}

impl ResolvedPaper {
    /// Whether at least one author was flagged as non-academic
    pub fn has_non_academic_authors(&self) -> bool {
        !self.classification.non_academic_authors.is_empty()
    }
}

/// One export row; field names are the CSV column headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl OutputRow {
    /// Column headers in export order
    pub const HEADERS: [&'static str; 6] = [
        "PubmedID",
        "Title",
        "Publication Date",
        "Non-academic Author(s)",
        "Company Affiliation(s)",
        "Corresponding Author Email",
    ];

    /// Cells in [`OutputRow::HEADERS`] order
    pub fn to_record(&self) -> [&str; 6] {
        [
            self.pubmed_id.as_str(),
            self.title.as_str(),
            self.publication_date.as_str(),
            self.non_academic_authors.as_str(),
            self.company_affiliations.as_str(),
            self.corresponding_email.as_str(),
        ]
    }
}
