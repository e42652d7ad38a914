//! Affiliation classification
//!
//! Decides whether an author is affiliated with industry rather than with a
//! university, hospital or public research institute. Everything in this
//! module is a pure function over strings: no I/O, no shared state.
//!
//! Matching is case-insensitive substring containment over a normalized
//! copy of the text: lowercased, every character that is not alphanumeric
//! or `&` replaced by a space, and padded with one space on each side.
//! Vocabulary entries carry their own word boundaries, so `" inc "` matches
//! `"Pfizer Inc."` but not `"Princeton"`, while the stem `" pharmaceutic"`
//! matches both `"Pharmaceutical"` and `"Pharmaceuticals"`.
//!
//! When a string carries both company and academic indicators the academic
//! indicator wins (see [`classify_affiliation`]).

use tracing::{debug, trace};

use crate::models::{Author, ClassificationResult, Paper, ResolvedPaper};

/// Company indicators, matched against normalized text
const COMPANY_INDICATORS: &[&str] = &[
    // Legal-form suffixes (whole words)
    " inc ",
    " incorporated",
    " corp ",
    " corporation",
    " co ltd ",
    " ltd ",
    " limited",
    " llc ",
    " llp ",
    " plc ",
    " gmbh ",
    " bv ",
    " company",
    // Industry keywords (stems)
    " pharma ",
    " pharmaceutic",
    " biopharm",
    " biotech ",
    " biotechnologies",
    " therapeutics",
    " bioscience",
    " biologics",
    " diagnostics",
    " life sciences",
];

/// Academic and public-sector indicators, matched against normalized text
const ACADEMIC_INDICATORS: &[&str] = &[
    " universit",
    " college",
    " institut",
    " national institute",
    " school",
    " hospital",
    " academy",
    " faculty",
    " medical center",
    " medical centre",
    " cancer center",
    " cancer centre",
    " clinic ",
    " nih ",
    " cnrs ",
    " inserm ",
];

/// Legal forms that double as postal abbreviations (Nevada, Aargau)
///
/// These count only as the last word of a segment that also names something,
/// so "Bayer AG" matches but "Reno, NV, USA" and "Aarau, AG" do not.
const TRAILING_ONLY_FORMS: &[&str] = &["ag", "nv"];

/// Email domain labels that mark an academic or governmental mailbox
const INSTITUTIONAL_DOMAIN_LABELS: &[&str] = &["edu", "ac", "gov", "mil", "nhs"];

/// Legal-form words that are not a company name on their own
const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "co",
    "ltd",
    "limited",
    "llc",
    "llp",
    "plc",
    "gmbh",
    "ag",
    "bv",
    "nv",
];

/// How a single affiliation string was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffiliationKind {
    /// University, hospital, public institute
    Academic,
    /// Company indicator present and no academic indicator
    Company,
    /// Neither vocabulary matched
    Unknown,
}

fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len() + 2);
    normalized.push(' ');
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '&' {
            normalized.push(c);
        } else {
            normalized.push(' ');
        }
    }
    normalized.push(' ');
    normalized
}

fn contains_any(normalized: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|token| normalized.contains(token))
}

/// Whether `text` contains a company indicator such as "Inc." or "Pharmaceuticals"
///
/// Academic indicators are not consulted here; use [`classify_affiliation`]
/// to apply the academic-wins rule.
///
/// ```
/// use pubmed_affiliations::affiliations::is_likely_company;
///
/// assert!(is_likely_company("Pfizer Inc."));
/// assert!(!is_likely_company("University of California"));
/// ```
pub fn is_likely_company(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    contains_any(&normalize(text), COMPANY_INDICATORS) || has_trailing_legal_form(text)
}

fn has_trailing_legal_form(text: &str) -> bool {
    text.split([',', ';']).any(|segment| {
        let normalized = normalize(segment);
        let words: Vec<&str> = normalized.split_whitespace().collect();
        match words.split_last() {
            Some((last, rest)) => !rest.is_empty() && TRAILING_ONLY_FORMS.contains(last),
            None => false,
        }
    })
}

/// Whether `text` contains an academic indicator such as "University" or "Hospital"
///
/// ```
/// use pubmed_affiliations::affiliations::is_likely_academic;
///
/// assert!(is_likely_academic("Stanford University"));
/// assert!(!is_likely_academic("AstraZeneca Inc."));
/// ```
pub fn is_likely_academic(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    contains_any(&normalize(text), ACADEMIC_INDICATORS)
}

/// Whether `email` belongs to a non-institutional domain
///
/// This is an exclusion test: any well-formed domain without an `edu`, `ac`,
/// `gov`, `mil` or `nhs` label counts as a company domain. Empty input and
/// addresses without a dotted domain return false.
///
/// ```
/// use pubmed_affiliations::affiliations::is_company_email;
///
/// assert!(is_company_email("john.doe@pharma.com"));
/// assert!(!is_company_email("scientist@university.edu"));
/// assert!(!is_company_email(""));
/// ```
pub fn is_company_email(email: &str) -> bool {
    let Some((_, domain)) = email.trim().rsplit_once('@') else {
        return false;
    };

    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }

    // The first label is the organization's own name ("edu.example.com" is not special)
    !labels[1..]
        .iter()
        .any(|label| INSTITUTIONAL_DOMAIN_LABELS.contains(label))
}

/// Classify one affiliation string, academic indicators taking precedence
pub fn classify_affiliation(text: &str) -> AffiliationKind {
    if is_likely_academic(text) {
        AffiliationKind::Academic
    } else if is_likely_company(text) {
        AffiliationKind::Company
    } else {
        AffiliationKind::Unknown
    }
}

/// Pull the organization name out of a company affiliation
///
/// Returns the first comma- or semicolon-separated segment classified as a
/// company. A segment made only of a legal suffix ("Inc.") is joined with
/// the segment before it. Returns `None` for academic or unknown text.
///
/// ```
/// use pubmed_affiliations::affiliations::extract_company_name;
///
/// assert_eq!(
///     extract_company_name("Oncology R&D, Novartis Pharmaceuticals, Basel, Switzerland"),
///     Some("Novartis Pharmaceuticals".to_string())
/// );
/// assert_eq!(extract_company_name("Stanford University"), None);
/// ```
pub fn extract_company_name(text: &str) -> Option<String> {
    if classify_affiliation(text) != AffiliationKind::Company {
        return None;
    }

    let segments: Vec<&str> = text
        .split([',', ';'])
        .map(|segment| segment.trim().trim_end_matches('.').trim())
        .filter(|segment| !segment.is_empty())
        .collect();

    for (index, segment) in segments.iter().enumerate() {
        if classify_affiliation(segment) != AffiliationKind::Company {
            continue;
        }
        if is_bare_suffix(segment) && index > 0 {
            return Some(format!("{}, {}", segments[index - 1], segment));
        }
        return Some((*segment).to_string());
    }

    Some(text.trim().to_string())
}

fn is_bare_suffix(segment: &str) -> bool {
    let normalized = normalize(segment);
    let mut words = normalized.split_whitespace().peekable();
    words.peek().is_some() && words.all(|word| LEGAL_SUFFIXES.contains(&word))
}

/// Whether a single author should be reported as non-academic
///
/// An author is non-academic when one of their affiliations is
/// company-classified, or when their email domain is non-institutional and
/// none of their affiliations is academic.
fn is_non_academic(author: &Author, company_affiliations: &[&String]) -> bool {
    if !company_affiliations.is_empty() {
        return true;
    }

    let has_academic_affiliation = author
        .affiliations
        .iter()
        .any(|affiliation| classify_affiliation(affiliation) == AffiliationKind::Academic);

    !has_academic_affiliation && author.contact_email().is_some_and(is_company_email)
}

/// Find the authors of `paper` with industry affiliations
///
/// Returns the non-academic author names (input order, duplicates kept),
/// their verbatim company affiliation strings (author order, then
/// affiliation order) and the email of the first corresponding author that
/// has one.
pub fn identify_company_authors(paper: &Paper) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for author in &paper.authors {
        let company_affiliations: Vec<&String> = author
            .affiliations
            .iter()
            .filter(|affiliation| classify_affiliation(affiliation) == AffiliationKind::Company)
            .collect();

        if is_non_academic(author, &company_affiliations) {
            debug!(
                pmid = %paper.pubmed_id,
                author = %author.name,
                companies = ?company_affiliations
                    .iter()
                    .filter_map(|affiliation| extract_company_name(affiliation))
                    .collect::<Vec<_>>(),
                "Flagged non-academic author"
            );
            result.non_academic_authors.push(author.name.clone());
            result
                .company_affiliations
                .extend(company_affiliations.into_iter().cloned());
        } else {
            trace!(pmid = %paper.pubmed_id, author = %author.name, "Author treated as academic");
        }
    }

    result.corresponding_email = paper
        .authors
        .iter()
        .filter(|author| author.is_corresponding)
        .find_map(|author| author.contact_email())
        .map(str::to_string);

    result
}

/// Classify a paper and keep the fields needed for export
pub fn resolve_paper(paper: &Paper) -> ResolvedPaper {
    ResolvedPaper {
        pubmed_id: paper.pubmed_id.clone(),
        title: paper.title.clone(),
        publication_date: paper.publication_date.clone(),
        classification: identify_company_authors(paper),
    }
}

/// [`resolve_paper`] over a slice, order preserved
pub fn resolve_papers(papers: &[Paper]) -> Vec<ResolvedPaper> {
    papers.iter().map(resolve_paper).collect()
}
