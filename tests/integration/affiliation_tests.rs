//! Integration tests for author classification through the public API

mod common;

use pubmed_affiliations::{
    AffiliationKind, Author, Paper, PubMedXmlParser, classify_affiliation,
    identify_company_authors, resolve_paper, resolve_papers,
};
use rstest::rstest;

use common::{EFETCH_TWO_PAPERS, academic_paper, industry_paper};

fn paper_with(authors: Vec<Author>) -> Paper {
    Paper {
        pubmed_id: "1".to_string(),
        title: "Paper".to_string(),
        publication_date: "2024".to_string(),
        authors,
    }
}

#[test]
fn test_industry_paper_classification() {
    let result = identify_company_authors(&industry_paper());

    assert_eq!(result.non_academic_authors, vec!["Doe, Jane", "Smith, Bob"]);
    assert_eq!(
        result.company_affiliations,
        vec!["Pfizer Inc.", "Moderna Inc."]
    );
    assert_eq!(
        result.corresponding_email.as_deref(),
        Some("jane.doe@pfizer.com")
    );
}

#[test]
fn test_academic_paper_has_no_company_authors() {
    let resolved = resolve_paper(&academic_paper());

    assert!(!resolved.has_non_academic_authors());
    assert!(resolved.classification.company_affiliations.is_empty());
    assert_eq!(
        resolved.classification.corresponding_email.as_deref(),
        Some("ann@stanford.edu")
    );
}

#[test]
fn test_paper_without_authors() {
    let result = identify_company_authors(&paper_with(vec![]));

    assert!(result.non_academic_authors.is_empty());
    assert!(result.company_affiliations.is_empty());
    assert_eq!(result.corresponding_email, None);
}

#[test]
fn test_mixed_affiliations_keep_only_company_strings() {
    let author = Author::new("Lin, Wei")
        .with_affiliation("Genentech, Inc., South San Francisco, CA")
        .with_affiliation("University of California, San Francisco");

    let result = identify_company_authors(&paper_with(vec![author]));

    assert_eq!(result.non_academic_authors, vec!["Lin, Wei"]);
    assert_eq!(
        result.company_affiliations,
        vec!["Genentech, Inc., South San Francisco, CA"]
    );
}

#[rstest]
#[case::company_email_without_affiliation(Author::new("A").with_email("a@biotech.io"), true)]
#[case::academic_email_without_affiliation(Author::new("B").with_email("b@mit.edu"), false)]
#[case::company_email_with_academic_affiliation(
    Author::new("C").with_affiliation("Yale University").with_email("c@gmail.com"),
    false
)]
#[case::company_email_with_unknown_affiliation(
    Author::new("E").with_affiliation("Boston, MA, USA").with_email("e@moderna.com"),
    true
)]
#[case::no_affiliation_no_email(Author::new("D"), false)]
fn test_email_fallback(#[case] author: Author, #[case] non_academic: bool) {
    let result = identify_company_authors(&paper_with(vec![author]));

    assert_eq!(!result.non_academic_authors.is_empty(), non_academic);
    assert!(result.company_affiliations.is_empty());
}

#[test]
fn test_resolve_papers_preserves_order() {
    let resolved = resolve_papers(&[academic_paper(), industry_paper()]);

    let ids: Vec<&str> = resolved.iter().map(|p| p.pubmed_id.as_str()).collect();
    assert_eq!(ids, vec!["87654321", "12345678"]);
}

#[test]
fn test_classify_parsed_efetch_response() {
    let papers = PubMedXmlParser::parse_papers_from_xml(EFETCH_TWO_PAPERS).unwrap();
    assert_eq!(papers.len(), 2);

    let kinds: Vec<AffiliationKind> = papers[0]
        .authors
        .iter()
        .flat_map(|author| author.affiliations.iter())
        .map(|affiliation| classify_affiliation(affiliation))
        .collect();
    assert_eq!(
        kinds,
        vec![AffiliationKind::Company, AffiliationKind::Academic]
    );

    let resolved = resolve_papers(&papers);
    assert_eq!(
        resolved[0].classification.non_academic_authors,
        vec!["Jane Doe"]
    );
    assert!(!resolved[1].has_non_academic_authors());
}

#[test]
fn test_email_in_address_only_affiliation_flags_author() {
    let xml = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
    <PubmedArticle>
        <MedlineCitation>
            <PMID Version="1">38000003</PMID>
            <Article>
                <Journal>
                    <JournalIssue><PubDate><Year>2024</Year></PubDate></JournalIssue>
                </Journal>
                <ArticleTitle>Self-amplifying RNA dosing</ArticleTitle>
                <AuthorList>
                    <Author>
                        <LastName>Doe</LastName>
                        <ForeName>Jane</ForeName>
                        <AffiliationInfo>
                            <Affiliation>Cambridge, MA, USA. Electronic address: jane@modernatx.com.</Affiliation>
                        </AffiliationInfo>
                    </Author>
                    <Author>
                        <LastName>Roe</LastName>
                        <ForeName>Rick</ForeName>
                        <AffiliationInfo>
                            <Affiliation>Boston, MA, USA. rick@bu.edu</Affiliation>
                        </AffiliationInfo>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
</PubmedArticleSet>"#;

    let paper = PubMedXmlParser::parse_paper_from_xml(xml, "38000003").unwrap();
    assert_eq!(paper.authors[0].email.as_deref(), Some("jane@modernatx.com"));

    let result = identify_company_authors(&paper);
    assert_eq!(result.non_academic_authors, vec!["Jane Doe"]);
    assert!(result.company_affiliations.is_empty());
    assert_eq!(
        result.corresponding_email.as_deref(),
        Some("jane@modernatx.com")
    );
}
