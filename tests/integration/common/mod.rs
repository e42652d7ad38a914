//! Shared fixtures for the integration tests

#![allow(dead_code)]

use pubmed_affiliations::{Author, Paper};

/// EFetch response with one industry paper and one academic paper
pub const EFETCH_TWO_PAPERS: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
    <PubmedArticle>
        <MedlineCitation Status="MEDLINE" Owner="NLM">
            <PMID Version="1">38000001</PMID>
            <Article PubModel="Print">
                <Journal>
                    <JournalIssue CitedMedium="Internet">
                        <PubDate><Year>2023</Year><Month>Nov</Month><Day>02</Day></PubDate>
                    </JournalIssue>
                    <Title>Nature Biotechnology</Title>
                </Journal>
                <ArticleTitle>Lipid nanoparticle delivery of <i>mRNA</i> vaccines</ArticleTitle>
                <AuthorList CompleteYN="Y">
                    <Author ValidYN="Y">
                        <LastName>Doe</LastName>
                        <ForeName>Jane</ForeName>
                        <Initials>J</Initials>
                        <AffiliationInfo>
                            <Affiliation>Moderna Therapeutics, Cambridge, MA, USA. jane.doe@modernatx.com</Affiliation>
                        </AffiliationInfo>
                    </Author>
                    <Author ValidYN="Y">
                        <LastName>Roe</LastName>
                        <ForeName>Rick</ForeName>
                        <Initials>R</Initials>
                        <AffiliationInfo>
                            <Affiliation>Department of Medicine, Harvard Medical School, Boston, MA, USA.</Affiliation>
                        </AffiliationInfo>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
    <PubmedArticle>
        <MedlineCitation Status="MEDLINE" Owner="NLM">
            <PMID Version="1">38000002</PMID>
            <Article PubModel="Print">
                <Journal>
                    <JournalIssue CitedMedium="Internet">
                        <PubDate><Year>2024</Year><Month>Jan</Month></PubDate>
                    </JournalIssue>
                    <Title>Cell</Title>
                </Journal>
                <ArticleTitle>T cell memory after vaccination</ArticleTitle>
                <AuthorList CompleteYN="Y">
                    <Author ValidYN="Y">
                        <LastName>Smith</LastName>
                        <ForeName>Alice</ForeName>
                        <Initials>A</Initials>
                        <AffiliationInfo>
                            <Affiliation>Stanford University, Stanford, CA, USA.</Affiliation>
                        </AffiliationInfo>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
</PubmedArticleSet>"#;

pub const ESEARCH_TWO_IDS: &str = r#"{
    "header": {"type": "esearch", "version": "0.3"},
    "esearchresult": {
        "count": "2",
        "retmax": "2",
        "retstart": "0",
        "idlist": ["38000001", "38000002"]
    }
}"#;

pub fn industry_paper() -> Paper {
    Paper {
        pubmed_id: "12345678".to_string(),
        title: "Test Paper 1".to_string(),
        publication_date: "2023/01/15".to_string(),
        authors: vec![
            Author::new("Doe, Jane")
                .with_affiliation("Pfizer Inc.")
                .with_email("jane.doe@pfizer.com")
                .corresponding(),
            Author::new("Smith, Bob").with_affiliation("Moderna Inc."),
            Author::new("Roe, Rick").with_affiliation("Harvard University"),
        ],
    }
}

pub fn academic_paper() -> Paper {
    Paper {
        pubmed_id: "87654321".to_string(),
        title: "Academic Study".to_string(),
        publication_date: "2022".to_string(),
        authors: vec![
            Author::new("Lee, Ann")
                .with_affiliation("Stanford University")
                .with_email("ann@stanford.edu")
                .corresponding(),
        ],
    }
}
