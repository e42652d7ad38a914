//! EFetch XML parsing
//!
//! Turns a `<PubmedArticleSet>` document into [`Paper`]s. Only the fields
//! needed for affiliation classification are read: PMID, title, publication
//! date and the author list with affiliations.

use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::{PubMedError, Result};
use crate::models::{Author, Paper};

pub struct PubMedXmlParser;

impl PubMedXmlParser {
    /// Parse the article with `pmid` from an EFetch response
    ///
    /// Returns `ArticleNotFound` when the document holds no such article.
    #[instrument(skip(xml), fields(pmid = %pmid, xml_size = xml.len()))]
    pub fn parse_paper_from_xml(xml: &str, pmid: &str) -> Result<Paper> {
        let papers = Self::parse_papers_from_xml(xml)?;
        let mut papers = papers.into_iter();

        match papers.find(|paper| paper.pubmed_id == pmid) {
            Some(paper) => Ok(paper),
            None => {
                debug!("No matching article in XML, article not found");
                Err(PubMedError::ArticleNotFound {
                    pmid: pmid.to_string(),
                })
            }
        }
    }

    /// Parse every `<PubmedArticle>` in an EFetch response, document order
    ///
    /// Articles without a PMID are skipped.
    #[instrument(skip(xml), fields(xml_size = xml.len()))]
    pub fn parse_papers_from_xml(xml: &str) -> Result<Vec<Paper>> {
        let cleaned = strip_inline_html_tags(xml);
        let mut reader = Reader::from_str(&cleaned);
        reader.config_mut().trim_text(true);

        let mut papers = Vec::new();
        let mut state = ArticleState::default();

        let mut in_article = false;
        let mut in_article_title = false;
        let mut in_pub_date = false;
        let mut in_author_list = false;
        let mut in_author = false;
        let mut in_affiliation = false;
        let mut current_field: Option<AuthorField> = None;
        let mut in_pmid = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"PubmedArticle" => {
                        in_article = true;
                        state = ArticleState::default();
                    }
                    b"PMID" if in_article && state.pmid.is_empty() => in_pmid = true,
                    b"ArticleTitle" if in_article => in_article_title = true,
                    b"PubDate" if in_article => in_pub_date = true,
                    b"AuthorList" if in_article => in_author_list = true,
                    b"Author" if in_author_list => {
                        in_author = true;
                        state.author = AuthorState::default();
                    }
                    b"LastName" if in_author => current_field = Some(AuthorField::LastName),
                    b"ForeName" if in_author => current_field = Some(AuthorField::ForeName),
                    b"Initials" if in_author => current_field = Some(AuthorField::Initials),
                    b"CollectiveName" if in_author => {
                        current_field = Some(AuthorField::CollectiveName)
                    }
                    b"Affiliation" if in_author => {
                        in_affiliation = true;
                        state.author.affiliation.clear();
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"PubmedArticle" => {
                        if in_article {
                            match state.finish() {
                                Some(paper) => papers.push(paper),
                                None => warn!("Skipping PubmedArticle without PMID"),
                            }
                        }
                        in_article = false;
                    }
                    b"PMID" => in_pmid = false,
                    b"ArticleTitle" => in_article_title = false,
                    b"PubDate" => in_pub_date = false,
                    b"AuthorList" => in_author_list = false,
                    b"Author" => {
                        if in_author {
                            if let Some(author) = state.author.finish() {
                                state.authors.push(author);
                            }
                            in_author = false;
                        }
                    }
                    b"LastName" | b"ForeName" | b"Initials" | b"CollectiveName" => {
                        current_field = None
                    }
                    b"Affiliation" => {
                        if in_affiliation {
                            let text = state.author.affiliation.trim().to_string();
                            if !text.is_empty() {
                                state.author.affiliations.push(text);
                            }
                            in_affiliation = false;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|_| PubMedError::XmlParseError {
                            message: "Failed to decode XML text".to_string(),
                        })?
                        .into_owned();

                    if in_pmid {
                        state.pmid = text.trim().to_string();
                    } else if in_article_title {
                        push_spaced(&mut state.title, &text);
                    } else if in_pub_date {
                        push_spaced(&mut state.pub_date, &text);
                    } else if in_affiliation {
                        push_spaced(&mut state.author.affiliation, &text);
                    } else if let Some(field) = current_field {
                        state.author.set(field, text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(PubMedError::XmlParseError {
                        message: format!(
                            "XML parsing error at position {}: {}",
                            reader.error_position(),
                            e
                        ),
                    });
                }
                _ => {}
            }
        }

        debug!(papers_parsed = papers.len(), "Completed XML parsing");
        Ok(papers)
    }
}

#[derive(Debug, Clone, Copy)]
enum AuthorField {
    LastName,
    ForeName,
    Initials,
    CollectiveName,
}

#[derive(Default)]
struct AuthorState {
    last_name: String,
    fore_name: String,
    initials: String,
    collective_name: String,
    affiliation: String,
    affiliations: Vec<String>,
}

impl AuthorState {
    fn set(&mut self, field: AuthorField, text: String) {
        match field {
            AuthorField::LastName => self.last_name = text,
            AuthorField::ForeName => self.fore_name = text,
            AuthorField::Initials => self.initials = text,
            AuthorField::CollectiveName => push_spaced(&mut self.collective_name, &text),
        }
    }

    fn finish(&mut self) -> Option<Author> {
        let name = format_author_name(
            &self.last_name,
            &self.fore_name,
            &self.initials,
            &self.collective_name,
        )?;
        let affiliations = std::mem::take(&mut self.affiliations);
        let email = affiliations
            .iter()
            .find_map(|affiliation| extract_email_from_text(affiliation));

        Some(Author {
            name,
            is_corresponding: email.is_some(),
            email,
            affiliations,
        })
    }
}

#[derive(Default)]
struct ArticleState {
    pmid: String,
    title: String,
    pub_date: String,
    authors: Vec<Author>,
    author: AuthorState,
}

impl ArticleState {
    fn finish(&mut self) -> Option<Paper> {
        if self.pmid.is_empty() {
            return None;
        }
        Some(Paper {
            pubmed_id: std::mem::take(&mut self.pmid),
            title: std::mem::take(&mut self.title),
            publication_date: std::mem::take(&mut self.pub_date),
            authors: std::mem::take(&mut self.authors),
        })
    }
}

fn push_spaced(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Strip inline formatting tags (`<i>`, `<sup>`, ...) that split titles and affiliations
fn strip_inline_html_tags(xml: &str) -> String {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold)>")
            .expect("Failed to compile inline tag regex")
    });

    re.replace_all(xml, "").into_owned()
}

/// Extract the first email address embedded in affiliation text
///
/// PubMed appends contact addresses as "... USA. jane@pfizer.com." or
/// "... Electronic address: jane@pfizer.com."
fn extract_email_from_text(text: &str) -> Option<String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
            .expect("Failed to compile email regex")
    });

    re.find(text).map(|m| m.as_str().to_string())
}

/// Format an author name, "ForeName LastName" when both are present
fn format_author_name(
    last_name: &str,
    fore_name: &str,
    initials: &str,
    collective_name: &str,
) -> Option<String> {
    let name = match (fore_name.is_empty(), last_name.is_empty()) {
        (false, false) => format!("{} {}", fore_name, last_name),
        (true, false) if !initials.is_empty() => format!("{} {}", initials, last_name),
        (true, false) => last_name.to_string(),
        (false, true) => fore_name.to_string(),
        (true, true) => collective_name.to_string(),
    };

    let name = name.trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}
