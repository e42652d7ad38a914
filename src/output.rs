//! Export of classified papers
//!
//! [`format_output_data`] flattens classified papers into [`OutputRow`]s,
//! [`write_csv`] serializes them with a fixed six-column header.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{OutputRow, ResolvedPaper};

/// Separator for multi-valued cells; never a comma, so cells stay readable in CSV
pub const MULTI_VALUE_SEPARATOR: &str = "; ";

/// Map classified papers to export rows, one row per paper, order preserved
pub fn format_output_data(papers: &[ResolvedPaper]) -> Vec<OutputRow> {
    papers.iter().map(format_row).collect()
}

fn format_row(paper: &ResolvedPaper) -> OutputRow {
    let classification = &paper.classification;
    OutputRow {
        pubmed_id: paper.pubmed_id.clone(),
        title: paper.title.clone(),
        publication_date: paper.publication_date.clone(),
        non_academic_authors: classification
            .non_academic_authors
            .join(MULTI_VALUE_SEPARATOR),
        company_affiliations: classification
            .company_affiliations
            .join(MULTI_VALUE_SEPARATOR),
        corresponding_email: classification
            .corresponding_email
            .clone()
            .unwrap_or_default(),
    }
}

/// Write `rows` as CSV, header first
///
/// The header is written even when `rows` is empty.
pub fn write_csv<W: Write>(rows: &[OutputRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(OutputRow::HEADERS)?;
    for row in rows {
        csv_writer.write_record(row.to_record())?;
    }
    csv_writer.flush()?;

    debug!(rows = rows.len(), "Wrote CSV records");
    Ok(())
}

/// Create (or truncate) `path` and write `rows` into it as CSV
pub fn write_csv_file<P: AsRef<Path>>(rows: &[OutputRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(rows, file)?;
    info!(path = %path.display(), rows = rows.len(), "Saved results to CSV");
    Ok(())
}
