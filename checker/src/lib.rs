//! Checker frontends for property documents
//!
//! Reads documents from files, drives the `props` parser, and renders
//! failures as source-annotated diagnostics.

use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ariadne::{Label, Report, ReportKind, Source};
use props::{Document, ParseError};

/// Read and parse a property document.
///
/// On failure the diagnostic is rendered to stderr and an error is
/// returned so callers can exit nonzero.
pub fn check_file(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path.display().to_string();
    match props::parse_document(&source) {
        Ok(document) => Ok(document),
        Err(error) => {
            report(&name, &source, &error)?;
            Err(anyhow!("failed to parse {}", name))
        }
    }
}

/// Render one parse error against its source on stderr.
pub fn report(name: &str, source: &str, error: &ParseError) -> Result<()> {
    let span = char_span(source, error.position());
    Report::build(ReportKind::Error, name, span.start)
        .with_message(error.to_string())
        .with_label(Label::new((name, span)).with_message(label_text(error)))
        .finish()
        .eprint((name, Source::from(source)))?;
    Ok(())
}

/// Convert a byte offset from the parser into a one-character span in
/// the character offsets ariadne works with.
fn char_span(source: &str, position: usize) -> Range<usize> {
    let total = source.chars().count();
    let start = source
        .get(..position)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(total);
    let end = (start + 1).min(total).max(start);
    start..end
}

fn label_text(error: &ParseError) -> &'static str {
    match error {
        ParseError::UnexpectedToken { .. } => "the grammar could not continue here",
        ParseError::IncompleteParse { .. } => "trailing input starts here",
        ParseError::LiteralOutOfRange { .. } => "literal out of range",
        ParseError::NestingTooDeep { .. } => "nesting limit exceeded here",
    }
}
