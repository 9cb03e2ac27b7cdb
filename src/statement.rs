//! Problem statement extraction
//!
//! A judge export is one HTML page holding any number of
//! `div.problem-statement` containers. This module walks each container and
//! produces a [`ProblemStatement`]: header metadata (title, limits, I/O
//! files), the four rendered sections, ordered sample pairs and the images
//! the sections referenced.
//!
//! Extraction is tolerant by construction. A missing header field or section
//! becomes `None`, unparseable limits become `None`, and a page without
//! statement containers falls back to treating `<body>` as one statement.
//! The only hard failures are at the parse front-end (empty input, broken
//! encoding).

use std::path::Path;

use markup5ever_rcdom::Handle;

use crate::converter::{LatexConverter, RenderOptions};
use crate::dom;
use crate::error::ConversionError;
use crate::parser::parse_html;
use crate::resources::{ResourceCollector, StatementResource};
use crate::samples::{SampleTest, extract_labeled_samples, extract_samples};

/// Section classes that can never be the legend.
const NON_LEGEND_CLASSES: &[&str] = &[
    "header",
    "input-specification",
    "output-specification",
    "sample-tests",
    "note",
];

/// One extracted problem statement.
#[derive(Debug, Clone)]
pub struct ProblemStatement {
    /// Title as it appears in the export, index included ("A. Watermelon")
    pub original_title: String,
    /// Title with the leading index stripped ("Watermelon")
    pub title: String,
    /// Time limit in milliseconds, when the header parses
    pub time_limit_ms: Option<u32>,
    /// Memory limit in megabytes, when the header parses
    pub memory_limit_mb: Option<u32>,
    /// Input file label, verbatim from the header
    pub input_file: Option<String>,
    /// Output file label, verbatim from the header
    pub output_file: Option<String>,
    /// Rendered legend; `None` when the section is missing or empty
    pub legend: Option<String>,
    /// Rendered input specification
    pub input_spec: Option<String>,
    /// Rendered output specification
    pub output_spec: Option<String>,
    /// Rendered notes
    pub notes: Option<String>,
    /// Ordered sample pairs
    pub samples: Vec<SampleTest>,
    /// Images referenced by any section, deduplicated per statement
    pub resources: Vec<StatementResource>,
}

/// Parse a judge export into its problem statements.
///
/// `base_dir` is the directory relative image references resolve against,
/// normally the directory of the HTML file. A page without
/// `div.problem-statement` containers is treated as a single statement
/// rooted at `<body>`.
pub fn parse_statements(
    html: &[u8],
    base_dir: &Path,
) -> Result<Vec<ProblemStatement>, ConversionError> {
    let dom = parse_html(html)?;

    let mut roots = dom::find_all_by_class(&dom.document, "problem-statement");
    if roots.is_empty()
        && let Some(body) = dom::find_first_tag(&dom.document, "body")
    {
        roots.push(body);
    }

    Ok(roots
        .iter()
        .enumerate()
        .map(|(index, root)| extract_statement(root, base_dir, index + 1))
        .collect())
}

fn extract_statement(root: &Handle, base_dir: &Path, number: usize) -> ProblemStatement {
    let mut resources = ResourceCollector::new(base_dir);

    let header = dom::find_first_by_class(root, "header");
    let original_title = header
        .as_ref()
        .and_then(|header| dom::find_first_by_class(header, "title"))
        .map(|title| collapse_whitespace(&dom::text_content(&title)))
        .filter(|title| !title.is_empty())
        .or_else(|| {
            dom::find_first_tag(root, "h1")
                .map(|h1| collapse_whitespace(&dom::text_content(&h1)))
                .filter(|title| !title.is_empty())
        })
        .unwrap_or_else(|| format!("Problem {}", number));
    let title = strip_title_index(&original_title);

    let header_text = |class: &str| {
        header
            .as_ref()
            .and_then(|header| dom::find_first_by_class(header, class))
            .map(|node| collapse_whitespace(&dom::text_runs(&node).join(" ")))
            .filter(|text| !text.is_empty())
    };
    let time_limit_ms = header_text("time-limit").as_deref().and_then(parse_time_limit);
    let memory_limit_mb = header_text("memory-limit")
        .as_deref()
        .and_then(parse_memory_limit);
    let input_file = header_text("input-file");
    let output_file = header_text("output-file");

    let plain = LatexConverter::new();
    let sectioned = LatexConverter::with_options(RenderOptions::skipping(["section-title"]));

    let legend = find_legend(root)
        .and_then(|node| plain.render_section(&node, &mut resources));
    let input_spec = dom::find_first_by_class(root, "input-specification")
        .and_then(|node| sectioned.render_section(&node, &mut resources));
    let output_spec = dom::find_first_by_class(root, "output-specification")
        .and_then(|node| sectioned.render_section(&node, &mut resources));
    let notes = dom::find_first_by_class(root, "note")
        .and_then(|node| sectioned.render_section(&node, &mut resources));

    let samples = match dom::find_first_by_class(root, "sample-tests") {
        Some(wrapper) => extract_samples(&wrapper),
        None => extract_labeled_samples(root),
    };

    ProblemStatement {
        original_title,
        title,
        time_limit_ms,
        memory_limit_mb,
        input_file,
        output_file,
        legend,
        input_spec,
        output_spec,
        notes,
        samples,
        resources: resources.into_resources(),
    }
}

/// The legend div, or (for exports that drop the class) the first direct
/// `div` child that is not one of the known section containers.
fn find_legend(root: &Handle) -> Option<Handle> {
    if let Some(legend) = dom::find_first_by_class(root, "legend") {
        return Some(legend);
    }
    for child in dom::child_elements(root) {
        if dom::element_name(&child) != Some("div") {
            continue;
        }
        let classes = dom::classes(&child);
        if !classes
            .iter()
            .any(|class| NON_LEGEND_CLASSES.contains(&class.as_str()))
        {
            return Some(child);
        }
    }
    None
}

/// Strip the leading problem index from a title ("A. Watermelon" →
/// "Watermelon"). Titles without a dot pass through unchanged.
fn strip_title_index(title: &str) -> String {
    match title.split_once('.') {
        Some((_, rest)) => rest.trim().to_string(),
        None => title.to_string(),
    }
}

/// Parse a header time limit into milliseconds.
///
/// The first numeric token wins ("time limit per test 2 seconds" → 2000);
/// decimal commas are accepted ("1,5 seconds" → 1500). Unknown units yield
/// `None`.
pub fn parse_time_limit(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let value = lower
        .split_whitespace()
        .map(|token| token.replace(',', "."))
        .find(|token| is_numeric(token))
        .and_then(|token| token.parse::<f64>().ok())?;

    if lower.contains("millisecond") {
        Some(value as u32)
    } else if lower.contains("second") {
        Some((value * 1000.0) as u32)
    } else {
        None
    }
}

/// Parse a header memory limit into megabytes.
///
/// Reads the unit token following the first numeric token: `m…` is taken
/// as megabytes, `g…` as gigabytes.
pub fn parse_memory_limit(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    for (idx, part) in parts.iter().enumerate() {
        if !is_numeric(part) {
            continue;
        }
        let Ok(value) = part.parse::<f64>() else {
            continue;
        };
        let unit = parts.get(idx + 1).copied().unwrap_or("");
        if unit.starts_with('m') {
            return Some(value as u32);
        }
        if unit.starts_with('g') {
            return Some((value * 1024.0) as u32);
        }
    }
    None
}

/// Digits with at most one decimal point.
fn is_numeric(token: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for ch in token.chars() {
        if ch == '.' {
            dots += 1;
        } else if ch.is_ascii_digit() {
            digits += 1;
        } else {
            return false;
        }
    }
    digits > 0 && dots <= 1
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
