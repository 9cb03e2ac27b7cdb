//! Sample test extraction and table rendering
//!
//! Judge exports ship sample I/O in one of a few shapes, depending on the
//! export vintage:
//!
//! 1. labeled rows: `div.sample-test` holding `div.input`/`div.output`
//!    wrappers around `<pre>` blocks;
//! 2. a plain two-cell table, one `<tr>` per sample;
//! 3. bare `<pre>` blocks, paired in document order.
//!
//! The first shape found wins. Extraction preserves source order and the
//! literal text of each cell: internal line breaks survive, only trailing
//! newlines are trimmed. An empty or unrecognized samples region yields an
//! empty list, and rendering an empty list yields `None` rather than an
//! empty table.

use markup5ever_rcdom::Handle;

use crate::dom;
use crate::escape::escape_tex;

/// One (input, output) sample pair, immutable after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTest {
    pub input: String,
    pub output: String,
}

/// Extract ordered sample pairs from a samples container.
pub fn extract_samples(container: &Handle) -> Vec<SampleTest> {
    let mut rows = dom::find_all_by_class(container, "sample-test");
    if rows.is_empty()
        && let Some(table) = dom::find_first_tag(container, "table")
    {
        rows = dom::find_all_tags(&table, "tr");
    }

    if rows.is_empty() {
        // Last resort: pair the container's literal blocks in order.
        let pres = dom::find_all_tags(container, "pre");
        return pres
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| SampleTest {
                input: pre_text(&pair[0]),
                output: pre_text(&pair[1]),
            })
            .collect();
    }

    samples_from_rows(rows)
}

/// Extract samples from labeled `sample-test` rows only.
///
/// Used when the export lacks the `sample-tests` wrapper and the search has
/// to start from the statement root, where the table and literal-block
/// fallbacks would misfire on unrelated markup.
pub fn extract_labeled_samples(root: &Handle) -> Vec<SampleTest> {
    samples_from_rows(dom::find_all_by_class(root, "sample-test"))
}

fn samples_from_rows(rows: Vec<Handle>) -> Vec<SampleTest> {
    let mut samples = Vec::new();
    for row in rows {
        let labeled_input = dom::find_first_by_class(&row, "input")
            .and_then(|cell| dom::find_first_tag(&cell, "pre"));
        let labeled_output = dom::find_first_by_class(&row, "output")
            .and_then(|cell| dom::find_first_tag(&cell, "pre"));

        let (input_pre, output_pre) = match (labeled_input, labeled_output) {
            (Some(input), Some(output)) => (input, output),
            _ => {
                let pres = dom::find_all_tags(&row, "pre");
                if pres.len() >= 2 {
                    (pres[0].clone(), pres[1].clone())
                } else {
                    continue;
                }
            }
        };

        samples.push(SampleTest {
            input: pre_text(&input_pre),
            output: pre_text(&output_pre),
        });
    }
    samples
}

/// Literal text of a `<pre>` block.
///
/// Text runs are rejoined with newlines (exports wrap each line in its own
/// tag), carriage returns dropped, and trailing newlines trimmed. Internal
/// line breaks are preserved.
fn pre_text(node: &Handle) -> String {
    dom::text_runs(node)
        .join("\n")
        .replace('\r', "")
        .trim_end_matches('\n')
        .to_string()
}

/// Render sample pairs as a two-column literal-preserving table.
///
/// Each cell is escaped, internal line breaks become hard row breaks, and
/// the cell is typeset in a ragged-right typewriter minipage. Returns `None`
/// for an empty sample list.
pub fn render_sample_table(samples: &[SampleTest]) -> Option<String> {
    if samples.is_empty() {
        return None;
    }

    let mut lines = vec![
        "\\begin{longtable}{|p{0.48\\textwidth}|p{0.48\\textwidth}|}".to_string(),
        "\\hline".to_string(),
        "\\textbf{Input} & \\textbf{Output} \\\\ \\hline".to_string(),
    ];
    for sample in samples {
        lines.push(format!(
            "{} & {} \\\\ \\hline",
            format_cell(&sample.input),
            format_cell(&sample.output)
        ));
    }
    lines.push("\\end{longtable}\n".to_string());
    Some(lines.join("\n"))
}

fn format_cell(text: &str) -> String {
    let escaped = escape_tex(text).replace('\n', "\\\\");
    format!(
        "\\begin{{minipage}}[t]{{\\linewidth}}\\raggedright\\ttfamily\n{}\n\\end{{minipage}}",
        escaped
    )
}
