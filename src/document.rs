//! LaTeX document assembly
//!
//! Takes already-extracted [`ProblemStatement`]s and lays them out as one
//! printable article: preamble, centered contest title, one `\section*` per
//! problem with a bold limits line, the rendered sections, a samples table,
//! and a page break between problems. The converter did the hard work; this
//! module only concatenates finished fragments.

use crate::escape::escape_tex;
use crate::samples::render_sample_table;
use crate::statement::ProblemStatement;

/// Render a complete LaTeX document for a set of statements.
///
/// `contest_title` lands in the centered page header; when absent a generic
/// "Problems" header is used.
pub fn render_document(statements: &[ProblemStatement], contest_title: Option<&str>) -> String {
    let header_title = match contest_title {
        Some(title) => escape_tex(title),
        None => "Problems".to_string(),
    };

    let mut body_parts = Vec::new();
    for (idx, statement) in statements.iter().enumerate() {
        body_parts.push(render_problem(statement));
        if idx + 1 != statements.len() {
            body_parts.push("\\clearpage".to_string());
        }
    }
    let body = body_parts.join("\n\n");

    format!(
        "\\documentclass[12pt]{{article}}\n\
         \\usepackage[utf8]{{inputenc}}\n\
         \\usepackage[T2A]{{fontenc}}\n\
         \\usepackage[russian]{{babel}}\n\
         \\usepackage{{geometry}}\n\
         \\usepackage{{graphicx}}\n\
         \\usepackage{{amsmath,amssymb}}\n\
         \\usepackage{{enumitem}}\n\
         \\usepackage{{longtable}}\n\
         \\usepackage{{hyperref}}\n\
         \\geometry{{a4paper, margin=1in}}\n\
         \\setlength{{\\parindent}}{{0pt}}\n\
         \\setlength{{\\parskip}}{{6pt}}\n\
         \\begin{{document}}\n\
         \\begin{{center}}\\Large {header_title}\\end{{center}}\\bigskip\n\
         {body}\n\
         \\end{{document}}\n"
    )
}

fn render_problem(statement: &ProblemStatement) -> String {
    let mut pieces: Vec<String> = vec![format!(
        "\\section*{{{}}}",
        escape_tex(&statement.original_title)
    )];

    let mut limits = Vec::new();
    if let Some(ms) = statement.time_limit_ms {
        limits.push(format!("Time limit: {}", format_time_limit(ms)));
    }
    if let Some(mb) = statement.memory_limit_mb {
        limits.push(format!("Memory limit: {} MB", mb));
    }
    if let Some(input_file) = &statement.input_file {
        limits.push(format!("Input: {}", escape_tex(input_file)));
    }
    if let Some(output_file) = &statement.output_file {
        limits.push(format!("Output: {}", escape_tex(output_file)));
    }
    if !limits.is_empty() {
        pieces.push(format!(
            "\\textbf{{{}}}\\\\ \\smallskip\n",
            limits.join(" \\quad ")
        ));
    }

    if let Some(legend) = &statement.legend {
        pieces.push(format!("{}\n", legend));
    }
    if let Some(input_spec) = &statement.input_spec {
        pieces.push("\\subsubsection*{Input}".to_string());
        pieces.push(format!("{}\n", input_spec));
    }
    if let Some(output_spec) = &statement.output_spec {
        pieces.push("\\subsubsection*{Output}".to_string());
        pieces.push(format!("{}\n", output_spec));
    }
    if let Some(notes) = &statement.notes {
        pieces.push("\\subsubsection*{Notes}".to_string());
        pieces.push(format!("{}\n", notes));
    }

    if let Some(table) = render_sample_table(&statement.samples) {
        pieces.push("\\subsubsection*{Examples}".to_string());
        pieces.push(table);
    }

    pieces.join("\n")
}

/// Whole seconds read as seconds, everything else as milliseconds.
fn format_time_limit(ms: u32) -> String {
    if ms.is_multiple_of(1000) {
        format!("{} s", ms / 1000)
    } else {
        format!("{} ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::SampleTest;

    fn statement() -> ProblemStatement {
        ProblemStatement {
            original_title: "A. Sum of Two".to_string(),
            title: "Sum of Two".to_string(),
            time_limit_ms: Some(1000),
            memory_limit_mb: Some(256),
            input_file: Some("standard input".to_string()),
            output_file: Some("standard output".to_string()),
            legend: Some("Add $a+b$.".to_string()),
            input_spec: Some("Two integers.".to_string()),
            output_spec: Some("One integer.".to_string()),
            notes: None,
            samples: vec![SampleTest {
                input: "1 2".to_string(),
                output: "3".to_string(),
            }],
            resources: Vec::new(),
        }
    }

    #[test]
    fn wraps_body_in_article_preamble() {
        let tex = render_document(&[statement()], Some("Round #1"));
        assert!(tex.starts_with("\\documentclass[12pt]{article}"));
        assert!(tex.contains("\\usepackage{graphicx}"));
        assert!(tex.contains("\\begin{center}\\Large Round \\#1\\end{center}"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn renders_sections_in_order() {
        let tex = render_document(&[statement()], None);
        let section = tex.find("\\section*{A. Sum of Two}").expect("title");
        let limits = tex.find("\\textbf{Time limit: 1 s").expect("limits");
        let input = tex.find("\\subsubsection*{Input}").expect("input");
        let output = tex.find("\\subsubsection*{Output}").expect("output");
        let examples = tex.find("\\subsubsection*{Examples}").expect("examples");
        assert!(section < limits && limits < input && input < output && output < examples);
        assert!(!tex.contains("\\subsubsection*{Notes}"));
    }

    #[test]
    fn separates_problems_with_page_breaks() {
        let tex = render_document(&[statement(), statement(), statement()], None);
        assert_eq!(tex.matches("\\clearpage").count(), 2);
    }

    #[test]
    fn defaults_the_contest_header() {
        let tex = render_document(&[statement()], None);
        assert!(tex.contains("\\Large Problems"));
    }

    #[test]
    fn fractional_time_limits_stay_in_milliseconds() {
        let mut st = statement();
        st.time_limit_ms = Some(1500);
        let tex = render_document(&[st], None);
        assert!(tex.contains("Time limit: 1500 ms"));
    }
}
