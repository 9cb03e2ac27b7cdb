//! End-to-end conversion tests over a realistic contest export.

use std::path::Path;

use statement_converter::{parse_statements, render_document};

/// 3x2 RGB PNG
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x02, 0x08, 0x02, 0x00, 0x00, 0x00, 0x12,
    0x16, 0xF1, 0x4D, 0x00, 0x00, 0x00, 0x10, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8,
    0xCF, 0xC0, 0x00, 0x41, 0x0C, 0x70, 0x16, 0x00, 0x41, 0xD2, 0x05, 0xFB, 0x87, 0xF0, 0xB9,
    0x48, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const CONTEST: &str = r#"<html>
<head><meta charset="utf-8"><title>Export</title></head>
<body>
<div class="problem-statement">
  <div class="header">
    <div class="title">A. Watermelon</div>
    <div class="time-limit"><div class="property-title">time limit per test</div>1 second</div>
    <div class="memory-limit"><div class="property-title">memory limit per test</div>64 megabytes</div>
    <div class="input-file"><div class="property-title">input</div>standard input</div>
    <div class="output-file"><div class="property-title">output</div>standard output</div>
  </div>
  <div class="legend">
    <p>Pete bought a watermelon weighing <span class="tex-span">w</span> kilos.</p>
    <p>Decide whether it splits into two <b>even</b> parts.</p>
    <p><img src="melon.png" alt=""></p>
  </div>
  <div class="input-specification">
    <div class="section-title">Input</div>
    <p>One integer <span class="tex-span">w</span> (1 &le; <span class="tex-span">w</span> &le; 100).</p>
  </div>
  <div class="output-specification">
    <div class="section-title">Output</div>
    <p>Print <code>YES</code> or <code>NO</code>.</p>
  </div>
  <div class="sample-tests">
    <div class="sample-test">
      <div class="input"><pre>8
</pre></div>
      <div class="output"><pre>YES
</pre></div>
    </div>
    <div class="sample-test">
      <div class="input"><pre>5
</pre></div>
      <div class="output"><pre>NO
</pre></div>
    </div>
  </div>
  <div class="note">
    <div class="section-title">Note</div>
    <p>For <span class="tex-span">w = 8</span> the answer is 2 + 6.</p>
  </div>
</div>
<div class="problem-statement">
  <div class="header">
    <div class="title">B. Theatre Square</div>
    <div class="time-limit"><div class="property-title">time limit per test</div>2 seconds</div>
    <div class="memory-limit"><div class="property-title">memory limit per test</div>256 megabytes</div>
  </div>
  <div class="legend">
    <p>Cover an <span class="tex-span">n &times; m</span> square with
    <script type="math/tex">a \cdot a</script> flagstones.</p>
    <ol><li>no cutting</li><li>full coverage</li></ol>
  </div>
</div>
</body>
</html>"#;

fn parsed(dir: &Path) -> Vec<statement_converter::ProblemStatement> {
    parse_statements(CONTEST.as_bytes(), dir).expect("parse")
}

#[test]
fn extracts_both_problems_in_order() {
    let statements = parsed(Path::new("."));
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].title, "Watermelon");
    assert_eq!(statements[1].title, "Theatre Square");
}

#[test]
fn extracts_header_metadata() {
    let statements = parsed(Path::new("."));
    assert_eq!(statements[0].time_limit_ms, Some(1000));
    assert_eq!(statements[0].memory_limit_mb, Some(64));
    assert_eq!(statements[1].time_limit_ms, Some(2000));
    assert_eq!(statements[1].memory_limit_mb, Some(256));
    assert_eq!(
        statements[0].input_file.as_deref(),
        Some("input standard input")
    );
}

#[test]
fn renders_formula_spans_and_typefaces() {
    let statements = parsed(Path::new("."));
    let legend = statements[0].legend.as_deref().expect("legend");
    assert!(legend.contains("weighing $w$ kilos"));
    assert!(legend.contains("two \\textbf{even} parts"));

    let output_spec = statements[0].output_spec.as_deref().expect("output spec");
    assert!(output_spec.contains("\\texttt{YES} or \\texttt{NO}"));
}

#[test]
fn normalizes_math_glyphs_in_sections() {
    let statements = parsed(Path::new("."));
    let input_spec = statements[0].input_spec.as_deref().expect("input spec");
    assert!(input_spec.contains("1 \\leq $w$ \\leq 100"));
    assert!(!input_spec.contains('≤'));
}

#[test]
fn math_script_passes_through_verbatim() {
    let statements = parsed(Path::new("."));
    let legend = statements[1].legend.as_deref().expect("legend");
    assert!(legend.contains("$a \\cdot a$"));
    assert!(legend.contains("$n \\times m$"));
    assert!(legend.contains("\\begin{enumerate}"));
    assert!(legend.contains("  \\item no cutting"));
}

#[test]
fn samples_keep_source_order() {
    let statements = parsed(Path::new("."));
    let samples = &statements[0].samples;
    assert_eq!(samples.len(), 2);
    assert_eq!((samples[0].input.as_str(), samples[0].output.as_str()), ("8", "YES"));
    assert_eq!((samples[1].input.as_str(), samples[1].output.as_str()), ("5", "NO"));
    assert!(statements[1].samples.is_empty());
}

#[test]
fn missing_image_degrades_and_leaves_no_resources() {
    // melon.png does not exist relative to "."; the legend still renders.
    let statements = parsed(Path::new("."));
    assert!(statements[0].legend.is_some());
    assert!(statements[0].resources.is_empty());
}

#[test]
fn present_image_is_collected_once_per_statement() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("melon.png"), TINY_PNG).expect("write");

    let statements = parsed(dir.path());
    let resources = &statements[0].resources;
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].name, "melon.png");
    assert_eq!(resources[0].dimensions, Some((3, 2)));

    let legend = statements[0].legend.as_deref().expect("legend");
    assert!(legend.contains("\\begin{center}"));
    assert!(legend.contains("\\includegraphics[bb=0 0 3 2]{melon.png}"));

    // The second statement has its own collector and no images.
    assert!(statements[1].resources.is_empty());
}

#[test]
fn document_assembles_every_fragment() {
    let statements = parsed(Path::new("."));
    let tex = render_document(&statements, Some("Beta Round #1"));

    assert!(tex.starts_with("\\documentclass[12pt]{article}"));
    assert!(tex.contains("\\begin{center}\\Large Beta Round \\#1\\end{center}"));
    assert!(tex.contains("\\section*{A. Watermelon}"));
    assert!(tex.contains("\\section*{B. Theatre Square}"));
    assert!(tex.contains("Time limit: 1 s"));
    assert!(tex.contains("\\subsubsection*{Examples}"));
    assert!(tex.contains("\\begin{longtable}"));
    assert_eq!(tex.matches("\\clearpage").count(), 1);
    assert!(tex.trim_end().ends_with("\\end{document}"));

    let first = tex.find("A. Watermelon").expect("first problem");
    let second = tex.find("B. Theatre Square").expect("second problem");
    assert!(first < second);
}
