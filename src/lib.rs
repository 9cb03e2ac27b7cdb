//! Statement Converter - HTML to LaTeX for competitive programming
//!
//! This library turns problem statements exported from a judge's web UI
//! into LaTeX documents and into Polygon API statement fields.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 parsing using html5ever
//! - `charset`: character encoding detection for saved pages
//! - `converter`: the recursive LaTeX renderer
//! - `escape`: LaTeX escaping and math glyph normalization
//! - `resources`: image extraction and deduplication
//! - `samples`: sample test extraction and table rendering
//! - `statement`: per-problem extraction (header, sections, samples)
//! - `document`: whole-document LaTeX assembly
//! - `polygon`: signed Polygon API client and upload flow
//! - `config`: credentials loading
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use statement_converter::{parse_statements, render_document};
//!
//! let html = std::fs::read("contest.html").expect("read export");
//! let statements = parse_statements(&html, Path::new(".")).expect("parse");
//! let tex = render_document(&statements, Some("Training Round"));
//! std::fs::write("contest.tex", tex).expect("write document");
//! ```

// Module declarations
pub mod charset;
pub mod config;
pub mod converter;
pub mod document;
pub mod dom;
pub mod error;
pub mod escape;
pub mod parser;
pub mod polygon;
pub mod resources;
pub mod samples;
pub mod statement;

// Re-export main types for convenience
pub use config::{PolygonConfig, load_config};
pub use converter::{LatexConverter, RenderContext, RenderOptions};
pub use document::render_document;
pub use error::{ConversionError, PolygonError};
pub use parser::parse_html;
pub use polygon::{PolygonClient, suffix_from_index, upload_problem};
pub use resources::{ResourceCollector, StatementResource};
pub use samples::SampleTest;
pub use statement::{ProblemStatement, parse_statements};
