//! Convert a judge HTML export into a printable LaTeX document.
//!
//! Extracted images are written next to the output file so the emitted
//! `\includegraphics` directives resolve at compile time.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use statement_converter::{parse_statements, render_document};

#[derive(Parser)]
#[command(
    name = "html2tex",
    about = "Convert judge HTML problem statements to a LaTeX document"
)]
struct Args {
    /// Path to the exported contest HTML file
    input_html: PathBuf,
    /// Path of the .tex file to write
    output_tex: PathBuf,
    /// Contest title for the document header
    #[arg(long)]
    contest_title: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let html = std::fs::read(&args.input_html)
        .with_context(|| format!("cannot read '{}'", args.input_html.display()))?;
    let base_dir = args.input_html.parent().unwrap_or(Path::new("."));

    let statements = parse_statements(&html, base_dir)?;
    if statements.is_empty() {
        bail!("no problem statements found in the HTML file");
    }

    let tex = render_document(&statements, args.contest_title.as_deref());
    std::fs::write(&args.output_tex, tex)
        .with_context(|| format!("cannot write '{}'", args.output_tex.display()))?;

    let resource_dir = args.output_tex.parent().unwrap_or(Path::new("."));
    let mut resource_count = 0usize;
    for statement in &statements {
        for resource in &statement.resources {
            let path = resource_dir.join(&resource.name);
            std::fs::write(&path, &resource.content)
                .with_context(|| format!("cannot write resource '{}'", path.display()))?;
            resource_count += 1;
        }
    }

    println!(
        "Wrote {} ({} problems, {} resources)",
        args.output_tex.display(),
        statements.len(),
        resource_count
    );
    Ok(())
}
