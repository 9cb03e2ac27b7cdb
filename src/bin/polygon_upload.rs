//! Upload judge HTML problem statements to Polygon.
//!
//! Problems are named `<prefix>-a`, `<prefix>-b`, … in statement order.
//! Re-running the same import updates the existing problems; a failure on
//! one problem is reported and the run continues with the next.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use statement_converter::{
    PolygonClient, load_config, parse_statements, suffix_from_index, upload_problem,
};

#[derive(Parser)]
#[command(
    name = "polygon-upload",
    about = "Upload judge HTML problem statements to Polygon"
)]
struct Args {
    /// Path to the exported contest HTML file
    html: PathBuf,
    /// Prefix for Polygon problem names (suffix -a, -b, ... is appended)
    prefix: String,
    /// Path to the TOML file with Polygon credentials
    #[arg(long, default_value = "polygon.toml")]
    config: PathBuf,
    /// Polygon statement language code
    #[arg(long, default_value = "russian")]
    lang: String,
    /// Commit message applied after each problem is saved
    #[arg(long, default_value = "Imported from HTML")]
    commit_message: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = load_config(&args.config)?;
    let client = PolygonClient::new(config)?;

    let html = std::fs::read(&args.html)
        .with_context(|| format!("cannot read '{}'", args.html.display()))?;
    let base_dir = args.html.parent().unwrap_or(Path::new("."));
    let statements = parse_statements(&html, base_dir)?;
    if statements.is_empty() {
        bail!("no problem statements found in the HTML file");
    }

    let mut existing_problems = match client.list_problems() {
        Ok(problems) => problems,
        Err(err) => {
            warn!(error = %err, "failed to fetch existing problems, uploads will try to create");
            Default::default()
        }
    };

    let mut failures = 0usize;
    for (idx, statement) in statements.iter().enumerate() {
        let polygon_name = format!("{}-{}", args.prefix, suffix_from_index(idx));
        if let Err(err) = upload_problem(
            &client,
            statement,
            &polygon_name,
            &args.lang,
            Some(&args.commit_message),
            &mut existing_problems,
        ) {
            error!(%polygon_name, error = %err, "upload failed");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} problems failed to upload", statements.len());
    }
    println!("Uploaded {} problems", statements.len());
    Ok(())
}
