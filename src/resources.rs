//! Statement resource extraction
//!
//! Statements reference images either as paths relative to the exported HTML
//! file or as absolute URLs on the judge's CDN. The [`ResourceCollector`]
//! resolves each reference to bytes, registers the bytes once per display
//! name and hands back the `\includegraphics` directive the renderer embeds
//! in its output. The collected set travels with the statement so the
//! document writer (or the Polygon uploader) can materialize the files.
//!
//! Every failure mode here degrades instead of aborting: an unreachable URL,
//! a missing file or undecodable image bytes cost one image, not the
//! conversion. Failures are reported through `tracing` warnings.
//!
//! One collector instance is scoped to one statement; dedup names are not
//! shared across statements.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::escape::escape_tex;

/// Timeout for remote image fetches
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// An extracted binary asset referenced by a statement.
#[derive(Debug, Clone)]
pub struct StatementResource {
    /// Display name, unique within one statement
    pub name: String,
    /// Raw bytes as fetched or read
    pub content: Vec<u8>,
    /// Pixel dimensions, when the bytes decode as a known image format
    pub dimensions: Option<(u32, u32)>,
}

/// Per-statement image registry.
///
/// Resources are keyed by display name: the final path segment of the
/// reference, or a synthesized `image_<n>.png` for remote URLs without one.
/// The first registration of a name wins; later references to the same name
/// reuse the stored bytes. Iteration order of [`ResourceCollector::resources`]
/// is first-registration order.
pub struct ResourceCollector {
    base_dir: PathBuf,
    resources: Vec<StatementResource>,
}

impl ResourceCollector {
    /// Create a collector resolving relative references against `base_dir`
    /// (the directory of the source HTML file).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            resources: Vec::new(),
        }
    }

    /// Resolve an image reference and return its inclusion directive.
    ///
    /// `inline` selects the bare `\includegraphics` form for mid-formula
    /// embedding; otherwise the directive is a centered block. Both carry a
    /// `[bb=0 0 <w> <h>]` bounding box when the bytes decode as an image.
    ///
    /// Returns `None` (never an error) when the reference is empty, the
    /// fetch or read fails, or the file does not exist.
    pub fn add_image(&mut self, src: Option<&str>, inline: bool) -> Option<String> {
        let src = src?.trim();
        if src.is_empty() {
            return None;
        }

        let (name, content) = if is_remote(src) {
            self.fetch_remote(src)?
        } else {
            self.read_local(src)?
        };

        let dimensions = read_dimensions(&content);
        if !self.resources.iter().any(|r| r.name == name) {
            self.resources.push(StatementResource {
                name: name.clone(),
                content,
                dimensions,
            });
        }

        let include_opts = match dimensions {
            Some((width, height)) => format!("[bb=0 0 {} {}]", width, height),
            None => String::new(),
        };

        if inline {
            // The bare form is pasted into running text, so the name goes
            // through the LaTeX escaper.
            Some(format!(
                "\\includegraphics{}{{{}}}",
                include_opts,
                escape_tex(&name)
            ))
        } else {
            Some(format!(
                "\n\\begin{{center}}\n  \\includegraphics{}{{{}}}\n\\end{{center}}\n",
                include_opts, name
            ))
        }
    }

    /// Collected resources so far, in first-registration order.
    pub fn resources(&self) -> &[StatementResource] {
        &self.resources
    }

    /// Consume the collector and hand the resources to the assembler.
    pub fn into_resources(self) -> Vec<StatementResource> {
        self.resources
    }

    fn fetch_remote(&self, src: &str) -> Option<(String, Vec<u8>)> {
        let name = remote_name(src)
            .unwrap_or_else(|| format!("image_{}.png", self.resources.len() + 1));

        let response = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .and_then(|http| http.get(src).send())
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes());
        match response {
            Ok(bytes) => Some((name, bytes.to_vec())),
            Err(err) => {
                warn!(url = src, error = %err, "failed to download image");
                None
            }
        }
    }

    fn read_local(&self, src: &str) -> Option<(String, Vec<u8>)> {
        let path = self.base_dir.join(src);
        if !path.exists() {
            warn!(image = src, "image not found on disk");
            return None;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image_{}.png", self.resources.len() + 1));
        match std::fs::read(&path) {
            Ok(content) => Some((name, content)),
            Err(err) => {
                warn!(image = src, error = %err, "failed to read image");
                None
            }
        }
    }
}

/// True for the URL schemes fetched over the network.
fn is_remote(src: &str) -> bool {
    matches!(
        reqwest::Url::parse(src),
        Ok(url) if url.scheme() == "http" || url.scheme() == "https"
    )
}

/// Final path segment of a remote URL, when it has one.
fn remote_name(src: &str) -> Option<String> {
    let url = reqwest::Url::parse(src).ok()?;
    let name = Path::new(url.path()).file_name()?.to_string_lossy().into_owned();
    if name.is_empty() { None } else { Some(name) }
}

/// Best-effort pixel dimensions; decode failures are logged and omitted.
fn read_dimensions(content: &[u8]) -> Option<(u32, u32)> {
    let probe = image::ImageReader::new(Cursor::new(content))
        .with_guessed_format()
        .map_err(|err| err.to_string())
        .and_then(|reader| reader.into_dimensions().map_err(|err| err.to_string()));
    match probe {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            warn!(error = %err, "failed to read image size");
            None
        }
    }
}
