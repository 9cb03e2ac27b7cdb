//! Character encoding detection for saved judge pages
//!
//! Statement HTML arrives as files saved from a judge's web UI, so there is
//! no transport-level charset to consult. Detection is a two-level cascade:
//!
//! 1. Unicode byte-order mark (UTF-8 / UTF-16)
//! 2. HTML meta charset tags (`<meta charset>` and the HTML4
//!    `http-equiv="Content-Type"` form)
//!
//! falling back to UTF-8. Older Codeforces exports and mirrors are commonly
//! windows-1251, which the meta scan picks up.
//!
//! Only the first 1024 bytes are scanned; charset declarations that matter
//! appear in `<head>`.

use regex::Regex;
use std::sync::OnceLock;

/// Default charset when no declaration is found
const DEFAULT_CHARSET: &str = "UTF-8";

/// Maximum bytes to scan for meta tags
const META_SCAN_LIMIT: usize = 1024;

/// Detect the charset of an HTML document.
///
/// Returns a normalized (uppercase) charset label suitable for
/// `encoding_rs::Encoding::for_label`.
///
/// # Examples
///
/// ```rust
/// use statement_converter::charset::detect_charset;
///
/// let html = "<html><head><meta charset=\"windows-1251\"></head></html>".as_bytes();
/// assert_eq!(detect_charset(html), "WINDOWS-1251");
///
/// assert_eq!(detect_charset(b"<html><body>No charset</body></html>"), "UTF-8");
/// ```
pub fn detect_charset(html: &[u8]) -> String {
    if let Some(charset) = detect_bom(html) {
        return charset.to_string();
    }

    if let Some(charset) = extract_charset_from_html(html) {
        return normalize_charset(&charset);
    }

    DEFAULT_CHARSET.to_string()
}

/// Detect a Unicode byte-order mark.
fn detect_bom(html: &[u8]) -> Option<&'static str> {
    if html.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some("UTF-8")
    } else if html.starts_with(&[0xFF, 0xFE]) {
        Some("UTF-16LE")
    } else if html.starts_with(&[0xFE, 0xFF]) {
        Some("UTF-16BE")
    } else {
        None
    }
}

/// Extract a charset declaration from HTML meta tags.
///
/// Supported forms:
/// - HTML5: `<meta charset="UTF-8">`
/// - HTML4: `<meta http-equiv="Content-Type" content="text/html; charset=UTF-8">`
///
/// Returns `Some(charset)` if found, `None` otherwise. Scanning is limited to
/// the document prefix and tolerates non-UTF-8 bytes (lossy decode is fine for
/// locating an ASCII-only declaration).
pub fn extract_charset_from_html(html: &[u8]) -> Option<String> {
    let scan_limit = std::cmp::min(html.len(), META_SCAN_LIMIT);
    let html_str = String::from_utf8_lossy(&html[..scan_limit]);

    static HTML5_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html5_regex =
        HTML5_REGEX.get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok());
    if let Some(regex) = html5_regex.as_ref()
        && let Some(caps) = regex.captures(&html_str)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }

    static HTML4_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html4_regex = HTML4_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
        )
        .ok()
    });
    if let Some(regex) = html4_regex.as_ref()
        && let Some(caps) = regex.captures(&html_str)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }

    None
}

/// Normalize a charset label to uppercase.
fn normalize_charset(charset: &str) -> String {
    charset.trim().to_uppercase()
}
