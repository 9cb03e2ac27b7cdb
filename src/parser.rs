//! HTML5 parser using html5ever
//!
//! Judge exports are real-world web pages: unclosed tags, stray markup and
//! legacy encodings are the norm. Parsing goes through Mozilla's html5ever,
//! which implements the WHATWG algorithm and recovers from malformed input
//! the same way a browser would, after the bytes have been transcoded to
//! UTF-8 according to the detected charset.
//!
//! # Examples
//!
//! ```rust
//! use statement_converter::parser::parse_html;
//!
//! let dom = parse_html(b"<html><body><div class=\"legend\">Hi").expect("parse");
//! let _root = &dom.document;
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;
use std::borrow::Cow;

use crate::charset::detect_charset;
use crate::error::ConversionError;

/// Parse HTML bytes into a DOM tree with charset detection.
///
/// The charset cascade (BOM, meta tags, UTF-8 default) is applied first and
/// the input transcoded before html5ever sees it.
///
/// # Errors
///
/// - `ConversionError::InvalidInput` when the input is empty
/// - `ConversionError::EncodingError` when the bytes are invalid for the
///   detected charset or the charset label is unsupported
pub fn parse_html(html: &[u8]) -> Result<RcDom, ConversionError> {
    if html.is_empty() {
        return Err(ConversionError::InvalidInput(
            "HTML input is empty".to_string(),
        ));
    }

    let detected_charset = detect_charset(html);
    let utf8_str = decode_html_to_utf8(html, &detected_charset)?;

    // Feed the UTF-8 string sink directly; no Read/Cursor indirection.
    let dom = parse_document(RcDom::default(), Default::default()).one(utf8_str.as_ref());

    Ok(dom)
}

fn decode_html_to_utf8<'a>(
    html: &'a [u8],
    detected_charset: &str,
) -> Result<Cow<'a, str>, ConversionError> {
    if detected_charset.eq_ignore_ascii_case("UTF-8") {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            ConversionError::EncodingError(format!(
                "Invalid UTF-8 at byte position {}: {} (detected charset: {})",
                e.valid_up_to(),
                e,
                detected_charset
            ))
        });
    }

    let encoding =
        encoding_rs::Encoding::for_label(detected_charset.as_bytes()).ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Unsupported charset '{}' for HTML parsing",
                detected_charset
            ))
        })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Invalid byte sequence for charset '{}'",
                detected_charset
            ))
        })
}
