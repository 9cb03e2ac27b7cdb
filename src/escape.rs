//! LaTeX text escaping and math glyph normalization
//!
//! Statement text arrives as arbitrary Unicode and must be neutralized before
//! it is embedded in LaTeX source. Two passes live here:
//!
//! - [`escape_tex`]: per-character substitution of the ten LaTeX control
//!   characters; everything else passes through unchanged.
//! - [`normalize_math_glyphs`]: replacement of the mathematical Unicode
//!   glyphs that judges emit inline (≤, ≥, ×, …) with their LaTeX command
//!   equivalents. Applied once per rendered section, after the tree walk.
//!
//! Both functions are pure and total.

/// Escape LaTeX control characters in a text run.
///
/// The substitutions are fixed one-to-one mappings:
///
/// | Input | Output                 |
/// |-------|------------------------|
/// | `\`   | `\textbackslash{}`     |
/// | `{`   | `\{`                   |
/// | `}`   | `\}`                   |
/// | `#`   | `\#`                   |
/// | `$`   | `\$`                   |
/// | `%`   | `\%`                   |
/// | `&`   | `\&`                   |
/// | `_`   | `\_`                   |
/// | `^`   | `\textasciicircum{}`   |
/// | `~`   | `\textasciitilde{}`    |
///
/// Text that is already free of control characters is returned unchanged, so
/// the function is idempotent-safe on such input.
pub fn escape_tex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            '#' => escaped.push_str("\\#"),
            '$' => escaped.push_str("\\$"),
            '%' => escaped.push_str("\\%"),
            '&' => escaped.push_str("\\&"),
            '_' => escaped.push_str("\\_"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Replace mathematical Unicode glyphs with LaTeX commands.
///
/// Judge HTML frequently carries comparison and operator glyphs as literal
/// Unicode rather than TeX markup. The replacement set is deliberately small
/// and fixed; unknown glyphs pass through untouched.
pub fn normalize_math_glyphs(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '≤' => normalized.push_str("\\leq"),
            '≥' => normalized.push_str("\\geq"),
            '≠' => normalized.push_str("\\neq"),
            '±' => normalized.push_str("\\pm"),
            '×' => normalized.push_str("\\times"),
            '÷' => normalized.push_str("\\div"),
            '·' | '⋅' => normalized.push_str("\\cdot"),
            _ => normalized.push(ch),
        }
    }
    normalized
}
