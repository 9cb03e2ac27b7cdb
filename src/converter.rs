//! LaTeX renderer - transforms statement DOM subtrees to LaTeX
//!
//! This module is the core of the crate: a depth-first, recursive walk over
//! an rcdom subtree that emits LaTeX text. Each section of a problem
//! statement (legend, input specification, output specification, notes) is
//! rendered independently through [`LatexConverter::render_section`], sharing
//! one [`ResourceCollector`] per statement so image dedup spans sections.
//!
//! # Dispatch
//!
//! [`LatexConverter::render`] dispatches on the node kind:
//!
//! - text leaves are escaped with [`escape_tex`];
//! - elements whose class matches the caller's skip set, and the platform's
//!   `mathjax*` preview spans, render as nothing;
//! - `script type="math/*"` carries an already-typeset formula: its raw text
//!   is wrapped in `$…$` verbatim;
//! - `br`, `img`, `sup`/`sub`, emphasis, inline `code`, lists and `pre` each
//!   have a dedicated handler;
//! - elements carrying a formula marker wrap their rendered children in a
//!   single `$…$` pair; an ancestor that already opened formula mode
//!   suppresses re-wrapping, as does content that is already delimited;
//! - block containers (`p`, `div`, `li`, `ul`, `ol`) trim their content and
//!   end it with a line separator; everything else concatenates its children
//!   with no extra boundary.
//!
//! # Formula detection
//!
//! The judge marks already-typeset math with `tex`-bearing class names
//! (`tex-span`, `tex-formula`, …). [`has_formula_marker`] reproduces that
//! convention as a substring test over the element's attribute values. It is
//! a heuristic by design: it mirrors the platform's own authoring convention
//! rather than attempting semantic inference.
//!
//! # Failure modes
//!
//! None. Malformed structure degrades: unknown elements fall back to child
//! concatenation, missing images render as nothing, empty sections come back
//! as `None`. Rendering never returns an error.

use std::collections::HashSet;

use markup5ever_rcdom::{Handle, NodeData};

use crate::dom;
use crate::escape::{escape_tex, normalize_math_glyphs};
use crate::resources::ResourceCollector;

/// Block-level containers: content is trimmed and newline-terminated.
const BLOCK_TAGS: &[&str] = &["p", "div", "li", "ul", "ol"];

/// Rendering context threaded through recursive calls.
///
/// Derived per call: a node renders under formula mode when the caller was
/// already inside a formula or the node itself carries a formula marker.
/// The context is never stored on nodes and never mutated in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    /// True when an ancestor (or the node itself) opened `$…$` mode
    pub inside_formula: bool,
}

/// Conversion options supplied per section kind.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Class tokens whose elements are dropped without recursion
    /// (e.g. `section-title` labels rendered separately by the assembler)
    pub skip_classes: HashSet<String>,
}

impl RenderOptions {
    /// Options with the given skip set.
    pub fn skipping<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip_classes: classes
                .into_iter()
                .map(|class| class.into().to_lowercase())
                .collect(),
        }
    }
}

/// True iff the element is flagged as pre-typeset formula content.
///
/// Scans every attribute value for the substring `tex`, case-insensitively.
/// Class lists are the usual carrier (`tex-span`, `tex-font-style-bf`), but
/// the check deliberately covers all attributes, single- and multi-token
/// values alike, matching the source platform's convention.
pub fn has_formula_marker(node: &Handle) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attr| attr.value.to_lowercase().contains("tex")),
        _ => false,
    }
}

/// Promote every internal line boundary to a paragraph boundary.
///
/// Post-process over an already-rendered section string; the tree walk is
/// not involved. Used for fields whose consumer treats single newlines as
/// soft breaks.
pub fn add_paragraph_breaks(text: &str) -> String {
    text.split('\n').collect::<Vec<_>>().join("\n\n")
}

/// Recursive LaTeX renderer for statement sections.
///
/// One converter is configured per section kind (the skip set differs);
/// the per-statement state lives in the [`ResourceCollector`] passed to
/// each call.
pub struct LatexConverter {
    options: RenderOptions,
}

impl Default for LatexConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl LatexConverter {
    /// Create a converter with an empty skip set.
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
        }
    }

    /// Create a converter with custom options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a whole section rooted at `root`.
    ///
    /// Walks the root's children, right-trims every output line, drops
    /// trailing blank lines, and applies math glyph normalization. Returns
    /// `None` when nothing remains: an absent result means "no such
    /// section", never an empty one.
    pub fn render_section(
        &self,
        root: &Handle,
        resources: &mut ResourceCollector,
    ) -> Option<String> {
        let mut raw = String::new();
        for child in root.children.borrow().iter() {
            raw.push_str(&self.render(child, RenderContext::default(), resources));
        }

        let mut lines: Vec<&str> = raw.lines().map(|line| line.trim_end()).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        let cleaned = lines.join("\n").trim().to_string();
        if cleaned.is_empty() {
            None
        } else {
            Some(normalize_math_glyphs(&cleaned))
        }
    }

    /// Render one node under the given context.
    ///
    /// Total over all node kinds; unrecognized elements fall back to child
    /// concatenation. Comments, doctypes and processing instructions render
    /// as nothing.
    pub fn render(
        &self,
        node: &Handle,
        ctx: RenderContext,
        resources: &mut ResourceCollector,
    ) -> String {
        match &node.data {
            NodeData::Text { contents } => escape_tex(&contents.borrow()),
            NodeData::Element { name, .. } => {
                let tag = name.local.as_ref().to_string();
                self.render_element(node, &tag, ctx, resources)
            }
            _ => String::new(),
        }
    }

    fn render_element(
        &self,
        node: &Handle,
        tag: &str,
        ctx: RenderContext,
        resources: &mut ResourceCollector,
    ) -> String {
        let classes = dom::classes(node);

        if classes
            .iter()
            .any(|class| self.options.skip_classes.contains(class))
        {
            return String::new();
        }
        // MathJax preview spans duplicate the math/tex script payload.
        if classes.iter().any(|class| class.starts_with("mathjax")) {
            return String::new();
        }

        match tag {
            "script" => return render_script(node),
            "br" => return "\n".to_string(),
            "img" => {
                let has_graphics_marker =
                    classes.iter().any(|class| class.contains("tex-graphics"));
                let inline = !has_graphics_marker
                    && classes.iter().any(|class| class.contains("tex-formula"));
                let src = dom::attr(node, "src");
                return resources
                    .add_image(src.as_deref(), inline)
                    .unwrap_or_default();
            }
            _ => {}
        }

        let node_is_formula = has_formula_marker(node);
        let ctx_here = RenderContext {
            inside_formula: ctx.inside_formula || node_is_formula,
        };

        // Scripted indices keep their math marker whenever self or any
        // ancestor is in formula mode; outside of it they degrade to plain
        // inline content.
        if tag == "sup" || tag == "sub" {
            let marker = if tag == "sup" { '^' } else { '_' };
            let content = self.render_children(node, ctx_here, resources);
            if ctx_here.inside_formula {
                return format!("{}{{{}}}", marker, content.trim());
            }
            return content;
        }

        if node_is_formula {
            let content = self.render_children(node, ctx_here, resources);
            let wrapped = if ctx.inside_formula {
                // An ancestor already opened formula mode: trim, never re-wrap.
                content.trim().to_string()
            } else {
                let stripped = content.trim();
                if !stripped.is_empty()
                    && !(stripped.starts_with('$') && stripped.ends_with('$'))
                {
                    format!("${}$", stripped)
                } else {
                    stripped.to_string()
                }
            };
            return self.finish_block(tag, wrapped);
        }

        match tag {
            "b" | "strong" => {
                format!(
                    "\\textbf{{{}}}",
                    self.render_children(node, ctx_here, resources)
                )
            }
            "em" | "i" => {
                format!(
                    "\\textit{{{}}}",
                    self.render_children(node, ctx_here, resources)
                )
            }
            "u" => {
                format!(
                    "\\underline{{{}}}",
                    self.render_children(node, ctx_here, resources)
                )
            }
            "code" => {
                format!(
                    "\\texttt{{{}}}",
                    self.render_children(node, ctx_here, resources)
                )
            }
            "ul" => self.render_list(node, false, ctx_here, resources),
            "ol" => self.render_list(node, true, ctx_here, resources),
            "pre" => {
                // Verbatim blocks keep their raw text; the environment
                // itself neutralizes the content.
                format!(
                    "\\begin{{verbatim}}\n{}\n\\end{{verbatim}}\n",
                    dom::text_content(node)
                )
            }
            _ => {
                let content = self.render_children(node, ctx_here, resources);
                self.finish_block(tag, content)
            }
        }
    }

    fn render_children(
        &self,
        node: &Handle,
        ctx: RenderContext,
        resources: &mut ResourceCollector,
    ) -> String {
        let mut output = String::new();
        for child in node.children.borrow().iter() {
            output.push_str(&self.render(child, ctx, resources));
        }
        output
    }

    /// Apply the block-boundary rule: paragraphs end with a blank line,
    /// other block containers with a single newline, inline content with
    /// nothing.
    fn finish_block(&self, tag: &str, content: String) -> String {
        if tag == "p" {
            format!("{}\n\n", content.trim())
        } else if BLOCK_TAGS.contains(&tag) {
            format!("{}\n", content.trim())
        } else {
            content
        }
    }

    fn render_list(
        &self,
        node: &Handle,
        ordered: bool,
        ctx: RenderContext,
        resources: &mut ResourceCollector,
    ) -> String {
        let mut items = String::new();
        for child in node.children.borrow().iter() {
            if dom::element_name(child) == Some("li") {
                let content = self.render_children(child, ctx, resources);
                items.push_str("  \\item ");
                items.push_str(content.trim());
                items.push('\n');
            }
        }
        let env = if ordered { "enumerate" } else { "itemize" };
        format!("\\begin{{{env}}}\n{items}\\end{{{env}}}\n")
    }
}

/// `script type="math/*"` nodes carry raw TeX; other scripts are dropped.
fn render_script(node: &Handle) -> String {
    let script_type = dom::attr(node, "type").unwrap_or_default();
    if script_type.starts_with("math/") {
        let content = dom::text_content(node);
        let content = content.trim();
        if !content.is_empty() {
            return format!("${}$", content);
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    fn fragment(html: &str) -> Handle {
        let dom = parse_html(html.as_bytes()).expect("parse");
        let handle = dom::find_first_tag(&dom.document, "body").expect("body");
        // Keep the parsed tree alive: rcdom's `Drop` clears the children of
        // every reachable node, including handles still held here.
        std::mem::forget(dom);
        handle
    }

    fn first_child_element(root: &Handle) -> Handle {
        dom::child_elements(root).into_iter().next().expect("child")
    }

    fn render_body(html: &str) -> Option<String> {
        let mut resources = ResourceCollector::new(".");
        LatexConverter::new().render_section(&fragment(html), &mut resources)
    }

    fn render_node(html: &str) -> String {
        let body = fragment(html);
        let node = first_child_element(&body);
        let mut resources = ResourceCollector::new(".");
        LatexConverter::new().render(&node, RenderContext::default(), &mut resources)
    }

    #[test]
    fn paragraph_with_bold_renders_with_paragraph_boundary() {
        assert_eq!(
            render_node("<p>Hello <b>world</b></p>"),
            "Hello \\textbf{world}\n\n"
        );
    }

    #[test]
    fn formula_marked_node_wraps_in_dollars() {
        assert_eq!(render_node("<span class=\"tex-span\">x+1</span>"), "$x+1$");
    }

    #[test]
    fn formula_wrapping_is_not_reentrant() {
        // Children that already produced a delimited formula are not
        // wrapped a second time.
        let rendered = render_node(
            "<span class=\"tex-span\"><script type=\"math/tex\">x+1</script></span>",
        );
        assert_eq!(rendered, "$x+1$");
    }

    #[test]
    fn nested_formula_markers_open_one_pair() {
        let rendered =
            render_node("<span class=\"tex-span\">a+<span class=\"tex-span\">b</span></span>");
        assert_eq!(rendered, "$a+b$");
    }

    #[test]
    fn unordered_list_keeps_item_order() {
        assert_eq!(
            render_node("<ul><li>A</li><li>B</li></ul>"),
            "\\begin{itemize}\n  \\item A\n  \\item B\n\\end{itemize}\n"
        );
    }

    #[test]
    fn ordered_list_uses_enumerate() {
        assert_eq!(
            render_node("<ol><li>first</li><li>second</li></ol>"),
            "\\begin{enumerate}\n  \\item first\n  \\item second\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn list_markup_between_items_is_ignored() {
        // Only direct li children become items.
        let rendered = render_node("<ul>\n<li>A</li>\n<li>B</li>\n</ul>");
        assert_eq!(
            rendered,
            "\\begin{itemize}\n  \\item A\n  \\item B\n\\end{itemize}\n"
        );
    }

    #[test]
    fn superscript_inside_formula_uses_math_marker() {
        assert_eq!(
            render_node("<span class=\"tex-span\">x<sup>2</sup></span>"),
            "$x^{2}$"
        );
        assert_eq!(
            render_node("<span class=\"tex-span\">a<sub>i</sub></span>"),
            "$a_{i}$"
        );
    }

    #[test]
    fn superscript_outside_formula_degrades_to_plain_content() {
        assert_eq!(render_node("<p>E = mc<sup>2</sup></p>"), "E = mc2\n\n");
    }

    #[test]
    fn marked_superscript_counts_as_its_own_formula_context() {
        assert_eq!(render_node("<sup class=\"tex-span\">2</sup>"), "^{2}");
    }

    #[test]
    fn line_break_renders_as_newline() {
        assert_eq!(render_node("<p>a<br>b</p>"), "a\nb\n\n");
    }

    #[test]
    fn emphasis_family_wraps_in_typeface_commands() {
        assert_eq!(render_node("<i>x</i>"), "\\textit{x}");
        assert_eq!(render_node("<em>x</em>"), "\\textit{x}");
        assert_eq!(render_node("<u>x</u>"), "\\underline{x}");
        assert_eq!(render_node("<strong>x</strong>"), "\\textbf{x}");
    }

    #[test]
    fn inline_code_uses_typewriter_command() {
        assert_eq!(render_node("<code>a_b</code>"), "\\texttt{a\\_b}");
    }

    #[test]
    fn preformatted_block_keeps_raw_text() {
        assert_eq!(
            render_node("<pre>x &lt; y &amp;&amp; y_2</pre>"),
            "\\begin{verbatim}\nx < y && y_2\n\\end{verbatim}\n"
        );
    }

    #[test]
    fn text_leaves_are_escaped() {
        assert_eq!(render_node("<p>50% of R&amp;D</p>"), "50\\% of R\\&D\n\n");
    }

    // The parser hoists a bare <script> into <head>, so these locate the
    // script node itself instead of going through the body helper.
    fn render_script_node(html: &str) -> String {
        let dom = parse_html(html.as_bytes()).expect("parse");
        let script = dom::find_first_tag(&dom.document, "script").expect("script");
        let mut resources = ResourceCollector::new(".");
        LatexConverter::new().render(&script, RenderContext::default(), &mut resources)
    }

    #[test]
    fn math_script_carries_raw_tex() {
        assert_eq!(
            render_script_node("<script type=\"math/tex\">x \\le y</script>"),
            "$x \\le y$"
        );
    }

    #[test]
    fn empty_math_script_renders_as_nothing() {
        assert_eq!(render_script_node("<script type=\"math/tex\">  </script>"), "");
    }

    #[test]
    fn plain_script_renders_as_nothing() {
        assert_eq!(render_script_node("<script>var x = 1;</script>"), "");
    }

    #[test]
    fn mathjax_preview_is_skipped() {
        assert_eq!(
            render_node("<span class=\"MathJax_Preview\">x</span>"),
            ""
        );
    }

    #[test]
    fn skip_set_suppresses_whole_subtrees() {
        let converter = LatexConverter::with_options(RenderOptions::skipping(["section-title"]));
        let body = fragment("<div class=\"section-title\">Input</div><p>body</p>");
        let mut resources = ResourceCollector::new(".");
        let rendered = converter.render_section(&body, &mut resources);
        assert_eq!(rendered.as_deref(), Some("body"));
    }

    #[test]
    fn unknown_elements_fall_back_to_child_concatenation() {
        assert_eq!(render_node("<span>a<q>b</q>c</span>"), "abc");
    }

    #[test]
    fn missing_image_degrades_without_breaking_siblings() {
        let rendered = render_body("<p>before <img src=\"missing.png\"> after</p>");
        assert_eq!(rendered.as_deref(), Some("before  after"));
    }

    #[test]
    fn missing_image_source_attribute_renders_as_nothing() {
        assert_eq!(render_node("<p><img></p>"), "\n\n");
    }

    #[test]
    fn section_driver_trims_trailing_blank_lines() {
        let rendered = render_body("<p>one</p><p>two</p>");
        assert_eq!(rendered.as_deref(), Some("one\n\ntwo"));
    }

    #[test]
    fn section_driver_normalizes_math_glyphs() {
        let rendered = render_body("<p>1 ≤ n ≤ 100</p>");
        assert_eq!(rendered.as_deref(), Some("1 \\leq n \\leq 100"));
    }

    #[test]
    fn empty_section_renders_as_absent() {
        assert_eq!(render_body("   "), None);
        assert_eq!(render_body("<p>  </p>"), None);
    }

    #[test]
    fn formula_wrapping_spans_block_children() {
        // A formula marker on a node with block-level children wraps the
        // trimmed concatenation in one pair of delimiters. Known to
        // mis-render in LaTeX; asserted so a change is deliberate.
        let rendered = render_node("<div class=\"tex-span\"><ul><li>A</li></ul></div>");
        assert_eq!(
            rendered,
            "$\\begin{itemize}\n  \\item A\n\\end{itemize}$\n"
        );
    }

    #[test]
    fn paragraph_breaks_promote_internal_newlines() {
        assert_eq!(add_paragraph_breaks("a\nb"), "a\n\nb");
        assert_eq!(add_paragraph_breaks("no breaks"), "no breaks");
        assert_eq!(add_paragraph_breaks(""), "");
    }

    #[test]
    fn formula_marker_scans_all_attribute_forms() {
        let body = fragment("<span class=\"ops TEX-span\">x</span>");
        assert!(has_formula_marker(&first_child_element(&body)));

        let body = fragment("<span data-kind=\"tex-inline\">x</span>");
        assert!(has_formula_marker(&first_child_element(&body)));

        let body = fragment("<span class=\"plain\">x</span>");
        assert!(!has_formula_marker(&first_child_element(&body)));
    }
}
