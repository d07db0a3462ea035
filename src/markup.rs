//! Markdown to HTML rendering for explanations

use pulldown_cmark::{html, Options, Parser};

/// Render a markdown explanation to an HTML fragment.
///
/// Plain CommonMark, no extensions. Inline HTML in the source is passed
/// through untouched, since the model is asked for web-ready output.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}
