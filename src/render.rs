use pulldown_cmark::{html, Options, Parser};

/// Convert the rewritten Markdown body into an HTML fragment. Pure and
/// total: malformed Markdown degrades to best-effort HTML. Extensions stay
/// off so the output matches plain CommonMark.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
