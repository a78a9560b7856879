//! Index page rendering.
//!
//! The `/` endpoint lists every registered endpoint as a link, sorted by path.

use std::fmt::Write as FmtWrite;

/// Renders the index page for `endpoints`.
///
/// Entries are sorted by path before rendering, so callers may pass them in
/// any order.
pub fn render_index<'a, I>(title: &str, endpoints: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut entries: Vec<(&str, &str)> = endpoints.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut html = String::new();
    writeln!(
        html,
        "<html><head><title>{}</title></head><body>",
        escape_html(title)
    )
    .ok();

    for (path, description) in entries {
        let path = escape_html(path);
        writeln!(
            html,
            "<p><a href='{path}'>{path} - {}</a></p>",
            escape_html(description)
        )
        .ok();
    }

    html.push_str("</body></html>");
    html
}

/// Escapes the characters that are significant inside HTML text and
/// single- or double-quoted attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}
