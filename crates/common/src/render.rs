use pulldown_cmark::{html, Options, Parser};

use crate::documents::DocumentKind;

/// What a document looks like once it is ready to be sent to a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Served as-is with a `text/plain` content type
    PlainText(String),
    /// An HTML fragment, meant to be wrapped in a page layout
    Html(String),
}

pub fn render(content: &[u8], kind: DocumentKind) -> Rendered {
    let text = String::from_utf8_lossy(content);
    match kind {
        DocumentKind::Text => Rendered::PlainText(text.into_owned()),
        DocumentKind::Markdown => Rendered::Html(markdown_to_html(&text)),
    }
}

/// Converts markdown content to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_verbatim() {
        let content = b"# not a heading\n<b>raw</b>";
        assert_eq!(
            render(content, DocumentKind::Text),
            Rendered::PlainText("# not a heading\n<b>raw</b>".to_string())
        );
    }

    #[test]
    fn test_markdown_renders_html() {
        let Rendered::Html(html) = render(b"# Ruby is...\n\n*fun*", DocumentKind::Markdown) else {
            panic!("expected html");
        };
        assert!(html.contains("<h1>Ruby is...</h1>"));
        assert!(html.contains("<em>fun</em>"));
    }

    #[test]
    fn test_markdown_extensions() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let Rendered::PlainText(text) = render(&[b'o', b'k', 0xff], DocumentKind::Text) else {
            panic!("expected plain text");
        };
        assert_eq!(text, "ok\u{fffd}");
    }
}
