//! Static page text written by hand in the site config.
//!
//! Config strings are Markdown so a sentence can carry a link or bold text
//! (`please [contact us](contact.html)`) without embedding raw HTML. Only
//! inline formatting is kept; block structure collapses to paragraphs.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::page::Inline;

pub fn sanitize_href(href: &str) -> Option<String> {
    let h = href.trim();
    if h.is_empty() {
        return None;
    }
    let low = h.to_ascii_lowercase();
    if low.starts_with("javascript:") || low.starts_with("data:") || low.starts_with("vbscript:") {
        return None;
    }
    Some(h.to_string())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Strong,
    Emphasis,
}

struct InlineCollector {
    paragraphs: Vec<Vec<Inline>>,
    current: Vec<Inline>,
    modes: Vec<Mode>,
    // (href, text so far) while inside a link
    link: Option<(Option<String>, String)>,
}

impl InlineCollector {
    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Plain)
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
            return;
        }
        let mode = self.mode();
        // Merge with the previous run when the formatting matches.
        match (self.current.last_mut(), mode) {
            (Some(Inline::Text(prev)), Mode::Plain)
            | (Some(Inline::Strong(prev)), Mode::Strong)
            | (Some(Inline::Emphasis(prev)), Mode::Emphasis) => prev.push_str(text),
            _ => self.current.push(match mode {
                Mode::Plain => Inline::Text(text.to_string()),
                Mode::Strong => Inline::Strong(text.to_string()),
                Mode::Emphasis => Inline::Emphasis(text.to_string()),
            }),
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
    }
}

/// Parse Markdown into paragraphs of inline runs.
///
/// Links with unsafe schemes keep their text and lose the link.
pub fn inline_paragraphs(md: &str) -> Vec<Vec<Inline>> {
    let mut c = InlineCollector {
        paragraphs: Vec::new(),
        current: Vec::new(),
        modes: Vec::new(),
        link: None,
    };

    for event in Parser::new(md) {
        match event {
            Event::Start(Tag::Strong) => c.modes.push(Mode::Strong),
            Event::Start(Tag::Emphasis) => c.modes.push(Mode::Emphasis),
            Event::End(TagEnd::Strong) | Event::End(TagEnd::Emphasis) => {
                c.modes.pop();
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                c.link = Some((sanitize_href(&dest_url), String::new()));
            }
            Event::End(TagEnd::Link) => {
                if let Some((href, text)) = c.link.take() {
                    match href {
                        Some(href) => c.current.push(Inline::Link { text, href }),
                        None => c.push_text(&text),
                    }
                }
            }
            Event::Text(t) | Event::Code(t) => c.push_text(&t),
            Event::SoftBreak | Event::HardBreak => c.push_text(" "),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => c.flush(),
            _ => {}
        }
    }
    c.flush();
    c.paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_paragraph() {
        let paras = inline_paragraphs("Facility rental information is being updated.");
        assert_eq!(
            paras,
            vec![vec![Inline::Text("Facility rental information is being updated.".into())]]
        );
    }

    #[test]
    fn keeps_links_and_surrounding_text() {
        let paras = inline_paragraphs("Use the [Contact Us](contact.html) page or call.");
        assert_eq!(
            paras[0],
            vec![
                Inline::Text("Use the ".into()),
                Inline::Link {
                    text: "Contact Us".into(),
                    href: "contact.html".into()
                },
                Inline::Text(" page or call.".into()),
            ]
        );
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        let paras = inline_paragraphs("First.\n\nSecond **bold**.");
        assert_eq!(paras.len(), 2);
        assert_eq!(
            paras[1],
            vec![
                Inline::Text("Second ".into()),
                Inline::Strong("bold".into()),
                Inline::Text(".".into()),
            ]
        );
    }

    #[test]
    fn unsafe_links_lose_their_href() {
        let paras = inline_paragraphs("[click](javascript:alert(1))");
        assert_eq!(paras[0], vec![Inline::Text("click".into())]);
    }

    #[test]
    fn empty_input_has_no_paragraphs() {
        assert!(inline_paragraphs("").is_empty());
        assert!(inline_paragraphs("   \n\n").is_empty());
    }

    #[test]
    fn sanitize_href_rejects_script_schemes() {
        assert_eq!(sanitize_href(" tel:2704433714 "), Some("tel:2704433714".into()));
        assert_eq!(sanitize_href("JavaScript:void(0)"), None);
        assert_eq!(sanitize_href("data:text/html,hi"), None);
        assert_eq!(sanitize_href(""), None);
    }
}
