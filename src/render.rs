use crate::config::ContactInfo;
use crate::markdown::sanitize_href;
use crate::page::{Block, Image, Inline, NavLink, Page, Profile};

/// Turns a page model into markup.
pub trait Renderer {
    fn render(&self, page: &Page) -> String;
}

/// Fragment markup for the inner part of a page's content section,
/// using the class names the site stylesheet already defines.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn img_tag(image: &Image, class: Option<&str>) -> String {
    let class = class
        .map(|c| format!(" class=\"{}\"", escape_html(c)))
        .unwrap_or_default();
    format!(
        "<img{class} src=\"{}\" alt=\"{}\">",
        escape_html(&image.src),
        escape_html(&image.alt)
    )
}

fn inline_html(runs: &[Inline]) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            Inline::Text(t) => out.push_str(&escape_html(t)),
            Inline::Strong(t) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(t));
                out.push_str("</strong>");
            }
            Inline::Emphasis(t) => {
                out.push_str("<em>");
                out.push_str(&escape_html(t));
                out.push_str("</em>");
            }
            Inline::Link { text, href } => match sanitize_href(href) {
                Some(href) => out.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&href),
                    escape_html(text)
                )),
                None => out.push_str(&escape_html(text)),
            },
        }
    }
    out
}

fn subnav_html(links: &[NavLink]) -> String {
    let mut out = String::from("<ul class=\"content-subnav\">");
    for link in links {
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>",
            escape_html(&link.anchor),
            escape_html(&link.label)
        ));
    }
    out.push_str("</ul>");
    out
}

fn profile_lines(profile: &Profile, out: &mut Vec<String>) {
    out.push("<div class=\"leadership-profile\">".to_string());
    if let Some(image) = &profile.image {
        out.push(img_tag(image, Some("profile-image")));
    }
    out.push("<div class=\"profile-details\">".to_string());
    out.push(format!("<h2>{}</h2>", escape_html(&profile.name)));
    if let Some(role) = &profile.role {
        out.push(format!("<p><strong>{}</strong></p>", escape_html(role)));
    }
    for p in &profile.paragraphs {
        out.push(format!("<p>{}</p>", escape_html(p)));
    }
    out.push("</div>".to_string());
    out.push("</div>".to_string());
}

// Digits only, for tel: links ("(270) 443-3714" -> "2704433714").
fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

fn contact_lines(contact: &ContactInfo, out: &mut Vec<String>) {
    out.push("<ul>".to_string());
    if !contact.address.is_empty() {
        out.push(format!(
            "<li><strong>Visit Us:</strong> {}</li>",
            escape_html(&contact.address)
        ));
    }
    if !contact.phone.is_empty() {
        out.push(format!(
            "<li><strong>Call Us:</strong> <a href=\"tel:{}\">{}</a></li>",
            phone_digits(&contact.phone),
            escape_html(&contact.phone)
        ));
    }
    if !contact.email.is_empty() {
        let email = escape_html(&contact.email);
        out.push(format!(
            "<li><strong>Email Us:</strong> <a href=\"mailto:{email}\">{email}</a></li>"
        ));
    }
    if !contact.fax.is_empty() {
        out.push(format!("<li><strong>Fax:</strong> {}</li>", escape_html(&contact.fax)));
    }
    out.push("</ul>".to_string());
}

// Comment bodies may not contain "--"; collapse every dash run to one dash.
fn comment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '-' && out.ends_with('-') {
            continue;
        }
        out.push(ch);
    }
    out
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page) -> String {
        let mut out: Vec<String> = Vec::new();
        for block in &page.blocks {
            match block {
                Block::Heading {
                    level,
                    text,
                    anchor,
                } => {
                    let level = (*level).clamp(1, 6);
                    let id = anchor
                        .as_ref()
                        .map(|a| format!(" id=\"{}\"", escape_html(a)))
                        .unwrap_or_default();
                    out.push(format!("<h{level}{id}>{}</h{level}>", escape_html(text)));
                }
                Block::Paragraph(runs) => out.push(format!("<p>{}</p>", inline_html(runs))),
                Block::ImageGrid(images) => {
                    out.push("<div class=\"content-image-grid\">".to_string());
                    out.extend(images.iter().map(|i| img_tag(i, None)));
                    out.push("</div>".to_string());
                }
                Block::Profile(profile) => profile_lines(profile, &mut out),
                Block::SubNav(links) => out.push(subnav_html(links)),
                Block::Contact(contact) => contact_lines(contact, &mut out),
                Block::Placeholder(name) => {
                    out.push(format!("<!-- {} -->", comment_text(name)));
                }
            }
        }
        out.join("\n")
    }
}
