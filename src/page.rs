//! Typed page content, independent of any markup.

use crate::config::ContactInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
    Link { text: String, href: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// One person (or ministry) card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub role: Option<String>,
    pub paragraphs: Vec<String>,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub anchor: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        anchor: Option<String>,
    },
    Paragraph(Vec<Inline>),
    ImageGrid(Vec<Image>),
    Profile(Profile),
    SubNav(Vec<NavLink>),
    Contact(ContactInfo),
    /// Marker comment left for content that is kept by hand (e.g. forms).
    Placeholder(String),
}

impl Block {
    pub fn text(s: impl Into<String>) -> Self {
        Block::Paragraph(vec![Inline::Text(s.into())])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub title: String,
    /// File name of the fragment, relative to the output directory.
    pub output: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Profile(p) => Some(p),
            _ => None,
        })
    }
}
