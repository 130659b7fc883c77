//! Turns configured sections and their document lines into a [`Page`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::chunk::chunk_fixed;
use crate::config::{Content, Layout, PageConfig, SectionConfig, SiteConfig};
use crate::docx::DocxDocument;
use crate::error::{Error, Result};
use crate::markdown::inline_paragraphs;
use crate::page::{Block, Image, NavLink, Page, Profile};
use crate::text::apply_fixes;

/// Where section lines come from.
pub trait LineSource {
    /// Cleaned, non-empty lines of the named source document.
    fn lines(&self, source: &str) -> Result<Vec<String>>;
}

/// Reads `.docx` files from one directory.
pub struct DocxDirectory {
    root: PathBuf,
}

impl DocxDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LineSource for DocxDirectory {
    fn lines(&self, source: &str) -> Result<Vec<String>> {
        Ok(DocxDocument::open(self.root.join(source))?.lines())
    }
}

/// In-memory source keyed by document name, for callers that already
/// have the text (or for building pages without touching disk). Unknown
/// names report `NotFound` like a missing file.
impl LineSource for HashMap<String, Vec<String>> {
    fn lines(&self, source: &str) -> Result<Vec<String>> {
        self.get(source).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no source named {source}"),
            ))
        })
    }
}

pub struct PageBuilder<'a, S: LineSource> {
    site: &'a SiteConfig,
    source: &'a S,
}

impl<'a, S: LineSource> PageBuilder<'a, S> {
    pub fn new(site: &'a SiteConfig, source: &'a S) -> Self {
        Self { site, source }
    }

    pub fn build(&self, name: &str) -> Result<Page> {
        let cfg = self.site.page(name)?;

        let mut loaded = Vec::with_capacity(cfg.sections.len());
        for section in &cfg.sections {
            loaded.push(match &section.source {
                Some(src) => Some(self.load(src)?),
                None => None,
            });
        }

        let mut title = cfg.title.clone();
        if cfg.title_from_source {
            if let Some(first) = loaded.iter().flatten().next().and_then(|l| l.first()) {
                title = first.clone();
            }
        }

        let mut blocks = vec![Block::Heading {
            level: 1,
            text: title.clone(),
            anchor: None,
        }];
        push_markdown(&mut blocks, &cfg.lead);

        if !cfg.images.is_empty() {
            let grid = cfg
                .images
                .iter()
                .map(|f| Image {
                    src: self.image_src(f),
                    alt: cfg.image_alt.clone(),
                })
                .collect();
            blocks.push(Block::ImageGrid(grid));
        }

        if cfg.subnav {
            let links: Vec<NavLink> = cfg
                .sections
                .iter()
                .filter_map(|s| match (&s.anchor, &s.heading) {
                    (Some(anchor), Some(heading)) => Some(NavLink {
                        anchor: anchor.clone(),
                        label: heading.clone(),
                    }),
                    _ => None,
                })
                .collect();
            if !links.is_empty() {
                blocks.push(Block::SubNav(links));
            }
        }

        for (section, lines) in cfg.sections.iter().zip(loaded) {
            self.section_blocks(name, section, lines.unwrap_or_default(), &mut blocks);
        }

        self.contact_blocks(cfg, &mut blocks);
        push_markdown(&mut blocks, &cfg.closing);

        debug!(page = name, blocks = blocks.len(), "built page");
        Ok(Page {
            name: name.to_string(),
            title,
            output: cfg.output_name(name),
            blocks,
        })
    }

    // A missing document leaves its section empty; anything else is fatal.
    fn load(&self, source: &str) -> Result<Vec<String>> {
        match self.source.lines(source) {
            Ok(lines) => {
                debug!(source, lines = lines.len(), "loaded source");
                Ok(lines)
            }
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(source, "source document not found, section left empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn section_blocks(
        &self,
        page: &str,
        section: &SectionConfig,
        mut lines: Vec<String>,
        blocks: &mut Vec<Block>,
    ) {
        if let Some(heading) = &section.heading {
            blocks.push(Block::Heading {
                level: 2,
                text: heading.clone(),
                anchor: section.anchor.clone(),
            });
        }

        lines.drain(..section.skip.min(lines.len()));
        apply_fixes(&mut lines, &section.fixes);

        let mut body = lines.split_off(section.intro.min(lines.len()));
        let intro = lines;
        if let Some(take) = section.take {
            body.truncate(take);
        }

        let start = blocks.len();
        blocks.extend(intro.into_iter().map(Block::text));

        match &section.content {
            Content::Paragraphs => blocks.extend(body.into_iter().map(Block::text)),
            Content::Stride {
                stride,
                layout,
                min_fields,
            } => {
                let profiles = chunk_fixed(&body, *stride)
                    .into_iter()
                    .filter(|r| r.present() >= *min_fields)
                    .map(|r| profile_from_fields(r.into_fields(), *layout));
                self.push_profiles(section, profiles, blocks);
            }
            Content::Header { prefixes, max_len } => {
                let rule = self.site.header_rule(prefixes.as_deref(), *max_len);
                let sections = rule.chunk(&body);
                if sections.is_empty() && !body.is_empty() {
                    warn!(page, source = ?section.source, "no heading lines matched");
                }
                let profiles = sections.into_iter().map(|s| Profile {
                    name: s.header,
                    role: None,
                    paragraphs: s.body,
                    image: None,
                });
                self.push_profiles(section, profiles, blocks);
            }
        }

        if blocks.len() == start && !section.fallback.is_empty() {
            debug!(page, source = ?section.source, "using fallback text");
            push_markdown(blocks, &section.fallback);
        }
    }

    fn push_profiles(
        &self,
        section: &SectionConfig,
        profiles: impl Iterator<Item = Profile>,
        blocks: &mut Vec<Block>,
    ) {
        for (i, mut profile) in profiles.enumerate() {
            profile.image = section.images.get(i).map(|f| Image {
                src: self.image_src(f),
                alt: profile.name.clone(),
            });
            blocks.push(Block::Profile(profile));
        }
    }

    fn contact_blocks(&self, cfg: &PageConfig, blocks: &mut Vec<Block>) {
        let Some(contact) = &cfg.contact_block else {
            return;
        };
        if !contact.heading.is_empty() {
            blocks.push(Block::Heading {
                level: 2,
                text: contact.heading.clone(),
                anchor: None,
            });
        }
        blocks.push(Block::Contact(self.site.contact.clone()));
        push_markdown(blocks, &contact.after);
        if let Some(name) = &contact.placeholder {
            blocks.push(Block::Placeholder(name.clone()));
        }
    }

    fn image_src(&self, file: &str) -> String {
        let base = self.site.image_base.trim_end_matches('/');
        if base.is_empty() || file.starts_with('/') || file.contains("://") {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }
}

fn push_markdown(blocks: &mut Vec<Block>, paragraphs: &[String]) {
    for md in paragraphs {
        blocks.extend(inline_paragraphs(md).into_iter().map(Block::Paragraph));
    }
}

fn profile_from_fields(fields: Vec<String>, layout: Layout) -> Profile {
    let mut fields = fields.into_iter();
    let name = fields.next().unwrap_or_default();
    let role = match layout {
        Layout::NameTitleDescription => fields.next().filter(|r| !r.is_empty()),
        Layout::NameDescription => None,
    };
    Profile {
        name,
        role,
        paragraphs: fields.filter(|f| !f.is_empty()).collect(),
        image: None,
    }
}
