use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::chunk::HeaderRule;
use crate::error::{Error, Result};
use crate::text::TextFix;

/// Everything the page builder needs to know about the site.
///
/// Loaded from a TOML file; any key can be overridden from the environment
/// with a `PAGES_` prefix and `__` as the nesting separator
/// (`PAGES_CONTACT__PHONE`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the source .docx files.
    pub docx_dir: PathBuf,
    /// Where rendered fragments are written.
    pub output_dir: PathBuf,
    /// Prefix for image `src` attributes.
    pub image_base: String,
    pub contact: ContactInfo,
    /// Default heading rule for header-delimited sections.
    pub headers: HeaderRule,
    pub pages: BTreeMap<String, PageConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docx_dir: PathBuf::from("assets/webPages"),
            output_dir: PathBuf::from("build/pages"),
            image_base: "../ConImg/webPages".to_string(),
            contact: ContactInfo::default(),
            headers: HeaderRule::default(),
            pages: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub fax: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Fragment file name; `<page name>.html` when unset.
    pub output: Option<String>,
    pub title: String,
    /// Use the first line of the first sourced section as the title.
    pub title_from_source: bool,
    /// Markdown paragraphs right under the title.
    pub lead: Vec<String>,
    /// Image grid shown after the lead paragraphs.
    pub images: Vec<String>,
    pub image_alt: String,
    /// Emit a jump list of the anchored sections.
    pub subnav: bool,
    pub sections: Vec<SectionConfig>,
    pub contact_block: Option<ContactBlock>,
    /// Markdown paragraphs at the very end.
    pub closing: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactBlock {
    pub heading: String,
    /// Markdown paragraphs after the contact list.
    pub after: Vec<String>,
    /// Name of a marker comment to leave at the end of the block.
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// .docx file name, relative to `docx_dir`.
    pub source: Option<String>,
    pub anchor: Option<String>,
    pub heading: Option<String>,
    /// Leading lines to drop (usually the document's own title).
    pub skip: usize,
    /// Lines after `skip` rendered as plain paragraphs before the content.
    pub intro: usize,
    /// Upper bound on content lines after the intro.
    pub take: Option<usize>,
    /// Markdown paragraphs used when the section produced nothing.
    pub fallback: Vec<String>,
    pub fixes: Vec<TextFix>,
    /// Profile images, assigned in order.
    pub images: Vec<String>,
    pub content: Content,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    /// One paragraph per line.
    #[default]
    Paragraphs,
    /// Profiles of `stride` consecutive lines each.
    Stride {
        stride: usize,
        #[serde(default)]
        layout: Layout,
        /// Trailing records with fewer real lines are dropped.
        #[serde(default = "default_min_fields")]
        min_fields: usize,
    },
    /// Profiles opened by heading lines.
    Header {
        #[serde(default)]
        prefixes: Option<Vec<String>>,
        #[serde(default)]
        max_len: Option<usize>,
    },
}

fn default_min_fields() -> usize {
    1
}

/// How the fields of a stride record map onto a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    NameTitleDescription,
    NameDescription,
}

impl SiteConfig {
    /// Load a TOML file plus environment overrides. Relative directories
    /// are resolved against the file's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix("PAGES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut site: SiteConfig = settings.try_deserialize()?;
        if let Some(base) = path.parent() {
            site.docx_dir = resolve(base, &site.docx_dir);
            site.output_dir = resolve(base, &site.output_dir);
        }
        site.validate()?;
        debug!(path = %path.display(), pages = site.pages.len(), "loaded site config");
        Ok(site)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let site: SiteConfig = settings.try_deserialize()?;
        site.validate()?;
        Ok(site)
    }

    pub fn page(&self, name: &str) -> Result<&PageConfig> {
        self.pages
            .get(name)
            .ok_or_else(|| Error::UnknownPage(name.to_string()))
    }

    /// Heading rule for a header section, falling back to the site default.
    pub fn header_rule(&self, prefixes: Option<&[String]>, max_len: Option<usize>) -> HeaderRule {
        let mut rule = match prefixes {
            Some(p) => HeaderRule::new(p).with_max_len(self.headers.max_len),
            None => self.headers.clone(),
        };
        if let Some(max_len) = max_len {
            rule.max_len = max_len;
        }
        rule
    }

    pub fn validate(&self) -> Result<()> {
        if self.headers.prefixes.is_empty() {
            return Err(Error::InvalidConfig("headers.prefixes is empty".into()));
        }
        for (name, page) in &self.pages {
            for (i, section) in page.sections.iter().enumerate() {
                let at = format!("pages.{name}.sections[{i}]");
                match &section.content {
                    Content::Paragraphs => {}
                    Content::Stride {
                        stride, min_fields, ..
                    } => {
                        if *stride == 0 {
                            return Err(Error::InvalidConfig(format!(
                                "{at}: stride must be positive"
                            )));
                        }
                        if min_fields > stride {
                            return Err(Error::InvalidConfig(format!(
                                "{at}: min_fields {min_fields} exceeds stride {stride}"
                            )));
                        }
                    }
                    Content::Header { prefixes, .. } => {
                        if prefixes.as_ref().is_some_and(|p| p.is_empty()) {
                            return Err(Error::InvalidConfig(format!("{at}: prefixes is empty")));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl PageConfig {
    pub fn output_name(&self, page: &str) -> String {
        self.output.clone().unwrap_or_else(|| format!("{page}.html"))
    }
}

fn resolve(base: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() || base.as_os_str().is_empty() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}
