//! pages_from_docx - migrate church .docx content into static page fragments
//!
//! # Architecture
//!
//! ```text
//! .docx -> DocxDocument -> lines -> chunk (stride | header) -> Page -> Renderer -> HTML
//!                                          ^
//!                         SiteConfig ------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pages_from_docx::{DocxDirectory, HtmlRenderer, PageBuilder, Renderer, SiteConfig};
//!
//! let site = SiteConfig::load("pages.toml")?;
//! let docs = DocxDirectory::new(&site.docx_dir);
//! let page = PageBuilder::new(&site, &docs).build("ministries")?;
//! println!("{}", HtmlRenderer.render(&page));
//! ```

pub mod builder;
pub mod chunk;
pub mod config;
pub mod docx;
pub mod error;
pub mod markdown;
pub mod page;
pub mod render;
pub mod text;

pub use builder::{DocxDirectory, LineSource, PageBuilder};
pub use chunk::{chunk_by_header, chunk_fixed, HeaderMatch, HeaderRule, HeaderSection, Record};
pub use crate::config::SiteConfig;
pub use docx::DocxDocument;
pub use error::{Error, Result};
pub use page::{Block, Page};
pub use render::{HtmlRenderer, Renderer};
pub use text::{clean_line, clean_lines};
