//! pages_from_docx CLI
//!
//! ```bash
//! # Show what a document contains before writing config for it
//! pages_from_docx dump "assets/webPages/DEACONS.docx"
//! pages_from_docx dump --tables "assets/webPages/OFFICIAL TEAM.docx"
//!
//! # Check which lines would open a profile
//! pages_from_docx headers assets/webPages/ministries.docx
//!
//! # Render every configured page (or only some) into output_dir
//! pages_from_docx build --config pages.toml
//! pages_from_docx build --config pages.toml --page contact --stdout
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pages_from_docx::{
    clean_line, DocxDirectory, DocxDocument, HeaderRule, HtmlRenderer, PageBuilder, Renderer,
    SiteConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pages_from_docx")]
#[command(author, version, about = "Render church web page fragments from .docx sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List non-empty paragraphs with their index and style
    Dump {
        docx: PathBuf,

        /// Print table rows instead of paragraphs
        #[arg(long)]
        tables: bool,

        /// Stop after this many paragraphs
        #[arg(long)]
        limit: Option<usize>,

        /// Truncate each paragraph to this many characters
        #[arg(long)]
        width: Option<usize>,
    },

    /// List the lines that would start a header-delimited profile
    Headers {
        docx: PathBuf,

        /// Take the heading rule from this config instead of the default
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build page fragments from the site config
    Build {
        #[arg(long, default_value = "pages.toml")]
        config: PathBuf,

        /// Only build these pages (repeatable); all pages by default
        #[arg(long = "page")]
        pages: Vec<String>,

        /// Print fragments instead of writing them
        #[arg(long)]
        stdout: bool,
    },
}

fn truncate(text: &str, width: Option<usize>) -> String {
    match width {
        Some(w) => text.chars().take(w).collect(),
        None => text.to_string(),
    }
}

fn dump(docx: &Path, tables: bool, limit: Option<usize>, width: Option<usize>) -> Result<()> {
    let doc = DocxDocument::open(docx).with_context(|| format!("open {}", docx.display()))?;

    if tables {
        println!("tables: {}", doc.tables().len());
        for (t_i, table) in doc.tables().iter().enumerate() {
            println!("\n=== Table {t_i} ===");
            for (r_i, row) in table.rows.iter().enumerate() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|c| clean_line(c))
                    .filter(|c| !c.is_empty())
                    .collect();
                if cells.is_empty() {
                    continue;
                }
                println!("{r_i:03}: {}", cells.join(" | "));
            }
        }
        return Ok(());
    }

    let items: Vec<_> = doc
        .paragraphs()
        .iter()
        .map(|p| (p.index, &p.style, clean_line(&p.text)))
        .filter(|(_, _, text)| !text.is_empty())
        .collect();

    println!("non-empty: {}", items.len());
    for (i, style, text) in items.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{i:03} [{style}] {}", truncate(text, width));
    }
    Ok(())
}

fn headers(docx: &Path, config: Option<&Path>) -> Result<()> {
    let rule = match config {
        Some(path) => {
            SiteConfig::load(path)
                .with_context(|| format!("load {}", path.display()))?
                .headers
        }
        None => HeaderRule::default(),
    };
    let doc = DocxDocument::open(docx).with_context(|| format!("open {}", docx.display()))?;
    let lines = doc.lines();

    for h in rule.find(&lines) {
        println!("{:03} {}", h.index, h.line);
    }
    Ok(())
}

fn build(config: &Path, pages: &[String], stdout: bool) -> Result<()> {
    let site = SiteConfig::load(config).with_context(|| format!("load {}", config.display()))?;
    let docs = DocxDirectory::new(&site.docx_dir);
    let builder = PageBuilder::new(&site, &docs);

    let names: Vec<String> = if pages.is_empty() {
        site.pages.keys().cloned().collect()
    } else {
        pages.to_vec()
    };

    for name in &names {
        let page = builder
            .build(name)
            .with_context(|| format!("build page {name}"))?;
        let html = HtmlRenderer.render(&page);

        if stdout {
            println!("<!-- {} -->\n{html}\n", page.output);
            continue;
        }

        let out_path = site.output_dir.join(&page.output);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&out_path, html).with_context(|| format!("write {}", out_path.display()))?;
        info!(page = %name, path = %out_path.display(), "wrote fragment");
    }

    if !stdout {
        println!("Updated pages: {}", names.join(", "));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dump {
            docx,
            tables,
            limit,
            width,
        } => dump(&docx, tables, limit, width),
        Commands::Headers { docx, config } => headers(&docx, config.as_deref()),
        Commands::Build {
            config,
            pages,
            stdout,
        } => build(&config, &pages, stdout),
    }
}
