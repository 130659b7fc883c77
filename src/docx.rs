//! Plain-text view of a .docx package
//!
//! Only `word/document.xml` and `word/styles.xml` are read. Body paragraphs
//! keep their document index and style name so dumps can be compared
//! against what Word shows; table cells are collected separately.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::text::clean_lines;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const DEFAULT_STYLE: &str = "Normal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParagraph {
    /// Position among all body paragraphs, empty ones included.
    pub index: usize,
    pub style: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTable {
    /// Cell texts per row; a cell's paragraphs are joined with '\n'.
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    paragraphs: Vec<DocParagraph>,
    tables: Vec<DocTable>,
}

impl DocxDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening docx");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.to_string()))?;
        let styles = match read_part(&mut archive, STYLES_PART)? {
            Some(bytes) => parse_styles(&bytes)?,
            None => StyleNames::default(),
        };

        let doc = parse_document(&document, &styles)?;
        debug!(
            paragraphs = doc.paragraphs.len(),
            tables = doc.tables.len(),
            "parsed docx"
        );
        Ok(doc)
    }

    pub fn paragraphs(&self) -> &[DocParagraph] {
        &self.paragraphs
    }

    pub fn tables(&self) -> &[DocTable] {
        &self.tables
    }

    /// Cleaned, non-empty body paragraph texts.
    pub fn lines(&self) -> Vec<String> {
        clean_lines(self.paragraphs.iter().map(|p| p.text.as_str()))
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(Some(buf))
}

fn xml_err(part: &str, err: impl std::fmt::Display) -> Error {
    Error::Xml {
        part: part.to_string(),
        message: err.to_string(),
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[derive(Debug, Default)]
struct StyleNames {
    by_id: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleNames {
    fn resolve(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.by_id.get(id).cloned().unwrap_or_else(|| id.to_string()),
            None => self
                .default_paragraph
                .clone()
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
        }
    }
}

fn parse_styles(xml: &[u8]) -> Result<StyleNames> {
    let mut reader = XmlReader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut names = StyleNames::default();

    // (styleId, is default paragraph style)
    let mut current: Option<(String, bool)> = None;
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().local_name().as_ref() == b"style" => {
                let id = attr_value(e, b"styleId").unwrap_or_default();
                let is_default = attr_value(e, b"type").as_deref() == Some("paragraph")
                    && matches!(attr_value(e, b"default").as_deref(), Some("1" | "true"));
                current = Some((id, is_default));
            }
            Ok(Event::Empty(ref e)) if e.name().local_name().as_ref() == b"name" => {
                if let (Some((id, is_default)), Some(name)) = (&current, attr_value(e, b"val")) {
                    if *is_default {
                        names.default_paragraph = Some(name.clone());
                    }
                    names.by_id.insert(id.clone(), name);
                }
            }
            Ok(Event::End(ref e)) if e.name().local_name().as_ref() == b"style" => {
                current = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(STYLES_PART, e)),
            _ => {}
        }
    }
    Ok(names)
}

// Elements whose text is not part of the paragraph's own runs (shapes,
// drawings, compatibility fallbacks).
fn is_opaque(local: &[u8]) -> bool {
    matches!(local, b"drawing" | b"pict" | b"AlternateContent" | b"object")
}

#[derive(Default)]
struct DocumentState {
    paragraphs: Vec<DocParagraph>,
    tables: Vec<DocTable>,

    table_depth: usize,
    para_depth: usize,
    opaque_depth: usize,
    in_text: bool,
    in_props: bool,

    text: String,
    style_id: Option<String>,
    cell: Vec<String>,
}

impl DocumentState {
    fn collecting(&self) -> bool {
        self.para_depth == 1 && self.opaque_depth == 0 && self.table_depth <= 1
    }

    fn start(&mut self, local: &[u8], e: &BytesStart, empty: bool) {
        if is_opaque(local) {
            if !empty {
                self.opaque_depth += 1;
            }
            return;
        }
        match local {
            b"tbl" if !empty => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.tables.push(DocTable::default());
                }
            }
            b"tr" if self.table_depth == 1 && !empty => {
                if let Some(table) = self.tables.last_mut() {
                    table.rows.push(Vec::new());
                }
            }
            b"tc" if self.table_depth == 1 => {
                self.cell.clear();
                if empty {
                    self.end(local);
                }
            }
            b"p" => {
                self.para_depth += 1;
                if self.para_depth == 1 {
                    self.text.clear();
                    self.style_id = None;
                }
                if empty {
                    self.end(local);
                }
            }
            b"pPr" if self.para_depth == 1 && !empty => self.in_props = true,
            b"pStyle" if self.in_props => self.style_id = attr_value(e, b"val"),
            b"t" if self.collecting() && !empty => self.in_text = true,
            b"tab" if self.collecting() && !self.in_props => self.text.push('\t'),
            b"br" | b"cr" if self.collecting() => self.text.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self, local: &[u8]) {
        if is_opaque(local) {
            self.opaque_depth = self.opaque_depth.saturating_sub(1);
            return;
        }
        match local {
            b"t" => self.in_text = false,
            b"pPr" => self.in_props = false,
            b"p" => {
                if self.para_depth == 1 && self.opaque_depth == 0 {
                    let text = std::mem::take(&mut self.text);
                    if self.table_depth == 0 {
                        self.paragraphs.push(DocParagraph {
                            index: self.paragraphs.len(),
                            style: self.style_id.take().unwrap_or_default(),
                            text,
                        });
                    } else if self.table_depth == 1 {
                        self.cell.push(text);
                    }
                }
                self.para_depth = self.para_depth.saturating_sub(1);
            }
            b"tc" if self.table_depth == 1 => {
                let cell = self.cell.join("\n");
                self.cell.clear();
                if let Some(row) = self.tables.last_mut().and_then(|t| t.rows.last_mut()) {
                    row.push(cell);
                }
            }
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }
}

fn parse_document(xml: &[u8], styles: &StyleNames) -> Result<DocxDocument> {
    let mut reader = XmlReader::from_reader(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();
    let mut state = DocumentState::default();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => state.start(e.name().local_name().as_ref(), e, false),
            Ok(Event::Empty(ref e)) => state.start(e.name().local_name().as_ref(), e, true),
            Ok(Event::End(ref e)) => state.end(e.name().local_name().as_ref()),
            Ok(Event::Text(t)) => {
                if state.in_text && state.collecting() {
                    let text = t.unescape().map_err(|e| xml_err(DOCUMENT_PART, e))?;
                    state.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(DOCUMENT_PART, e)),
            _ => {}
        }
    }

    // Style ids are resolved to display names once the whole body is read.
    let mut paragraphs = state.paragraphs;
    for p in paragraphs.iter_mut() {
        let id = std::mem::take(&mut p.style);
        p.style = styles.resolve((!id.is_empty()).then_some(id.as_str()));
    }

    Ok(DocxDocument {
        paragraphs,
        tables: state.tables,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::io::Cursor;

    fn open(bytes: Vec<u8>) -> DocxDocument {
        DocxDocument::from_reader(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn reads_paragraphs_with_styles_and_indices() {
        let body = format!(
            "{}{}{}",
            styled_para("Heading1", "CHURCH HISTORY"),
            para(""),
            para("Founded in 1890.")
        );
        let doc = open(docx_bytes(Some(&document_xml(&body)), Some(&styles_xml())));

        let paras = doc.paragraphs();
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[0].style, "heading 1");
        assert_eq!(paras[0].text, "CHURCH HISTORY");
        assert_eq!(paras[1].text, "");
        assert_eq!(paras[2].index, 2);
        assert_eq!(paras[2].style, "Normal");
        assert_eq!(doc.lines(), vec!["CHURCH HISTORY", "Founded in 1890."]);
    }

    #[test]
    fn joins_runs_and_decodes_entities() {
        let body = "<w:p><w:r><w:t>Leadership &amp; </w:t></w:r><w:r><w:tab/><w:t>Staff</w:t></w:r></w:p>";
        let doc = open(docx_bytes(Some(&document_xml(body)), None));
        assert_eq!(doc.paragraphs()[0].text, "Leadership & \tStaff");
        assert_eq!(doc.lines(), vec!["Leadership & Staff"]);
    }

    #[test]
    fn unstyled_paragraphs_default_to_normal_without_styles_part() {
        let doc = open(docx_bytes(Some(&document_xml(&para("x"))), None));
        assert_eq!(doc.paragraphs()[0].style, "Normal");
    }

    #[test]
    fn table_cells_are_not_body_paragraphs() {
        let table = format!(
            "<w:tbl><w:tr><w:tc>{}{}</w:tc><w:tc>{}</w:tc></w:tr><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>",
            para("Name"),
            para("Second line"),
            para("Role"),
            para("Elder Smith")
        );
        let body = format!("{}{}{}", para("Before"), table, para("After"));
        let doc = open(docx_bytes(Some(&document_xml(&body)), None));

        assert_eq!(doc.lines(), vec!["Before", "After"]);
        assert_eq!(doc.tables().len(), 1);
        assert_eq!(
            doc.tables()[0].rows,
            vec![
                vec!["Name\nSecond line".to_string(), "Role".to_string()],
                vec!["Elder Smith".to_string()],
            ]
        );
    }

    #[test]
    fn self_closing_cell_keeps_its_column() {
        let table = format!(
            "<w:tbl><w:tr><w:tc>{}</w:tc><w:tc/><w:tc>{}</w:tc></w:tr></w:tbl>",
            para("Name"),
            para("Role")
        );
        let doc = open(docx_bytes(Some(&document_xml(&table)), None));
        assert_eq!(
            doc.tables()[0].rows,
            vec![vec!["Name".to_string(), String::new(), "Role".to_string()]]
        );
    }

    #[test]
    fn drawing_text_is_ignored() {
        let body = "<w:p><w:r><w:t>Caption</w:t></w:r><w:r><w:drawing><a:t xmlns:a=\"urn:a\">shape text</a:t></w:drawing></w:r></w:p>";
        let doc = open(docx_bytes(Some(&document_xml(body)), None));
        assert_eq!(doc.paragraphs()[0].text, "Caption");
    }

    #[test]
    fn line_breaks_become_spaces_after_cleaning() {
        let body = "<w:p><w:r><w:t>Rev. John</w:t><w:br/><w:t>Doe</w:t></w:r></w:p>";
        let doc = open(docx_bytes(Some(&document_xml(body)), None));
        assert_eq!(doc.paragraphs()[0].text, "Rev. John\nDoe");
        assert_eq!(doc.lines(), vec!["Rev. John Doe"]);
    }

    #[test]
    fn missing_document_part_is_an_error() {
        let err = DocxDocument::from_reader(Cursor::new(docx_bytes(None, None))).unwrap_err();
        assert!(matches!(err, Error::MissingPart(ref p) if p == "word/document.xml"));
    }

    #[test]
    fn non_zip_input_is_an_error() {
        let err = DocxDocument::from_reader(Cursor::new(b"not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Zip(_)));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let xml = "<w:document xmlns:w=\"x\"><w:body><w:p></w:r></w:body>";
        let err = DocxDocument::from_reader(Cursor::new(docx_bytes(Some(xml), None))).unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
    }

    #[test]
    fn opens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DEACONS.docx");
        std::fs::write(&path, simple_docx(&["Deacons", "Deacon Brown"])).unwrap();

        let doc = DocxDocument::open(&path).unwrap();
        assert_eq!(doc.lines(), vec!["Deacons", "Deacon Brown"]);
    }
}
