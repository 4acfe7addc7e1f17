//! Word document text extraction over the OOXML package (zip + quick-xml).

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use digest_core::{BackendError, DocxBackend};

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads `word/document.xml` and emits the text of every `w:t` run.
///
/// Paragraphs are each followed by a blank line, tabs become `\t` and
/// line/carriage breaks become `\n`. Legacy binary `.doc` files are not zip
/// packages and fail with [`BackendError::OpenError`].
#[derive(Debug, Default)]
pub struct ZipDocxBackend;

impl ZipDocxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocxBackend for ZipDocxBackend {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| BackendError::OpenError(format!("not a Word package: {}", e)))?;

        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| BackendError::OpenError(format!("missing {}: {}", DOCUMENT_PART, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;

        raw_text_from_document_xml(&xml)
    }
}

fn raw_text_from_document_xml(xml: &str) -> Result<String, BackendError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;
    // Tab stops in `w:pPr/w:tabs` are also `w:tab`; only those inside a
    // run are content.
    let mut run_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" => in_text_node = true,
                b"w:tab" if run_depth > 0 => output.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => output.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:p" => output.push_str("\n\n"),
                b"w:tab" if run_depth > 0 => output.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text_node {
                    let text = e
                        .unescape()
                        .map_err(|err| BackendError::ExtractionError(err.to_string()))?;
                    output.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text_node = false,
                b"w:p" => output.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(BackendError::ExtractionError(format!(
                    "malformed document XML at byte {}: {}",
                    reader.buffer_position(),
                    err
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">World </w:t></w:r><w:r><w:t>again</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = ZipDocxBackend::new()
            .extract_raw_text(&docx_bytes(xml))
            .unwrap();
        assert_eq!(text, "Hello\n\nWorld again\n\n");
    }

    #[test]
    fn tabs_breaks_and_entities() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>a</w:t><w:tab/><w:t>b &amp; c</w:t><w:br/><w:t>d</w:t></w:r></w:p><w:p/></w:body></w:document>"#;
        let text = raw_text_from_document_xml(xml).unwrap();
        assert_eq!(text, "a\tb & c\nd\n\n\n\n");
    }

    #[test]
    fn tab_stop_definitions_are_not_text() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/><w:tab w:val="right" w:pos="9000"/></w:tabs></w:pPr><w:r><w:t>Abstract</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(raw_text_from_document_xml(xml).unwrap(), "Abstract\n\n");
    }

    #[test]
    fn tab_stops_and_run_tabs_together() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:tabs><w:tab w:val="right" w:pos="9000"/></w:tabs></w:pPr><w:r><w:t>1.</w:t><w:tab/><w:t>Introduction</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(
            raw_text_from_document_xml(xml).unwrap(),
            "1.\tIntroduction\n\n"
        );
    }

    #[test]
    fn text_outside_runs_is_ignored() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr>stray<w:r><w:t>kept</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(raw_text_from_document_xml(xml).unwrap(), "kept\n\n");
    }

    #[test]
    fn non_zip_bytes_fail_to_open() {
        let err = ZipDocxBackend::new()
            .extract_raw_text(b"\xD0\xCF\x11\xE0 legacy binary")
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }

    #[test]
    fn package_without_document_part_fails() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = ZipDocxBackend::new().extract_raw_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
