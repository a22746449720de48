//! Minimal DOCX reader: ZIP + streaming XML walk over `word/document.xml`.
//!
//! A DOCX file is a ZIP archive; paragraph text lives in `w:t` runs inside
//! `w:p` elements. Body paragraphs feed the section accumulator; paragraphs
//! inside `w:tbl` are collected per cell and appended as extra blocks after
//! the body sections.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::PipelineError;

/// Extracts ordered sections from DOCX bytes.
///
/// A body paragraph whose stripped text is empty closes the current section;
/// non-empty paragraphs accumulate with a trailing newline. Non-empty table
/// cells follow as one block each, in document order.
pub fn extract_sections(bytes: &[u8]) -> Result<Vec<String>, PipelineError> {
    let document_xml = read_document_xml(bytes)?;

    let mut reader = Reader::from_str(&document_xml);
    let mut buf = Vec::new();

    let mut sections: Vec<String> = Vec::new();
    let mut table_blocks: Vec<String> = Vec::new();

    let mut current_section = String::new();
    let mut paragraph = String::new();
    let mut cell = String::new();

    let mut in_text_run = false;
    let mut table_depth = 0usize;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| PipelineError::Docx(format!("invalid document.xml: {e}")))?
        {
            Event::Start(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:p" => paragraph.clear(),
                b"w:tbl" => table_depth += 1,
                b"w:tc" => cell.clear(),
                _ => {}
            },
            // Self-closing elements: run structure, or a blank paragraph.
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                b"w:p" => {
                    if table_depth == 0 && !current_section.is_empty() {
                        sections.push(std::mem::take(&mut current_section));
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_text_run {
                    let text = t
                        .unescape()
                        .map_err(|e| PipelineError::Docx(format!("invalid text run: {e}")))?;
                    paragraph.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if table_depth > 0 {
                        if !paragraph.trim().is_empty() {
                            cell.push_str(paragraph.trim());
                            cell.push('\n');
                        }
                    } else if paragraph.trim().is_empty() {
                        if !current_section.is_empty() {
                            sections.push(std::mem::take(&mut current_section));
                        }
                    } else {
                        current_section.push_str(paragraph.trim());
                        current_section.push('\n');
                    }
                }
                b"w:tc" => {
                    if !cell.is_empty() {
                        table_blocks.push(std::mem::take(&mut cell));
                    }
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !current_section.is_empty() {
        sections.push(current_section);
    }
    sections.extend(table_blocks);

    Ok(sections)
}

fn read_document_xml(bytes: &[u8]) -> Result<String, PipelineError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PipelineError::Docx(format!("not a DOCX archive: {e}")))?;
    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| PipelineError::Docx(format!("missing word/document.xml: {e}")))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| PipelineError::Docx(format!("unreadable word/document.xml: {e}")))?;
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_from_xml(document_xml: &str) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    fn paragraph_xml(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_blank_paragraph_splits_sections() {
        let xml = format!(
            "<w:document><w:body>{}{}<w:p/>{}</w:body></w:document>",
            paragraph_xml("Jane Doe"),
            paragraph_xml("Software Engineer"),
            paragraph_xml("Experience: 5 years"),
        );
        let sections = extract_sections(&docx_from_xml(&xml)).unwrap();
        assert_eq!(
            sections,
            vec![
                "Jane Doe\nSoftware Engineer\n".to_string(),
                "Experience: 5 years\n".to_string()
            ]
        );
    }

    #[test]
    fn test_trailing_section_is_flushed() {
        let xml = format!(
            "<w:document><w:body>{}</w:body></w:document>",
            paragraph_xml("Summary"),
        );
        let sections = extract_sections(&docx_from_xml(&xml)).unwrap();
        assert_eq!(sections, vec!["Summary\n".to_string()]);
    }

    #[test]
    fn test_table_cells_append_as_extra_blocks() {
        let xml = format!(
            "<w:document><w:body>{}<w:tbl><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl></w:body></w:document>",
            paragraph_xml("Skills"),
            paragraph_xml("Rust"),
            paragraph_xml("Python"),
        );
        let sections = extract_sections(&docx_from_xml(&xml)).unwrap();
        assert_eq!(
            sections,
            vec![
                "Skills\n".to_string(),
                "Rust\n".to_string(),
                "Python\n".to_string()
            ]
        );
    }

    #[test]
    fn test_not_a_zip_is_a_docx_error() {
        let err = extract_sections(b"plainly not a zip").unwrap_err();
        assert!(matches!(err, PipelineError::Docx(_)));
    }
}
