//! Document Serializer — plain text back to a downloadable document.

use std::io::Cursor;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use uuid::Uuid;

use super::{DocumentFormat, PipelineError};

// Single-page US letter layout. One input line per output line, no wrap,
// no pagination: long lines run past the page edge, long documents past the
// bottom margin. Mirrors the editing view, which is line-oriented.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: i64 = 40;
const TOP_BASELINE: i64 = PAGE_HEIGHT - 50;
const FONT_SIZE: i64 = 12;
const LEADING: i64 = 14;

/// Serializes text into a document of the given format.
pub fn serialize(text: &str, format: DocumentFormat) -> Result<Vec<u8>, PipelineError> {
    match format {
        DocumentFormat::Pdf => serialize_pdf(text),
        DocumentFormat::Docx => serialize_docx(text),
        DocumentFormat::Text => Ok(text.as_bytes().to_vec()),
    }
}

/// Derives the download filename from the upload's name: same stem, an
/// `_enhanced` suffix, a short per-request id so concurrent downloads never
/// collide, and the extension of the target format.
pub fn output_filename(original_filename: &str, format: DocumentFormat) -> String {
    let stem = original_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_filename);
    let stem = if stem.is_empty() { "resume" } else { stem };
    let request_id = Uuid::new_v4().simple().to_string();
    format!("{stem}_enhanced_{}.{}", &request_id[..8], format.extension())
}

fn serialize_pdf(text: &str) -> Result<Vec<u8>, PipelineError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN_LEFT.into(), TOP_BASELINE.into()]),
    ];
    for line in text.split('\n') {
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.trim_end_matches('\r'))],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PipelineError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn serialize_docx(text: &str) -> Result<Vec<u8>, PipelineError> {
    use docx_rs::{Docx, Paragraph, Run};

    let mut docx = Docx::new();
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| PipelineError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_serialization_is_verbatim() {
        let input = "Jane Doe\n\nExperience: 5 years";
        let bytes = serialize(input, DocumentFormat::Text).unwrap();
        assert_eq!(bytes, input.as_bytes());
    }

    #[test]
    fn test_pdf_serialization_produces_a_pdf() {
        let bytes = serialize("Jane Doe\nSoftware Engineer", DocumentFormat::Pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_docx_serialization_produces_a_zip() {
        let bytes = serialize("Jane Doe", DocumentFormat::Docx).unwrap();
        // DOCX is a ZIP archive: PK magic.
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_output_filename_keeps_stem_and_uniquifies() {
        let a = output_filename("jane_resume.docx", DocumentFormat::Docx);
        let b = output_filename("jane_resume.docx", DocumentFormat::Docx);
        assert!(a.starts_with("jane_resume_enhanced_"));
        assert!(a.ends_with(".docx"));
        assert_ne!(a, b, "two requests must never share an output filename");
    }

    #[test]
    fn test_output_filename_extension_follows_target_format() {
        let name = output_filename("resume.docx", DocumentFormat::Pdf);
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_output_filename_without_extension() {
        let name = output_filename("resume", DocumentFormat::Text);
        assert!(name.starts_with("resume_enhanced_"));
        assert!(name.ends_with(".txt"));
    }
}
