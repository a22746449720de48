//! Content Extractor — document bytes to ordered text sections.
//!
//! Pure function of the bytes and the declared format; never touches disk.

use super::{docx, split_sections, DocumentFormat, ExtractedText, PipelineError};

/// Extracts the textual content of a document.
///
/// - PDF: page text in page order, split into sections on blank lines.
/// - DOCX: paragraphs in document order, blank paragraphs as section
///   boundaries, table cell text appended as extra blocks.
/// - Text: the UTF-8 string, split into sections on blank lines.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<ExtractedText, PipelineError> {
    let sections = match format {
        DocumentFormat::Pdf => {
            let content = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| PipelineError::Pdf(e.to_string()))?;
            split_sections(&content)
        }
        DocumentFormat::Docx => docx::extract_sections(bytes)?,
        DocumentFormat::Text => {
            let content = std::str::from_utf8(bytes).map_err(|_| PipelineError::InvalidUtf8)?;
            split_sections(content)
        }
    };

    Ok(ExtractedText { sections })
}
