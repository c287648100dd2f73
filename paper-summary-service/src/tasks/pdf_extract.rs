use crate::error::PipelineError;
use lopdf::Document;
use tracing::{info, warn};

/// PDF bytes → plain text of every page, in page order.
///
/// Page texts are appended as-is with no separator, so the last word of one page can run
/// straight into the first word of the next. Encrypted or unreadable documents fail as a whole;
/// there is no per-page recovery.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, PipelineError> {
    let doc = Document::load_mem(pdf_bytes).map_err(|e| {
        warn!("Failed to load PDF: {}", e);
        PipelineError::Extraction(e.to_string())
    })?;

    if doc.is_encrypted() {
        warn!("Refusing encrypted PDF");
        return Err(PipelineError::Extraction(
            "document is encrypted".to_string(),
        ));
    }

    let pages = doc.get_pages();
    info!("Extracting text from {} page(s)", pages.len());

    let text = concat_pages(pages.keys().map(|page_number| {
        doc.extract_text(&[*page_number]).map_err(|e| {
            warn!("Failed to extract text from page {}: {}", page_number, e);
            PipelineError::Extraction(e.to_string())
        })
    }))?;

    info!("Extracted {} characters", text.chars().count());
    Ok(text)
}

/// Same as [`extract_text`], off the async runtime.
pub async fn extract_text_blocking(pdf_bytes: Vec<u8>) -> Result<String, PipelineError> {
    tokio::task::spawn_blocking(move || extract_text(&pdf_bytes))
        .await
        .map_err(|e| PipelineError::Extraction(e.to_string()))?
}

/// Join page texts in order, stopping at the first failing page.
pub fn concat_pages<I, E>(pages: I) -> Result<String, E>
where
    I: IntoIterator<Item = Result<String, E>>,
{
    pages.into_iter().try_fold(String::new(), |mut text, page| {
        text.push_str(&page?);
        Ok(text)
    })
}
