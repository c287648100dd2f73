use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::config::ApiKey;
use crate::models::{ModelId, Notice, RunOutcome};
use crate::tasks::{GenerativeBackend, extract_text_blocking, summarize};
use crate::upload::UploadedFile;

pub const MISSING_KEY_WARNING: &str = "サイドバーでGemini APIキーを入力してください。";
pub const MISSING_FILE_WARNING: &str = "論文のPDFファイルをアップロードしてください。";
pub const EMPTY_TEXT_WARNING: &str = "テキストを抽出できませんでした";
pub const EXTRACTING_MESSAGE: &str = "論文を読み込んでいます...";

pub fn summarizing_message(model: ModelId) -> String {
    format!("{} が論文を要約しています...", model)
}

/// Inputs of one run action.
#[derive(Debug)]
pub struct RunRequest {
    pub api_key: Option<ApiKey>,
    pub model: ModelId,
    pub file: Option<UploadedFile>,
}

/// Extract → summarize, strictly in sequence, stopping at the first failure.
#[derive(Clone)]
pub struct SummaryPipeline {
    backend: Arc<dyn GenerativeBackend>,
}

impl SummaryPipeline {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub async fn run(&self, request: RunRequest) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id, model = %request.model);
        self.run_steps(request).instrument(span).await
    }

    async fn run_steps(&self, request: RunRequest) -> RunOutcome {
        let RunRequest {
            api_key,
            model,
            file,
        } = request;

        let Some(api_key) = api_key else {
            warn!("Run requested without an API key");
            return RunOutcome::with_notice(Notice::warning(MISSING_KEY_WARNING));
        };
        let Some(file) = file else {
            warn!("Run requested without an uploaded file");
            return RunOutcome::with_notice(Notice::warning(MISSING_FILE_WARNING));
        };

        info!("{} ({}, {} bytes)", EXTRACTING_MESSAGE, file.filename, file.data.len());
        let text = match extract_text_blocking(file.data).await {
            Ok(text) => text,
            Err(e) => return RunOutcome::with_notice(Notice::error(e.to_string())),
        };

        let extracted_chars = text.chars().count();
        if text.is_empty() {
            warn!("No text extracted from {}", file.filename);
            return RunOutcome {
                notices: vec![Notice::warning(EMPTY_TEXT_WARNING)],
                summary: None,
                extracted_chars: Some(extracted_chars),
            };
        }

        info!("{}", summarizing_message(model));
        match summarize(self.backend.as_ref(), &api_key, model, &text).await {
            Ok(summary) => RunOutcome {
                notices: Vec::new(),
                summary: Some(summary),
                extracted_chars: Some(extracted_chars),
            },
            Err(e) => RunOutcome {
                notices: vec![Notice::error(e.to_string())],
                summary: None,
                extracted_chars: Some(extracted_chars),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeLevel;
    use crate::tasks::pdf_extract::tests::pdf_with_pages;
    use crate::tasks::summarize::tests::RecordingBackend;

    fn pdf_upload(data: Vec<u8>) -> Option<UploadedFile> {
        Some(UploadedFile {
            filename: "paper.pdf".to_string(),
            data,
        })
    }

    #[tokio::test]
    async fn missing_key_warns_and_does_nothing() {
        let backend = Arc::new(RecordingBackend::replying("unused"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: None,
                model: ModelId::default(),
                file: pdf_upload(pdf_with_pages(&["text"])),
            })
            .await;

        assert_eq!(outcome.notices, vec![Notice::warning(MISSING_KEY_WARNING)]);
        assert!(outcome.extracted_chars.is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_file_warns_and_does_nothing() {
        let backend = Arc::new(RecordingBackend::replying("unused"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("k")),
                model: ModelId::default(),
                file: None,
            })
            .await;

        assert_eq!(outcome.notices, vec![Notice::warning(MISSING_FILE_WARNING)]);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn corrupt_pdf_yields_one_error_and_no_api_call() {
        let backend = Arc::new(RecordingBackend::replying("unused"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("k")),
                model: ModelId::Gemini25Flash,
                file: pdf_upload(b"%PDF-1.4\n\x00\x01garbage".to_vec()),
            })
            .await;

        assert_eq!(outcome.errors().count(), 1);
        assert!(outcome.notices[0].message.starts_with("PDFの読み込み中にエラーが発生しました"));
        assert!(outcome.summary.is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_run_passes_extracted_text_and_returns_reply() {
        let reply = "### タイトル\nT\n### 著者\nA\n### 背景・目的\nB\n### 方法\nM\n\
            ### 結果・考察\nR\n### 主張の限界・残された課題\nL\n### 参考文献\n- X\n";
        let backend = Arc::new(RecordingBackend::replying(reply));
        let pipeline = SummaryPipeline::new(backend.clone());
        let bytes = pdf_with_pages(&["Hello", "World"]);
        let expected_text = crate::tasks::extract_text(&bytes).unwrap();

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("k")),
                model: ModelId::Gemini25Flash,
                file: pdf_upload(bytes),
            })
            .await;

        assert!(outcome.notices.is_empty());
        assert_eq!(outcome.summary.as_deref(), Some(reply));
        assert_eq!(outcome.extracted_chars, Some(expected_text.chars().count()));

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, ModelId::Gemini25Flash);
        assert!(calls[0].2.ends_with(&expected_text));
    }

    #[tokio::test]
    async fn api_failure_yields_one_error_and_no_summary() {
        let backend = Arc::new(RecordingBackend::failing("401 Unauthorized"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("bad")),
                model: ModelId::Gemini20Flash,
                file: pdf_upload(pdf_with_pages(&["Some text"])),
            })
            .await;

        assert_eq!(outcome.errors().count(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert!(outcome.notices[0].message.contains("401 Unauthorized"));
        assert!(outcome.summary.is_none());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn whitespace_only_text_is_still_summarized() {
        let backend = Arc::new(RecordingBackend::replying("### タイトル\n"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("k")),
                model: ModelId::default(),
                file: pdf_upload(pdf_with_pages(&[" "])),
            })
            .await;

        assert!(outcome.notices.is_empty());
        assert_eq!(outcome.summary.as_deref(), Some("### タイトル\n"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn document_without_pages_stops_before_summarizing() {
        let backend = Arc::new(RecordingBackend::replying("unused"));
        let pipeline = SummaryPipeline::new(backend.clone());

        let outcome = pipeline
            .run(RunRequest {
                api_key: Some(ApiKey::new("k")),
                model: ModelId::default(),
                file: pdf_upload(pdf_with_pages(&[])),
            })
            .await;

        assert_eq!(outcome.notices, vec![Notice::warning(EMPTY_TEXT_WARNING)]);
        assert_eq!(backend.call_count(), 0);
    }
}
