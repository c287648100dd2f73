use std::path::PathBuf;
use thiserror::Error;

/// Failure of one pipeline step. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("PDFの読み込み中にエラーが発生しました: {0}")]
    Extraction(String),

    #[error("Gemini APIとの通信中にエラーが発生しました: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
