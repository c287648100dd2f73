pub mod pdf_extract;
pub mod summarize;
pub mod utils;

pub use pdf_extract::{extract_text, extract_text_blocking};
pub use summarize::{GeminiBackend, GenerativeBackend, build_prompt, summarize};
