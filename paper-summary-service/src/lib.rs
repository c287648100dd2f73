pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;
pub mod template;
pub mod upload;
pub mod workflow;

pub use config::{ApiKey, SecretStore, ServiceConfig};
pub use error::{ConfigError, PipelineError};
pub use service::{AppState, create_app};
pub use tasks::{GeminiBackend, GenerativeBackend};
pub use workflow::{RunRequest, SummaryPipeline};
pub use models::*;
