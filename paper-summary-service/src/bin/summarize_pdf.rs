use anyhow::Result;
use paper_summary_service::{
    GeminiBackend, ModelId, RunRequest, SecretStore, ServiceConfig, SummaryPipeline,
    upload::UploadedFile,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Paper PDF -> Text -> Gemini Summary");
    println!("===================================");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <pdf_file_path> [model]", args[0]);
        eprintln!("Example: {} /path/to/paper.pdf gemini-2.5-flash", args[0]);
        std::process::exit(1);
    }

    let pdf_path = &args[1];
    let model = match args.get(2) {
        Some(name) => name.parse::<ModelId>()?,
        None => ModelId::default(),
    };

    let config = ServiceConfig::from_env();
    let secrets = SecretStore::load(&config.secrets_file)?;
    let Some(api_key) = secrets.api_key() else {
        eprintln!(
            "No GEMINI_API_KEY in {}; ask the administrator to configure it",
            config.secrets_file.display()
        );
        std::process::exit(1);
    };

    let data = tokio::fs::read(pdf_path).await?;
    println!("Processing PDF: {} ({} bytes)", pdf_path, data.len());
    println!("Model: {}", model);
    println!();

    let pipeline = SummaryPipeline::new(Arc::new(GeminiBackend));
    let outcome = pipeline
        .run(RunRequest {
            api_key: Some(api_key),
            model,
            file: Some(UploadedFile {
                filename: pdf_path.clone(),
                data,
            }),
        })
        .await;

    for notice in &outcome.notices {
        eprintln!("{:?}: {}", notice.level, notice.message);
    }

    match outcome.summary {
        Some(summary) => {
            if let Some(chars) = outcome.extracted_chars {
                println!("Extracted {} characters", chars);
            }
            println!();
            println!("要約結果");
            println!("────────");
            println!("{}", summary);
            Ok(())
        }
        None => std::process::exit(1),
    }
}
