use async_trait::async_trait;
use rig::completion::Prompt;
use tracing::{error, info};

use super::utils::get_llm_agent;
use crate::config::ApiKey;
use crate::error::PipelineError;
use crate::models::ModelId;

/// Section headings the model is told to emit, in output order.
pub const SECTION_HEADINGS: [&str; 7] = [
    "タイトル",
    "著者",
    "背景・目的",
    "方法",
    "結果・考察",
    "主張の限界・残された課題",
    "参考文献",
];

const PROMPT_TEMPLATE: &str = "以下の英語の学術論文を読み、指定された項目に従って情報を抽出・要約してください。

【指示】
1.  まず、論文の本文から「タイトル」と「著者」を正確に抽出してください。
2.  次に、以下の項目について日本語で要約してください。
    - 「背景・目的」
    - 「方法」
    - 「結果・考察」
    - 「主張の限界・残された課題」
3.  「参考文献」は原文のまま抽出し、各文献を改行で区切ってリスト形式にしてください。
4.  出力は全体としてマークダウン形式で、各セクションのタイトル（「タイトル」「著者」「背景・目的」など）のみを `###` を使って記述し、本文は平文で出力してください（太字などの装飾は不要です）。

【出力フォーマット】
### タイトル
ここに抽出したタイトルを記述

### 著者
ここに抽出した著者リストを記述

### 背景・目的
ここに内容を記述

### 方法
ここに内容を記述

### 結果・考察
ここに内容を記述

### 主張の限界・残された課題
ここに内容を記述

### 参考文献
- 文献1
- 文献2
- ...

---

【論文本文】
";

/// The fixed instruction template with the paper text appended verbatim.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_TEMPLATE.len() + text.len());
    prompt.push_str(PROMPT_TEMPLATE);
    prompt.push_str(text);
    prompt
}

/// One round trip to a hosted generative model.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        api_key: &ApiKey,
        model: ModelId,
        prompt: &str,
    ) -> anyhow::Result<String>;
}

/// Google Gemini through rig. A client is built per call from the key it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiBackend;

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        api_key: &ApiKey,
        model: ModelId,
        prompt: &str,
    ) -> anyhow::Result<String> {
        let agent = get_llm_agent(api_key, model)?;
        let response = agent.prompt(prompt).await?;
        Ok(response)
    }
}

/// Summarize extracted paper text. Exactly one backend call; the reply is returned untouched.
pub async fn summarize(
    backend: &dyn GenerativeBackend,
    api_key: &ApiKey,
    model: ModelId,
    text: &str,
) -> Result<String, PipelineError> {
    let prompt = build_prompt(text);
    info!(
        "Requesting summary from {} ({} prompt characters)",
        model,
        prompt.chars().count()
    );

    match backend.generate(api_key, model, &prompt).await {
        Ok(summary) => {
            info!("Received summary ({} characters)", summary.chars().count());
            Ok(summary)
        }
        Err(e) => {
            error!("Summary request to {} failed: {}", model, e);
            Err(PipelineError::Api(e.to_string()))
        }
    }
}
