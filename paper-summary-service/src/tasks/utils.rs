use rig::{
    agent::Agent,
    client::CompletionClient,
    providers::gemini::{self, completion::gemini_api_types::AdditionalParameters},
};

use crate::config::ApiKey;
use crate::models::ModelId;

/// Build a Gemini agent from an explicit key; nothing is cached between calls.
///
/// The Gemini request builder requires a `generationConfig` block, so the defaults are always
/// sent as additional params.
pub fn get_llm_agent(
    api_key: &ApiKey,
    model: ModelId,
) -> anyhow::Result<Agent<gemini::completion::CompletionModel>> {
    let client = gemini::Client::new(api_key.expose());
    let params = serde_json::to_value(AdditionalParameters::default())?;
    let agent = client.agent(model.as_str()).additional_params(params).build();
    Ok(agent)
}
