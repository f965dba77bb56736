//! Conversion between Salescope types and Gemini API types

use crate::error;
use crate::traits::RequestConverter;
use async_trait::async_trait;
use salescope_core::{Error, Message, Request, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Gemini API request types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeminiTool {
    pub google_search: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

// Gemini API response types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub usage_metadata: Option<GeminiUsage>,
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_attributions: Vec<GroundingEntry>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingEntry {
    pub web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
pub struct WebSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

fn convert_message(message: &Message) -> Option<GeminiContent> {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "model",
        _ => return None,
    };
    Some(text_content(Some(role), &message.content))
}

// Conversion functions
pub fn to_gemini_request(request: &Request, web_search: bool) -> GeminiRequest {
    let contents = request.messages.iter().filter_map(convert_message).collect();

    let system_instruction = request
        .system_instruction
        .as_deref()
        .map(|text| text_content(None, text));

    let tools = (request.web_search || web_search).then(|| {
        vec![GeminiTool {
            google_search: Value::Object(Default::default()),
        }]
    });

    let params = &request.parameters;
    let generation_config = (params.temperature.is_some() || params.max_tokens.is_some()).then(|| {
        GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_tokens,
        }
    });

    GeminiRequest {
        contents,
        system_instruction,
        tools,
        generation_config,
    }
}

/// Converter implementation for Gemini
#[derive(Clone, Copy, Default)]
pub struct GeminiConverter {
    /// Force the search tool on regardless of the request flag
    pub web_search: bool,
}

#[async_trait]
impl RequestConverter for GeminiConverter {
    async fn convert_request(&self, request: Request) -> Result<Value, Error> {
        let gemini_request = to_gemini_request(&request, self.web_search);
        serde_json::to_value(gemini_request).map_err(error::serialization_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_history_and_system_instruction() {
        let request = Request::builder()
            .message(Message::user("How did we do?"))
            .message(Message::assistant("Revenue was R$ 180.00."))
            .message(Message::user("And the best store?"))
            .system_instruction("You are a sales analyst.")
            .build();

        let value = serde_json::to_value(to_gemini_request(&request, false)).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "How did we do?"}]},
                    {"role": "model", "parts": [{"text": "Revenue was R$ 180.00."}]},
                    {"role": "user", "parts": [{"text": "And the best store?"}]},
                ],
                "systemInstruction": {"parts": [{"text": "You are a sales analyst."}]},
            })
        );
    }

    #[test]
    fn test_search_tool_and_generation_config() {
        let request = Request::builder()
            .message(Message::user("Any holidays this week?"))
            .web_search(true)
            .temperature(0.2)
            .max_tokens(512)
            .build();

        let value = serde_json::to_value(to_gemini_request(&request, false)).unwrap();
        assert_eq!(value["tools"], json!([{"google_search": {}}]));
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(512));
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_converter_forces_search() {
        let converter = GeminiConverter { web_search: true };
        let value =
            tokio_test::block_on(converter.convert_request(Request::new(vec![Message::user("hi")])))
                .unwrap();
        assert!(value["tools"].is_array());
    }
}
