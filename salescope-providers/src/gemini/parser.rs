//! Gemini response parsing

use crate::constants::GEMINI_PROVIDER;
use crate::error;
use crate::gemini::converter::{GeminiResponse, GeminiUsage, GroundingMetadata};
use crate::traits::ResponseParser;
use async_trait::async_trait;
use salescope_core::{Error, Response, ResponseMetadata, Source, Usage};
use serde_json::Value;

pub fn parse_response(response: GeminiResponse) -> Result<Response, Error> {
    let usage = response.usage_metadata.as_ref().map(parse_usage);
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| error::provider_error(GEMINI_PROVIDER, "response has no candidates", None))?;

    let content = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(parse_sources)
        .unwrap_or_default();

    Ok(Response {
        content,
        sources,
        metadata: ResponseMetadata {
            model: response.model_version,
            usage,
            finish_reason: candidate.finish_reason,
        },
    })
}

/// Web sources from grounding metadata
///
/// Attributions are preferred; grounding chunks are used when a response
/// carries no attributions. Entries without a URI are skipped.
pub fn parse_sources(metadata: GroundingMetadata) -> Vec<Source> {
    let entries = if metadata.grounding_attributions.is_empty() {
        metadata.grounding_chunks
    } else {
        metadata.grounding_attributions
    };

    entries
        .into_iter()
        .filter_map(|entry| entry.web)
        .filter_map(|web| {
            let uri = web.uri?;
            Some(Source {
                title: web.title.unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect()
}

pub fn parse_usage(usage: &GeminiUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        total_tokens: usage.total_token_count,
    }
}

/// Parser implementation for Gemini
#[derive(Clone, Copy)]
pub struct GeminiParser;

#[async_trait]
impl ResponseParser for GeminiParser {
    async fn parse_response(&self, value: Value) -> Result<Response, Error> {
        let gemini_response: GeminiResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;
        parse_response(gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> Result<Response, Error> {
        parse_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_parse_text_and_usage() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Revenue grew "}, {"text": "12%."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 8, "totalTokenCount": 128},
            "modelVersion": "gemini-2.5-flash"
        }))
        .unwrap();

        assert_eq!(response.content, "Revenue grew 12%.");
        assert!(response.sources.is_empty());
        assert_eq!(response.metadata.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.metadata.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(response.metadata.usage.unwrap().total_tokens, 128);
    }

    #[test]
    fn test_parse_grounding_sources() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Carnival is next week."}]},
                "groundingMetadata": {
                    "groundingAttributions": [
                        {"web": {"title": "Holidays 2024", "uri": "https://example.com/holidays"}},
                        {"web": {"title": "No link"}},
                        {"segment": {}}
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            response.sources,
            vec![Source {
                title: "Holidays 2024".into(),
                uri: "https://example.com/holidays".into()
            }]
        );
    }

    #[test]
    fn test_parse_grounding_chunks_fallback() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "ok"}]},
                "groundingMetadata": {
                    "groundingChunks": [{"web": {"uri": "https://example.com/a"}}]
                }
            }]
        }))
        .unwrap();

        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].title, "https://example.com/a");
    }

    #[test]
    fn test_no_candidates_is_provider_error() {
        let err = parse(json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, Error::Provider { status: None, .. }));
    }

    #[tokio::test]
    async fn test_parser_rejects_malformed_body() {
        let err = GeminiParser
            .parse_response(json!({"candidates": "nope"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }
}
