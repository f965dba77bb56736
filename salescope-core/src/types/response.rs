//! Response types for summarization calls

use std::fmt;

/// A web source the model used to ground its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Page title
    pub title: String,
    /// Page URI
    pub uri: String,
}

/// Token usage statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Metadata about a response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMetadata {
    /// Model used for generation
    pub model: Option<String>,
    /// Usage statistics
    pub usage: Option<Usage>,
    /// Finish reason reported by the provider
    pub finish_reason: Option<String>,
}

/// A complete response from the summarization service
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The generated text
    pub content: String,
    /// Grounding sources, if any
    pub sources: Vec<Source>,
    /// Response metadata
    pub metadata: ResponseMetadata,
}

impl Response {
    /// Create a simple text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sources: Vec::new(),
            metadata: ResponseMetadata::default(),
        }
    }

    /// The text followed by a markdown reference list of the sources
    pub fn with_references(&self) -> String {
        if self.sources.is_empty() {
            return self.content.clone();
        }
        let references: Vec<String> = self
            .sources
            .iter()
            .map(|s| format!("- [{}]({})", s.title, s.uri))
            .collect();
        format!(
            "{}\n\n---\n**References:**\n{}",
            self.content,
            references.join("\n")
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)?;
        if !self.sources.is_empty() {
            write!(f, " [+{} sources]", self.sources.len())?;
        }
        Ok(())
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Usage(prompt: {}, completion: {}, total: {})",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_references_appended() {
        let mut response = Response::text("Revenue grew 12%.");
        assert_eq!(response.with_references(), "Revenue grew 12%.");

        response.sources.push(Source {
            title: "Food delivery trends".into(),
            uri: "https://example.com/trends".into(),
        });
        assert_eq!(
            response.with_references(),
            "Revenue grew 12%.\n\n---\n**References:**\n- [Food delivery trends](https://example.com/trends)"
        );
        assert_eq!(response.to_string(), "Revenue grew 12%. [+1 sources]");
    }
}
