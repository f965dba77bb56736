//! System instruction template

use handlebars::Handlebars;
use salescope_analytics::AnalysisContext;
use salescope_core::{Error, Result};
use serde::Serialize;

const TEMPLATE_NAME: &str = "system_instruction";

/// Default system instruction
///
/// Receives `role`, `guidance`, `schema`, `period` and `context` (the
/// machine document as pretty-printed JSON).
pub const DEFAULT_TEMPLATE: &str = "\
{{role}} Analyze the data provided and answer professionally.
{{guidance}}
Schema: {{schema}}
Period: {{period}}
Context: {{context}}
";

/// Short description of the sales database given to the model
pub const SCHEMA_DESCRIPTION: &str = "The database holds tables such as 'sales', \
'product_sales' and 'products', related by IDs. Focus on sales and products.";

#[derive(Serialize)]
struct PromptData<'a> {
    role: &'a str,
    guidance: &'a str,
    schema: &'a str,
    period: String,
    context: String,
}

/// Renders the system instruction sent with every question
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    registry: Handlebars<'static>,
    role: String,
    guidance: String,
}

impl PromptTemplate {
    /// The default template
    pub fn new() -> Self {
        // The default template is a constant known to parse
        Self::with_template(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self {
            registry: Handlebars::new(),
            role: String::new(),
            guidance: String::new(),
        })
    }

    /// A custom template
    pub fn with_template(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| Error::Configuration(format!("Invalid prompt template: {}", e)))?;

        Ok(Self {
            registry,
            role: "You are a senior strategic marketing and CRM analyst.".to_string(),
            guidance: "Use web search for market trends. Keep answers concise and focused on growth."
                .to_string(),
        })
    }

    /// Set the analyst persona
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the answering guidance
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = guidance.into();
        self
    }

    /// Render the instruction for a context
    pub fn render(&self, context: &AnalysisContext) -> Result<String> {
        let document = serde_json::to_string_pretty(&context.to_machine_document())?;
        let data = PromptData {
            role: &self.role,
            guidance: &self.guidance,
            schema: SCHEMA_DESCRIPTION,
            period: context.period_label(),
            context: document,
        };
        self.registry
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| Error::Configuration(format!("Failed to render prompt: {}", e)))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}
