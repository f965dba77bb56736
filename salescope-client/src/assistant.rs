//! Conversational analysis assistant

use crate::config::DashboardConfig;
use crate::prompt::PromptTemplate;
use salescope_analytics::{AnalysisContext, ContextBuilder};
use salescope_core::{
    AnalysisPeriod, Message, Model, RecordSource, Request, Response, Result, Summarizer,
};
use salescope_middleware::LoggingSummarizer;
use salescope_providers::Gemini;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Answers questions about a period of sales
///
/// Every question is sent with the conversation so far and a system
/// instruction holding the analysis context of the selected period. The
/// context is rebuilt per question, so the period can change between turns.
pub struct Assistant<S: Summarizer> {
    summarizer: S,
    source: Arc<dyn RecordSource>,
    context_builder: ContextBuilder,
    prompt: PromptTemplate,
    model: Model,
    web_search: bool,
    conversation_id: Uuid,
    history: Vec<Message>,
}

impl<S: Summarizer> Assistant<S> {
    /// Create an assistant over a record source
    pub fn new(source: Arc<dyn RecordSource>, summarizer: S) -> Self {
        Self {
            summarizer,
            source,
            context_builder: ContextBuilder::default(),
            prompt: PromptTemplate::default(),
            model: Model::default(),
            web_search: true,
            conversation_id: Uuid::new_v4(),
            history: Vec::new(),
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    /// Set how contexts are built
    pub fn with_context_builder(mut self, builder: ContextBuilder) -> Self {
        self.context_builder = builder;
        self
    }

    /// Set the system instruction template
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Enable or disable web search grounding
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    /// Identifier of the current conversation
    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    /// Messages exchanged so far
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Forget the conversation and start a new one
    pub fn reset(&mut self) {
        self.history.clear();
        self.conversation_id = Uuid::new_v4();
        debug!(conversation = %self.conversation_id, "Started new conversation");
    }

    /// First to last completed sale date, if any sale completed
    pub async fn default_period(&self) -> Result<Option<AnalysisPeriod>> {
        let records = self.source.load().await?;
        Ok(records
            .completed_date_range()
            .and_then(|(start, end)| AnalysisPeriod::new(start, end).ok()))
    }

    /// The analysis context for a period
    ///
    /// Only completed sales and completed line items are considered.
    pub async fn context(&self, period: &AnalysisPeriod) -> Result<AnalysisContext> {
        let records = self.source.load().await?;
        Ok(self.context_builder.build(
            &records.sales,
            records.completed_line_items(),
            period.start(),
            period.end(),
        ))
    }

    /// Ask a question about `period`
    ///
    /// The question and the answer (with its references appended) join the
    /// history only when the summarizer succeeds.
    pub async fn ask(
        &mut self,
        question: impl Into<String>,
        period: &AnalysisPeriod,
    ) -> Result<Response> {
        let question = question.into();
        let context = self.context(period).await?;
        let instruction = self.prompt.render(&context)?;

        let request = Request::builder()
            .messages(self.history.iter().cloned())
            .message(Message::user(question.clone()))
            .model(self.model.clone())
            .system_instruction(instruction)
            .web_search(self.web_search)
            .build();

        info!(
            conversation = %self.conversation_id,
            period = %period,
            history = self.history.len(),
            orders = context.general_kpis.total_orders,
            "Asking assistant"
        );

        let response = self.summarizer.request(request).await?;

        self.history.push(Message::user(question));
        self.history.push(Message::assistant(response.with_references()));
        Ok(response)
    }
}

impl Assistant<LoggingSummarizer<Gemini>> {
    /// Wire an assistant from configuration: a cached PostgreSQL source and
    /// the logged Gemini provider
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let builder = ContextBuilder::new()
            .with_limits(config.reporting.limits)
            .with_currency(config.reporting.currency.clone());
        Ok(Self::new(Arc::new(config.source()), config.summarizer()?)
            .with_model(config.provider.model.clone())
            .with_web_search(config.provider.web_search)
            .with_context_builder(builder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use salescope_core::{Error, LineItem, Role, Sale, SaleStatus, Source};
    use salescope_store::MemorySource;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedSummarizer {
        requests: Mutex<Vec<Request>>,
        fail: bool,
    }

    #[async_trait]
    impl Summarizer for ScriptedSummarizer {
        async fn request(&self, request: Request) -> Result<Response> {
            let turn = request.messages.len();
            self.requests.lock().unwrap().push(request);
            if self.fail {
                return Err(Error::Provider {
                    provider: "gemini".into(),
                    message: "HTTP 500".into(),
                    status: Some(500),
                });
            }
            let mut response = Response::text(format!("answer {}", turn));
            response.sources.push(Source {
                title: "Market report".into(),
                uri: "https://example.com/report".into(),
            });
            Ok(response)
        }
    }

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn source() -> Arc<dyn RecordSource> {
        let cancelled = SaleStatus::Other("CANCELLED".into());
        Arc::new(MemorySource::from_records(
            vec![
                Sale::new(1, 1, at(2), 100.0).with_customer(10),
                Sale::new(2, 1, at(3), 50.0).with_status(cancelled.clone()),
                Sale::new(3, 2, at(5), 30.0),
            ],
            vec![
                LineItem::new(1, 7, "Burger", 2, 100.0, at(2)),
                LineItem::new(2, 8, "Soda", 9, 50.0, at(3)).with_status(cancelled),
            ],
        ))
    }

    fn period() -> AnalysisPeriod {
        AnalysisPeriod::new(at(1).date(), at(31).date()).unwrap()
    }

    #[tokio::test]
    async fn test_default_period_spans_completed_sales() {
        let assistant = Assistant::new(source(), ScriptedSummarizer::default());
        let period = assistant.default_period().await.unwrap().unwrap();
        assert_eq!(period.start(), at(2).date());
        assert_eq!(period.end(), at(5).date());
    }

    #[tokio::test]
    async fn test_context_ignores_cancelled_records() {
        let assistant = Assistant::new(source(), ScriptedSummarizer::default());
        let context = assistant.context(&period()).await.unwrap();

        assert_eq!(context.general_kpis.total_orders, 2);
        assert_eq!(context.general_kpis.total_revenue, 130.0);
        assert_eq!(context.products.top_by_quantity.len(), 1);
        assert_eq!(context.products.top_by_quantity[0].product_name, "Burger");
    }

    #[tokio::test]
    async fn test_ask_sends_history_and_context() {
        let mut assistant = Assistant::new(source(), ScriptedSummarizer::default())
            .with_model("gemini-2.5-pro")
            .with_web_search(false);

        let first = assistant.ask("How did January go?", &period()).await.unwrap();
        assert_eq!(first.content, "answer 1");
        let second = assistant.ask("And the best store?", &period()).await.unwrap();
        assert_eq!(second.content, "answer 3");

        let requests = assistant.summarizer.requests.lock().unwrap();
        let last = &requests[1];
        let roles: Vec<Role> = last.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(last.model.0, "gemini-2.5-pro");
        assert!(!last.web_search);

        let instruction = last.system_instruction.as_deref().unwrap();
        assert!(instruction.contains("\"total_orders\": 2"));

        // Answers are kept with their references
        let history = assistant.history();
        assert_eq!(history.len(), 4);
        assert!(history[1].content.contains("**References:**"));
        assert!(history[1]
            .content
            .contains("- [Market report](https://example.com/report)"));
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_history_untouched() {
        let summarizer = ScriptedSummarizer {
            fail: true,
            ..Default::default()
        };
        let mut assistant = Assistant::new(source(), summarizer);

        let err = assistant.ask("Anything?", &period()).await.unwrap_err();
        assert!(matches!(err, Error::Provider { status: Some(500), .. }));
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn test_reset_starts_new_conversation() {
        let mut assistant = Assistant::new(source(), ScriptedSummarizer::default());
        assistant.ask("Hi", &period()).await.unwrap();
        let id = assistant.conversation_id();

        assistant.reset();
        assert!(assistant.history().is_empty());
        assert_ne!(assistant.conversation_id(), id);
    }
}
