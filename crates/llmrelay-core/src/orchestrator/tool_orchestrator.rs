//! Multi-turn tool calling over a plain completion endpoint

use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

use super::options::OrchestratorOptions;
use crate::client::{reply_text, ChatService, LlmError, LlmResult, RotatingClient};
use crate::logging::Logger;
use crate::tools::{self, Invocation, Tool, ToolError, ToolRegistry, ToolResult};
use crate::types::{ChatCompletion, ChatCompletionRequest, ChatMessage};

/// Appended to the tool result of the last permitted turn
pub const TOOL_LIMIT_NOTICE: &str = "\n已经达到最大工具次数";

fn named_result(tool: &str, result: impl Display) -> String {
    format!("工具{}调用结果: {}", tool, result)
}

fn generic_result(result: impl Display) -> String {
    format!("工具调用结果: {}", result)
}

/// Drives a conversation through at most `max_tool_calls` tool turns
///
/// Each turn sends the whole conversation, runs at most one tool call found
/// in the reply, and appends the call and its result. Failed calls are fed
/// back to the model as results instead of ending the conversation. The
/// first reply without a call is the final answer.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use llmrelay_core::client::RotatingClient;
/// use llmrelay_core::config::LlmConfig;
/// use llmrelay_core::logging::{Logger, NoOpLogger};
/// use llmrelay_core::orchestrator::{OrchestratorOptions, ToolOrchestrator};
/// use llmrelay_core::tools::{Tool, ToolRegistry};
/// use llmrelay_core::transport::create_transport;
/// use llmrelay_core::types::{ChatMessage, ToolArg, ToolValue};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
/// let config = LlmConfig::new("https://api.openai.com/v1", vec!["sk-...".into()], "gpt-4o-mini")?;
/// let transport = create_transport(config.base_url(), logger.clone());
/// let client = Arc::new(RotatingClient::new(config, 3, transport, logger.clone())?);
///
/// let registry = Arc::new(ToolRegistry::new(logger.clone()));
/// registry.add_tool(
///     Tool::new("get_weather", "Get current weather for a location", |args| async move {
///         args.require_str("location")
///             .map(|location| ToolValue::Text(format!("Weather in {}: Sunny, 25°C", location)))
///     })
///     .with_param(ToolArg::string("location")),
/// )?;
///
/// let orchestrator = ToolOrchestrator::new(
///     client,
///     registry,
///     vec!["get_weather".to_string()],
///     OrchestratorOptions::default(),
///     logger,
/// )?;
/// let answer = orchestrator
///     .simply_chat(vec![ChatMessage::user("北京天气怎么样?")], None)
///     .await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
pub struct ToolOrchestrator {
    client: Arc<RotatingClient>,
    registry: Arc<ToolRegistry>,
    tools: Vec<String>,
    tool_doc: String,
    options: OrchestratorOptions,
    logger: Arc<dyn Logger>,
}

impl ToolOrchestrator {
    /// Create an orchestrator for the enabled `tools`
    ///
    /// Fails when `tools` is empty, names a tool missing from `registry`,
    /// or `options` does not validate. The documentation block is rendered
    /// once here.
    pub fn new(
        client: Arc<RotatingClient>,
        registry: Arc<ToolRegistry>,
        tools: Vec<String>,
        options: OrchestratorOptions,
        logger: Arc<dyn Logger>,
    ) -> LlmResult<Self> {
        options.validate()?;
        if tools.is_empty() {
            return Err(LlmError::InvalidConfig(
                "at least one tool must be enabled".to_string(),
            ));
        }
        let tool_doc = registry.tool_doc(tools.as_slice())?;

        logger.info(&format!(
            "[ToolOrchestrator] Enabled tools: {} (max {} calls, {:?} chain)",
            tools.join(", "),
            options.max_tool_calls,
            options.chain_format
        ));

        Ok(Self {
            client,
            registry,
            tools,
            tool_doc,
            options,
            logger,
        })
    }

    /// Documentation block appended to the system message
    pub fn tool_doc(&self) -> &str {
        &self.tool_doc
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn client(&self) -> &Arc<RotatingClient> {
        &self.client
    }

    /// Run the tool loop for `request`
    ///
    /// Returns an empty placeholder response if every permitted turn made a
    /// tool call.
    pub async fn complete(&self, mut request: ChatCompletionRequest) -> LlmResult<ChatCompletion> {
        if request.messages.is_empty() {
            return Err(LlmError::EmptyMessages);
        }
        self.inject_doc(&mut request.messages);

        let max_turns = self.options.max_tool_calls;
        let mut chain: Vec<ChatMessage> = Vec::new();
        let mut tool_tokens = 0u64;

        for turn in 1..=max_turns {
            let response = self.client.send(request.clone()).await?;
            let text = reply_text(&response)?;

            let parsed = match tools::parse(&text, self.registry.marker()) {
                Ok(None) => {
                    self.logger.debug(&format!(
                        "[ToolOrchestrator] Final answer after {} tool turn(s)",
                        turn - 1
                    ));
                    return Ok(self.finalize(response, &chain, tool_tokens));
                }
                Ok(Some(invocation)) => Ok(invocation),
                Err(err) => Err(ToolError::from(err)),
            };
            let result = self.tool_turn(parsed, turn == max_turns).await;

            let call = ChatMessage::assistant(text);
            let result = ChatMessage::user(result);
            request.messages.push(call.clone());
            request.messages.push(result.clone());
            chain.push(call);
            chain.push(result);

            tool_tokens += response.completion_tokens();

            if turn < max_turns && self.options.delay_ms > 0 {
                tokio::time::sleep(self.options.delay()).await;
            }
        }

        self.logger.warn(&format!(
            "[ToolOrchestrator] Tool call limit ({}) reached without a final answer",
            max_turns
        ));
        Ok(ChatCompletion::placeholder())
    }

    /// Send `messages` with the client's model and sampling values
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        seed: Option<i64>,
    ) -> LlmResult<ChatCompletion> {
        let mut request = self.client.chat_config().to_request(messages);
        request.seed = seed;
        self.complete(request).await
    }

    /// Like `chat`, but returns only the final text
    ///
    /// Every failure is wrapped in [`LlmError::CallFailed`].
    pub async fn simply_chat(&self, messages: Vec<ChatMessage>, seed: Option<i64>) -> LlmResult<String> {
        self.chat(messages, seed)
            .await
            .and_then(|response| reply_text(&response))
            .map_err(LlmError::call_failed)
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn api_usage(&self) -> u64 {
        self.client.api_usage()
    }

    pub fn failed_api_calls(&self) -> u64 {
        self.client.failed_api_calls()
    }

    fn inject_doc(&self, messages: &mut Vec<ChatMessage>) {
        if !messages.first().map_or(false, ChatMessage::is_system) {
            messages.insert(0, ChatMessage::system(""));
        }
        if let Some(system) = messages.first_mut() {
            system.content.push_str(&self.tool_doc);
        }
    }

    /// Only enabled tools may be called
    fn resolve(&self, name: &str) -> ToolResult<Arc<Tool>> {
        if !self.tools.iter().any(|t| t == name) {
            return Err(if self.registry.has_tool(name) {
                ToolError::NotEnabled(name.to_string())
            } else {
                ToolError::UnknownTool(name.to_string())
            });
        }
        self.registry.get_tool(name)
    }

    /// Result message text for one parsed call, with the limit notice on
    /// the last permitted turn
    async fn tool_turn(&self, parsed: ToolResult<Invocation>, last: bool) -> String {
        let mut result = self.run_call(parsed).await;
        if last {
            result.push_str(TOOL_LIMIT_NOTICE);
        }
        result
    }

    /// Run one parsed call and render the result message text
    async fn run_call(&self, parsed: ToolResult<Invocation>) -> String {
        let invocation = match parsed {
            Ok(invocation) => invocation,
            Err(err) => {
                self.logger
                    .debug(&format!("[ToolOrchestrator] Unparseable call: {}", err));
                return generic_result(err);
            }
        };

        let tool = match self.resolve(&invocation.tool_name) {
            Ok(tool) => tool,
            Err(err) => {
                self.logger
                    .debug(&format!("[ToolOrchestrator] Unresolved call: {}", err));
                return generic_result(err);
            }
        };

        self.logger.debug(&format!(
            "[ToolOrchestrator] Calling {} with {:?}",
            tool.name(),
            invocation.raw_args
        ));
        let outcome = match tools::coerce(&invocation, &tool) {
            Ok(values) => tools::execute(&tool, values).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => named_result(tool.name(), value),
            Err(err) => {
                self.logger.debug(&format!(
                    "[ToolOrchestrator] Call to {} failed: {}",
                    tool.name(),
                    err
                ));
                named_result(tool.name(), err)
            }
        }
    }

    fn finalize(
        &self,
        mut response: ChatCompletion,
        chain: &[ChatMessage],
        tool_tokens: u64,
    ) -> ChatCompletion {
        if !chain.is_empty() {
            let format = self.options.chain_format;
            if let Some(content) = response.first_content_mut() {
                *content = format.render(chain, content.as_str());
            }
        }
        if let Some(usage) = response.usage.as_mut() {
            usage.completion_tokens += tool_tokens;
            usage.total_tokens += tool_tokens;
        }
        response
    }
}

#[async_trait]
impl ChatService for ToolOrchestrator {
    async fn complete(&self, request: ChatCompletionRequest) -> LlmResult<ChatCompletion> {
        ToolOrchestrator::complete(self, request).await
    }

    fn model_name(&self) -> &str {
        ToolOrchestrator::model_name(self)
    }

    fn api_usage(&self) -> u64 {
        ToolOrchestrator::api_usage(self)
    }

    fn failed_api_calls(&self) -> u64 {
        ToolOrchestrator::failed_api_calls(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::logging::{Level, MemoryLogger, NoOpLogger};
    use crate::orchestrator::ChainFormat;
    use crate::transport::{MockReply, MockTransport, Transport};
    use crate::types::{Domain, ToolArg, ToolValue, Usage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn registry(executions: Arc<AtomicUsize>) -> Arc<ToolRegistry> {
        let registry = ToolRegistry::new(logger());
        registry
            .add_tool(
                Tool::new("get_weather", "Get current weather for a location", move |args| {
                    let executions = Arc::clone(&executions);
                    async move {
                        executions.fetch_add(1, Ordering::SeqCst);
                        args.require_str("location").map(|location| {
                            ToolValue::Text(format!("Weather in {}: Sunny, 25°C", location))
                        })
                    }
                })
                .with_param(ToolArg::string("location").with_description("City name")),
            )
            .unwrap();
        registry
            .add_tool(
                Tool::new_sync("square", "Square a small number", |args| {
                    let x = args.require_f64("x")?;
                    Ok(ToolValue::Float(x * x))
                })
                .with_param(ToolArg::float("x").with_domain(Domain::new(0.0, 10.0))),
            )
            .unwrap();
        registry
            .add_tool(Tool::new_sync("fail", "Always fails", |_| {
                Err(ToolError::execution("backend offline"))
            }))
            .unwrap();
        registry
            .add_tool(Tool::new_sync("hidden", "Not enabled", |_| Ok(ToolValue::Int(1))))
            .unwrap();
        Arc::new(registry)
    }

    struct Harness {
        mock: Arc<MockTransport>,
        orchestrator: ToolOrchestrator,
        executions: Arc<AtomicUsize>,
    }

    fn harness(replies: Vec<MockReply>, options: OrchestratorOptions) -> Harness {
        harness_with_logger(replies, options, logger())
    }

    fn harness_with_logger(
        replies: Vec<MockReply>,
        options: OrchestratorOptions,
        orchestrator_logger: Arc<dyn Logger>,
    ) -> Harness {
        let mock = Arc::new(MockTransport::scripted(replies, logger()));
        let transport: Arc<dyn Transport> = mock.clone();
        let config = LlmConfig::new("mock://", vec!["k1".into(), "k2".into()], "mock-model").unwrap();
        let client = Arc::new(RotatingClient::new(config, 0, transport, logger()).unwrap());
        let executions = Arc::new(AtomicUsize::new(0));
        let tools = ["get_weather", "square", "fail"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let orchestrator = ToolOrchestrator::new(
            client,
            registry(Arc::clone(&executions)),
            tools,
            options.with_delay_ms(0),
            orchestrator_logger,
        )
        .unwrap();
        Harness {
            mock,
            orchestrator,
            executions,
        }
    }

    fn ask() -> Vec<ChatMessage> {
        vec![ChatMessage::user("北京天气怎么样?")]
    }

    #[tokio::test]
    async fn test_single_tool_turn_xml() {
        let h = harness(
            vec![
                MockReply::text("※get_weather(\"Beijing\")"),
                MockReply::text("It is sunny in Beijing."),
            ],
            OrchestratorOptions::default(),
        );

        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert_eq!(h.executions.load(Ordering::SeqCst), 1);

        let content = response.first_content().unwrap();
        assert_eq!(
            content,
            "<tool>\n※get_weather(\"Beijing\")\n工具get_weather调用结果: Weather in Beijing: Sunny, 25°C\n</tool>\nIt is sunny in Beijing."
        );

        let calls = h.mock.calls();
        assert_eq!(calls.len(), 2);
        // system + user on the first turn, plus one call/result pair on the second
        assert_eq!(calls[0].messages.len(), 2);
        assert_eq!(calls[1].messages.len(), calls[0].messages.len() + 2);
        assert_eq!(calls[1].messages[2], ChatMessage::assistant("※get_weather(\"Beijing\")"));
        assert_eq!(
            calls[1].messages[3],
            ChatMessage::user("工具get_weather调用结果: Weather in Beijing: Sunny, 25°C")
        );
    }

    #[tokio::test]
    async fn test_doc_injected_into_system_message() {
        let h = harness(vec![MockReply::text("hi")], OrchestratorOptions::default());
        let messages = vec![ChatMessage::system("You are helpful."), ChatMessage::user("hi")];
        h.orchestrator.chat(messages, None).await.unwrap();

        let sent = &h.mock.calls()[0].messages;
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].content,
            format!("You are helpful.{}", h.orchestrator.tool_doc())
        );
        assert!(sent[0].content.contains("※get_weather(location):"));
        assert!(!sent[0].content.contains("※hidden"));

        let h = harness(vec![MockReply::text("hi")], OrchestratorOptions::default());
        h.orchestrator.chat(ask(), None).await.unwrap();
        let sent = &h.mock.calls()[0].messages;
        assert!(sent[0].is_system());
        assert_eq!(sent[0].content, h.orchestrator.tool_doc());
    }

    #[tokio::test]
    async fn test_plain_answer_is_untouched() {
        let h = harness(vec![MockReply::text("Just text.")], OrchestratorOptions::default());
        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert_eq!(response.first_content(), Some("Just text."));
        assert_eq!(response.completion_tokens(), 5);
        assert_eq!(h.executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cap_exhaustion_returns_placeholder() {
        let h = harness(
            vec![
                MockReply::text("※square(2)"),
                MockReply::text("※square(3)"),
                MockReply::text("never sent"),
            ],
            OrchestratorOptions::default().with_max_tool_calls(2),
        );

        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(response, ChatCompletion::placeholder());
        assert_eq!(h.mock.call_count(), 2);
        assert_eq!(h.orchestrator.api_usage(), 2);

        let second_request = &h.mock.calls()[1].messages;
        assert_eq!(second_request.last().unwrap().content, "工具square调用结果: 4");
    }

    #[tokio::test]
    async fn test_cap_notice_on_last_turn() {
        let h = harness(Vec::new(), OrchestratorOptions::default());
        let parse = |text: &str| tools::parse(text, '※').map(Option::unwrap).map_err(ToolError::from);

        let result = h.orchestrator.tool_turn(parse("※square(3)"), true).await;
        assert_eq!(result, "工具square调用结果: 9\n已经达到最大工具次数");

        let result = h.orchestrator.tool_turn(parse("※square(3)"), false).await;
        assert_eq!(result, "工具square调用结果: 9");

        let result = h.orchestrator.tool_turn(parse("※nope"), true).await;
        assert_eq!(result, "工具调用结果: tool nope does not exist\n已经达到最大工具次数");
    }

    #[tokio::test]
    async fn test_single_permitted_turn() {
        let h = harness(
            vec![MockReply::text("※square(3)"), MockReply::text("Nine.")],
            OrchestratorOptions::default()
                .with_max_tool_calls(1)
                .with_chain_format(ChainFormat::Markdown),
        );
        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(h.mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_fed_back() {
        let h = harness(
            vec![
                MockReply::text("※get_weather(\"Beijing\")※square(1)"),
                MockReply::text("※nope(1)"),
                MockReply::text("※hidden"),
                MockReply::text("※square(11)"),
                MockReply::text("※square(\"x\")"),
                MockReply::text("※fail"),
                MockReply::text("※get_weather(\"Beijing\""),
                MockReply::text("Giving up."),
            ],
            OrchestratorOptions::default().with_chain_format(ChainFormat::Remove),
        );

        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert_eq!(response.first_content(), Some("Giving up."));

        let sent = &h.mock.calls()[7].messages;
        let results: Vec<&str> = sent
            .iter()
            .skip(2)
            .filter(|m| m.role == crate::types::MessageRole::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            results,
            vec![
                "工具调用结果: multiple calls in one reply (2); only one tool call is allowed per reply",
                "工具调用结果: tool nope does not exist",
                "工具调用结果: tool hidden is not enabled for this conversation",
                "工具square调用结果: Argument 1 of tool \"square\" must be in closed interval [0, 10], but got 11",
                "工具square调用结果: Argument 1 of tool \"square\" must be of type \"float\", but \"x\" is not a float",
                "工具fail调用结果: backend offline",
                "工具调用结果: Malformed argument list for tool \"get_weather\": missing closing parenthesis",
            ]
        );
    }

    #[tokio::test]
    async fn test_recovered_failures_logged_at_debug() {
        let memory = Arc::new(MemoryLogger::new());
        let h = harness_with_logger(
            vec![MockReply::text("※fail"), MockReply::text("※fail")],
            OrchestratorOptions::default().with_max_tool_calls(2),
            memory.clone(),
        );
        h.orchestrator.chat(ask(), None).await.unwrap();

        assert!(memory.contains(Level::Debug, "Call to fail failed: backend offline"));
        assert!(!memory.contains(Level::Warn, "backend offline"));
        assert!(!memory.contains(Level::Error, "backend offline"));
        assert!(memory.contains(Level::Warn, "Tool call limit (2) reached"));
    }

    #[tokio::test]
    async fn test_missing_content_is_fatal() {
        let h = harness(
            vec![MockReply::text("※square(1)"), MockReply::Empty],
            OrchestratorOptions::default(),
        );
        let err = h.orchestrator.chat(ask(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingContent));
        assert_eq!(h.mock.call_count(), 2);

        let h = harness(vec![MockReply::Empty], OrchestratorOptions::default());
        let err = h.orchestrator.simply_chat(ask(), None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "LLM call failed: response content does not exist"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let h = harness(
            vec![MockReply::text("※square(1)"), MockReply::error("quota")],
            OrchestratorOptions::default(),
        );
        let err = h.orchestrator.chat(ask(), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Mock error: quota");
        assert_eq!(h.orchestrator.failed_api_calls(), 1);
    }

    #[tokio::test]
    async fn test_markdown_chain_and_usage() {
        let h = harness(
            vec![
                MockReply::text("※square(2)"),
                MockReply::text("※square(3)"),
                MockReply::text("4 and 9."),
            ],
            OrchestratorOptions::default().with_chain_format(ChainFormat::Markdown),
        );

        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert_eq!(
            response.first_content(),
            Some("```tool\n※square(2)\n工具square调用结果: 4\n※square(3)\n工具square调用结果: 9\n```\n4 and 9.")
        );

        // Two tool turns at 5 completion tokens each are added to the final turn's usage
        let usage = response.usage.unwrap();
        assert_eq!(usage.completion_tokens, 15);
        assert_eq!(usage.total_tokens, 25);
        assert_eq!(usage.prompt_tokens, 10);
    }

    #[tokio::test]
    async fn test_usage_left_absent() {
        let mut bare = ChatCompletion::from_text("m", "done");
        bare.usage = None;
        let h = harness(
            vec![MockReply::text("※square(2)"), MockReply::Completion(bare)],
            OrchestratorOptions::default(),
        );
        let response = h.orchestrator.chat(ask(), None).await.unwrap();
        assert_eq!(response.usage, None::<Usage>);
        assert!(response.first_content().unwrap().starts_with("<tool>\n"));
    }

    #[tokio::test]
    async fn test_service_trait_delegates() {
        let h = harness(vec![MockReply::text("hi")], OrchestratorOptions::default());
        let service: &dyn ChatService = &h.orchestrator;
        let response = service
            .complete(ChatCompletionRequest::new("mock-model", ask()))
            .await
            .unwrap();
        assert_eq!(response.first_content(), Some("hi"));
        assert_eq!(service.model_name(), "mock-model");
        assert_eq!(service.api_usage(), 1);
        assert_eq!(service.failed_api_calls(), 0);
    }

    #[test]
    fn test_construction_failures() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::echo(logger()));
        let config = LlmConfig::new("mock://", vec!["k".into()], "m").unwrap();
        let client = Arc::new(RotatingClient::new(config, 0, transport, logger()).unwrap());
        let registry = registry(Arc::new(AtomicUsize::new(0)));

        let build = |tools: Vec<&str>, options: OrchestratorOptions| {
            ToolOrchestrator::new(
                Arc::clone(&client),
                Arc::clone(&registry),
                tools.into_iter().map(String::from).collect(),
                options,
                logger(),
            )
        };

        assert!(matches!(
            build(vec![], OrchestratorOptions::default()),
            Err(LlmError::InvalidConfig(_))
        ));
        assert!(matches!(
            build(vec!["missing"], OrchestratorOptions::default()),
            Err(LlmError::Tool(ToolError::UnknownTool(_)))
        ));
        assert!(matches!(
            build(vec!["square"], OrchestratorOptions::default().with_max_tool_calls(0)),
            Err(LlmError::InvalidConfig(_))
        ));
        assert!(build(vec!["square"], OrchestratorOptions::default()).is_ok());
    }

    #[tokio::test]
    async fn test_empty_messages_rejected() {
        let h = harness(vec![MockReply::text("hi")], OrchestratorOptions::default());
        let err = h.orchestrator.chat(Vec::new(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyMessages));
        assert_eq!(h.mock.call_count(), 0);
    }
}
