//! Bounded ReAct reasoning loop bound to one domain's tools.
//!
//! Each iteration renders the prompt, asks the model for the next step and
//! either finishes or runs a tool and appends its observation to the
//! scratchpad. Malformed steps and unknown tools become observations so the
//! model can correct itself; only transport failures abort the loop.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use helios_core::Domain;

use crate::llm::LanguageModel;
use crate::memory::ConversationMemory;
use crate::prompt::render_react_prompt;
use crate::react::{AgentStep, parse_step};
use crate::registry::ToolRegistry;
use crate::result::AiError;

pub const DEFAULT_MAX_ITERATIONS: usize = 15;
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit.";

const STOP_SEQUENCES: &[&str] = &["\nObservation:"];

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("language model failed: {0}")]
    Llm(#[from] AiError),
}

/// One executed tool call, kept for logging and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTraceStep {
    pub tool: String,
    pub input: String,
    pub observation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOutput {
    pub output: String,
    pub steps: Vec<AgentTraceStep>,
    /// True when the iteration cap produced the answer.
    pub stopped_early: bool,
}

pub struct DomainAgent {
    domain: Domain,
    persona: String,
    llm: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    memory: ConversationMemory,
    max_iterations: usize,
}

impl std::fmt::Debug for DomainAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainAgent")
            .field("domain", &self.domain)
            .field("model", &self.llm.model_name())
            .field("tools", &self.tools.names())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

impl DomainAgent {
    pub fn new(
        domain: Domain,
        persona: impl Into<String>,
        llm: Arc<dyn LanguageModel>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            domain,
            persona: persona.into(),
            llm,
            tools,
            memory: ConversationMemory::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Run the loop for one request.
    pub async fn invoke(&self, request: &str) -> Result<AgentOutput, AgentError> {
        let history = self.memory.render();
        let mut scratchpad = String::new();
        let mut steps = Vec::new();

        for iteration in 0..self.max_iterations {
            let prompt =
                render_react_prompt(&self.persona, &self.tools, &history, request, &scratchpad);
            let completion = self.llm.complete(&prompt, STOP_SEQUENCES).await?;

            debug!(domain = %self.domain, iteration, "agent step");

            let (log, observation) = match parse_step(&completion) {
                Ok(AgentStep::Finish { answer }) => {
                    info!(domain = %self.domain, iterations = iteration + 1, "agent finished");
                    self.memory.record(request, answer.clone());
                    return Ok(AgentOutput {
                        output: answer,
                        steps,
                        stopped_early: false,
                    });
                }
                Ok(AgentStep::Action { tool, input, log }) => {
                    let observation = match self.tools.get(&tool) {
                        Some(descriptor) => {
                            let outcome = descriptor.tool.invoke(&input).await;
                            if !outcome.is_ok() {
                                warn!(domain = %self.domain, tool = %tool, "tool returned an error");
                            }
                            outcome.observation()
                        }
                        None => format!(
                            "{tool} is not a valid tool, try one of [{}].",
                            self.tools.names().join(", ")
                        ),
                    };
                    steps.push(AgentTraceStep {
                        tool,
                        input,
                        observation: observation.clone(),
                    });
                    (log, observation)
                }
                Err(err) => {
                    warn!(domain = %self.domain, error = %err, "unparseable agent step");
                    (completion.trim_end().to_string(), format!("Invalid Format: {err}"))
                }
            };

            scratchpad.push_str(&log);
            scratchpad.push_str("\nObservation: ");
            scratchpad.push_str(&observation);
            scratchpad.push_str("\nThought: ");
        }

        warn!(domain = %self.domain, max = self.max_iterations, "agent hit iteration limit");
        Ok(AgentOutput {
            output: ITERATION_LIMIT_ANSWER.to_string(),
            steps,
            stopped_early: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::llm::{ScriptedLanguageModel, StaticLanguageModel};
    use crate::tool::{Tool, ToolOutcome};

    struct Counter;

    #[async_trait]
    impl Tool for Counter {
        fn name(&self) -> &str {
            "count_rows"
        }

        fn description(&self) -> &str {
            "counts rows"
        }

        async fn invoke(&self, input: &str) -> ToolOutcome {
            ToolOutcome::ok(json!({ "table": input, "count": 3 }))
        }
    }

    fn registry() -> ToolRegistry {
        let mut r = ToolRegistry::new();
        r.register(Arc::new(Counter)).unwrap();
        r
    }

    #[tokio::test]
    async fn runs_tool_then_finishes_and_remembers() {
        let llm = Arc::new(ScriptedLanguageModel::new([
            "I need the count.\nAction: count_rows\nAction Input: leads",
            "I now know the final answer\nFinal Answer: There are 3 leads.",
        ]));
        let agent = DomainAgent::new(Domain::Sales, "You are a sales agent.", llm.clone(), registry());

        let out = agent.invoke("How many leads?").await.unwrap();

        assert_eq!(out.output, "There are 3 leads.");
        assert!(!out.stopped_early);
        assert_eq!(out.steps.len(), 1);
        assert_eq!(out.steps[0].input, "leads");

        let prompts = llm.prompts();
        assert!(prompts[1].contains(r#"Observation: {"ok":true,"value":{"count":3,"table":"leads"}}"#));
        assert_eq!(agent.memory().turns().len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_format_become_observations() {
        let llm = Arc::new(ScriptedLanguageModel::new([
            "Action: shred_files\nAction Input: all",
            "hmm",
            "Final Answer: done",
        ]));
        let agent = DomainAgent::new(Domain::Sales, "persona", llm.clone(), registry());

        let out = agent.invoke("q").await.unwrap();
        assert_eq!(out.output, "done");

        let prompts = llm.prompts();
        assert!(prompts[1].contains("shred_files is not a valid tool, try one of [count_rows]."));
        assert!(prompts[2].contains("Observation: Invalid Format: Missing 'Action:' after 'Thought:'"));
    }

    #[tokio::test]
    async fn stops_at_iteration_limit() {
        let llm = Arc::new(StaticLanguageModel::new("Action: count_rows\nAction Input: x"));
        let agent = DomainAgent::new(Domain::Inventory, "persona", llm, registry()).with_max_iterations(3);

        let out = agent.invoke("loop forever").await.unwrap();
        assert_eq!(out.output, ITERATION_LIMIT_ANSWER);
        assert!(out.stopped_early);
        assert_eq!(out.steps.len(), 3);
        assert!(agent.memory().turns().is_empty());
    }

    #[tokio::test]
    async fn llm_failure_is_an_error() {
        let llm = Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()).then_fail("timeout"));
        let agent = DomainAgent::new(Domain::Finance, "persona", llm, registry());

        assert!(matches!(agent.invoke("q").await, Err(AgentError::Llm(_))));
    }
}
