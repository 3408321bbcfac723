//! Parser for Thought / Action / Action Input / Final Answer completions.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";
pub const OBSERVATION_MARKER: &str = "Observation:";

/// What the model asked for in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    Action {
        tool: String,
        input: String,
        /// The raw step text up to the end of the action input.
        log: String,
    },
    Finish {
        answer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing 'Action:' after 'Thought:'")]
    MissingAction,

    #[error("Missing 'Action Input:' after 'Action:'")]
    MissingActionInput,

    #[error("Parsing LLM output produced both a final answer and a parse-able action: {0}")]
    Ambiguous(String),
}

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .unwrap_or_else(|e| panic!("invalid action regex: {e}"))
    })
}

fn action_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)")
            .unwrap_or_else(|e| panic!("invalid action regex: {e}"))
    })
}

/// Drop anything the model invented after an `Observation:` marker.
fn strip_hallucinated_observation(text: &str) -> &str {
    match text.find(OBSERVATION_MARKER) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

fn clean_input(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

/// Parse one model completion into an [`AgentStep`].
pub fn parse_step(text: &str) -> Result<AgentStep, ParseError> {
    let text = strip_hallucinated_observation(text);
    let has_final = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_regex().captures(text) {
        if has_final {
            return Err(ParseError::Ambiguous(text.trim().to_string()));
        }

        let tool = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let input = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        if tool.is_empty() {
            return Err(ParseError::MissingAction);
        }

        return Ok(AgentStep::Action {
            tool: tool.trim_matches('`').to_string(),
            input: clean_input(input),
            log: text.trim_end().to_string(),
        });
    }

    if let Some(idx) = text.find(FINAL_ANSWER_MARKER) {
        let answer = text[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string();
        return Ok(AgentStep::Finish { answer });
    }

    if action_only_regex().is_match(text) {
        return Err(ParseError::MissingActionInput);
    }

    Err(ParseError::MissingAction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_and_input() {
        let step = parse_step(
            "I should look at stock.\nAction: inventory_sql_read\nAction Input: \"SELECT * FROM stock\"\n",
        )
        .unwrap();

        match step {
            AgentStep::Action { tool, input, .. } => {
                assert_eq!(tool, "inventory_sql_read");
                assert_eq!(input, "SELECT * FROM stock");
            }
            other => panic!("unexpected step: {other:?}"),
        }
    }

    #[test]
    fn parses_final_answer() {
        let step = parse_step("I now know the final answer\nFinal Answer: 42 units left.").unwrap();
        assert_eq!(
            step,
            AgentStep::Finish {
                answer: "42 units left.".to_string()
            }
        );
    }

    #[test]
    fn discards_text_after_observation_marker() {
        let step = parse_step(
            "Action: sales_sql_read\nAction Input: SELECT 1\nObservation: made up\nFinal Answer: nope",
        )
        .unwrap();
        assert!(matches!(step, AgentStep::Action { ref input, .. } if input == "SELECT 1"));
    }

    #[test]
    fn reports_format_errors() {
        assert_eq!(parse_step("just musing"), Err(ParseError::MissingAction));
        assert_eq!(
            parse_step("Action: sales_sql_read"),
            Err(ParseError::MissingActionInput)
        );
        assert!(matches!(
            parse_step("Action: a\nAction Input: b\nFinal Answer: c"),
            Err(ParseError::Ambiguous(_))
        ));
    }
}
