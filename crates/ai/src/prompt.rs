//! Prompt assembly for the reasoning loop and the classifier.

use crate::registry::ToolRegistry;

const REACT_FORMAT: &str = "Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question";

/// Build the full ReAct prompt for one loop iteration.
pub fn render_react_prompt(
    persona: &str,
    tools: &ToolRegistry,
    history: &str,
    question: &str,
    scratchpad: &str,
) -> String {
    let tool_names = tools.names().join(", ");
    let format = REACT_FORMAT.replace("{tool_names}", &tool_names);

    let mut prompt = String::with_capacity(persona.len() + scratchpad.len() + 1024);
    prompt.push_str(persona.trim());
    prompt.push_str("\n\nYou have access to the following tools:\n\n");
    prompt.push_str(&tools.render_descriptions());
    prompt.push_str("\n\n");
    prompt.push_str(&format);
    prompt.push_str("\n\n");

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        prompt.push_str(history);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Begin!\n\nQuestion: ");
    prompt.push_str(question);
    prompt.push_str("\nThought: ");
    prompt.push_str(scratchpad);
    prompt
}

/// Prompt asking the model for exactly one domain token.
pub fn render_classification_prompt(request: &str) -> String {
    format!(
        "Classify the following ERP user request into one domain:\n\
         - sales\n\
         - finance\n\
         - inventory\n\
         - analytics\n\n\
         Request: \"{request}\"\n\n\
         Answer with only one domain."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn react_prompt_contains_question_history_and_scratchpad() {
        let prompt = render_react_prompt(
            "You are a sales agent.",
            &ToolRegistry::new(),
            "Human: hi\nAI: hello",
            "How many leads?",
            "Action: x\nAction Input: y\nObservation: z\nThought: ",
        );

        assert!(prompt.starts_with("You are a sales agent."));
        assert!(prompt.contains("Previous conversation:\nHuman: hi\nAI: hello"));
        assert!(prompt.contains("Question: How many leads?\nThought: Action: x"));
        assert!(prompt.ends_with("Thought: "));
    }

    #[test]
    fn classification_prompt_lists_domains() {
        let prompt = render_classification_prompt("show invoices");
        for d in ["sales", "finance", "inventory", "analytics"] {
            assert!(prompt.contains(&format!("- {d}")));
        }
        assert!(prompt.contains("Request: \"show invoices\""));
    }
}
