use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::result::{AiError, AiResult};
use crate::tool::Tool;

/// A registered tool together with the metadata shown to the model.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub tool: Arc<dyn Tool>,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name-indexed set of tools, iterated in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> AiResult<()> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(AiError::InvalidInput("tool name is empty".to_string()));
        }
        if self.by_name.contains_key(&name) {
            return Err(AiError::InvalidInput(format!(
                "tool '{name}' is already registered"
            )));
        }

        let descriptor = ToolDescriptor {
            description: tool.description().to_string(),
            name: name.clone(),
            tool,
        };
        self.by_name.insert(name, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One `name: description` line per tool.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
