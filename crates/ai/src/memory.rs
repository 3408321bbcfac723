//! Bounded conversation buffer.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

pub const DEFAULT_MEMORY_TURNS: usize = 5;

/// One completed request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub input: String,
    pub output: String,
}

/// Keeps the last `capacity` turns; older turns are evicted first.
#[derive(Debug)]
pub struct ConversationMemory {
    capacity: usize,
    turns: Mutex<VecDeque<Turn>>,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_TURNS)
    }
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn record(&self, input: impl Into<String>, output: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }

        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        while turns.len() >= self.capacity {
            turns.pop_front();
        }
        turns.push_back(Turn {
            input: input.into(),
            output: output.into(),
        });
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// `Human:` / `AI:` transcript, oldest first. Empty when nothing is stored.
    pub fn render(&self) -> String {
        self.turns()
            .iter()
            .map(|t| format!("Human: {}\nAI: {}", t.input, t.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_turns() {
        let memory = ConversationMemory::default();
        for i in 0..8 {
            memory.record(format!("q{i}"), format!("a{i}"));
        }

        let turns = memory.turns();
        assert_eq!(turns.len(), DEFAULT_MEMORY_TURNS);
        assert_eq!(turns.first().unwrap().input, "q3");
        assert_eq!(turns.last().unwrap().output, "a7");
    }

    #[test]
    fn renders_transcript() {
        let memory = ConversationMemory::new(2);
        assert_eq!(memory.render(), "");
        memory.record("hi", "hello");
        assert_eq!(memory.render(), "Human: hi\nAI: hello");
    }
}
