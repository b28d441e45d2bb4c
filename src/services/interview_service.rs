use crate::agents::registry::PYTHON_MENTOR_PIPELINE;
use crate::agents::{Agent, AgentMessage, AgentRegistry, InterviewContext};
use std::sync::Arc;

/// Runs one category's agents, in order, against a shared context.
pub struct InterviewOrchestrator {
    category: String,
    agents: Vec<Arc<dyn Agent>>,
}

impl InterviewOrchestrator {
    pub fn new(registry: &AgentRegistry, category: &str) -> Self {
        Self {
            category: category.to_string(),
            agents: registry.resolve(category),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agent_ids(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.id()).collect()
    }

    /// Each agent sees the messages of the agents before it in `ctx.history`.
    pub fn critique(&self, ctx: &mut InterviewContext) -> Vec<AgentMessage> {
        let mut outputs = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let msg = agent.act(ctx);
            ctx.history.push(msg.clone());
            outputs.push(msg);
        }
        outputs
    }
}

/// One `- sender: content` line per message, in order.
pub fn build_notes(messages: &[AgentMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("- {}: {}", m.sender, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A python-mentor round: lesson plan, worked example, task, review checklist and
/// encouragement. Personalised by level and topic, so never cached.
pub fn mentor_round(
    registry: &AgentRegistry,
    user_id: i64,
    level: &str,
    topic: &str,
) -> Vec<AgentMessage> {
    let orchestrator = InterviewOrchestrator::new(registry, PYTHON_MENTOR_PIPELINE);
    let mut ctx = InterviewContext::new(user_id, level, topic);
    orchestrator.critique(&mut ctx)
}
