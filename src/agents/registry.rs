use super::kind::AgentKind;
use super::Agent;
use std::collections::HashMap;
use std::sync::Arc;

pub const PYTHON_MENTOR_PIPELINE: &str = "python_mentor";

const DEFAULT_PIPELINES: &[(&str, &[&str])] = &[
    ("system_design", &["architect", "storage", "reliability", "tradeoffs"]),
    ("algorithms", &["alg_taskmaster", "alg_complexity", "alg_testgen", "alg_optimizer"]),
    ("databases", &["db_modeler", "db_query_optimizer", "db_consistency", "db_replication"]),
    ("networking", &["net_protocols", "net_latency", "net_lb", "net_chaos"]),
    ("security", &["sec_threats", "sec_secure_code", "sec_crypto", "sec_compliance"]),
    ("backend", &["be_api", "be_perf", "be_reliability", "be_obs"]),
    (PYTHON_MENTOR_PIPELINE, &["teacher", "explainer", "coach", "reviewer", "motivator"]),
];

/// Agents by id plus the ordered pipeline of agent ids for each category.
/// Read-only once built; unknown categories resolve to an empty pipeline.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
    pipelines: HashMap<String, Vec<String>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `AgentKind` with the stock category pipelines.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in AgentKind::ALL {
            registry = registry.with_agent(Arc::new(kind));
        }
        for (category, ids) in DEFAULT_PIPELINES {
            registry = registry.with_pipeline(category, ids.iter().copied());
        }
        registry
    }

    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(agent.id().to_string(), agent);
        self
    }

    pub fn with_pipeline<I, S>(mut self, category: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pipelines
            .insert(category.to_string(), ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn agent(&self, id: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(id).cloned()
    }

    pub fn pipeline(&self, category: &str) -> &[String] {
        self.pipelines
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concrete agents for a category, in pipeline order. Ids without a registered
    /// agent are skipped.
    pub fn resolve(&self, category: &str) -> Vec<Arc<dyn Agent>> {
        let mut resolved = Vec::new();
        for id in self.pipeline(category) {
            match self.agent(id) {
                Some(agent) => resolved.push(agent),
                None => tracing::warn!(category, agent = %id, "skipping unknown agent in pipeline"),
            }
        }
        resolved
    }
}
