use crate::agents::{AgentRegistry, InterviewContext};
use crate::services::interview_service::{build_notes, InterviewOrchestrator};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_NOTES_TTL: Duration = Duration::from_secs(600);

/// Cache key. Excludes the user id: notes are shared by everyone asking about the same
/// category, level and topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotesKey {
    pub category: String,
    pub level: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
struct CachedNotes {
    stored_at: Instant,
    notes: String,
}

/// Memoizes expert notes per (category, level, topic) for a fixed TTL.
/// Concurrent misses for one key may both compute; the last write wins.
pub struct NotesCache {
    registry: Arc<AgentRegistry>,
    ttl: Duration,
    entries: DashMap<NotesKey, CachedNotes>,
    empty_pipelines: AtomicU64,
}

impl NotesCache {
    pub fn new(registry: Arc<AgentRegistry>, ttl: Duration) -> Self {
        Self {
            registry,
            ttl,
            entries: DashMap::new(),
            empty_pipelines: AtomicU64::new(0),
        }
    }

    pub fn prepare_notes(&self, category: &str, user_id: i64, level: &str, topic: &str) -> String {
        self.prepare_notes_at(category, user_id, level, topic, Instant::now())
    }

    pub fn prepare_notes_at(
        &self,
        category: &str,
        user_id: i64,
        level: &str,
        topic: &str,
        now: Instant,
    ) -> String {
        let key = NotesKey {
            category: category.to_string(),
            level: level.to_string(),
            topic: topic.to_string(),
        };

        if let Some(entry) = self.entries.get(&key) {
            if now.saturating_duration_since(entry.stored_at) < self.ttl {
                tracing::debug!(category, level, topic, "expert notes cache hit");
                return entry.notes.clone();
            }
        }

        let orchestrator = InterviewOrchestrator::new(&self.registry, category);
        if orchestrator.is_empty() {
            // Not cached, so a registry fix takes effect on the next request.
            let total = self.empty_pipelines.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::warn!(
                category,
                empty_pipeline_total = total,
                "category resolved to zero agents"
            );
            return String::new();
        }

        tracing::debug!(
            category = orchestrator.category(),
            agents = ?orchestrator.agent_ids(),
            level,
            topic,
            "computing expert notes"
        );
        let mut ctx = InterviewContext::new(user_id, level, topic);
        let outputs = orchestrator.critique(&mut ctx);
        let notes = build_notes(&outputs);
        self.entries.insert(
            key,
            CachedNotes {
                stored_at: now,
                notes: notes.clone(),
            },
        );
        notes
    }

    /// How many lookups hit a category with no resolvable agents.
    pub fn empty_pipeline_count(&self) -> u64 {
        self.empty_pipelines.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
