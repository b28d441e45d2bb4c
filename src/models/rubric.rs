#[derive(Debug, Clone, Copy)]
pub struct RubricItem {
    pub name: &'static str,
    pub description: &'static str,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Rubric {
    pub category: &'static str,
    pub items: &'static [RubricItem],
}

impl Rubric {
    pub fn total_weight(&self) -> u32 {
        self.items.iter().map(|i| i.weight).sum()
    }

    pub fn as_text(&self) -> String {
        let mut lines = vec!["Scoring rubric (weights total 100):".to_string()];
        for item in self.items {
            lines.push(format!("- {} ({}%): {}", item.name, item.weight, item.description));
        }
        lines.join("\n")
    }
}

const fn item(name: &'static str, description: &'static str, weight: u32) -> RubricItem {
    RubricItem {
        name,
        description,
        weight,
    }
}

pub static DEFAULT_RUBRICS: &[Rubric] = &[
    Rubric {
        category: "system_design",
        items: &[
            item("Architecture", "clarity and coherence of components and APIs", 35),
            item("Scalability/Reliability", "SLOs, degradation, caching, replication", 35),
            item("Trade-offs", "comparison of alternatives and explicit compromises", 20),
            item("Security", "authentication/authorization, secret management", 10),
        ],
    },
    Rubric {
        category: "algorithms",
        items: &[
            item("Correctness", "matches the problem statement, handles edge cases", 40),
            item("Complexity", "adequate asymptotics and choice of structures", 35),
            item("Explanation", "clear explanation of the approach", 25),
        ],
    },
    Rubric {
        category: "databases",
        items: &[
            item("Data model", "keys, indexes, normalization/denormalization", 35),
            item("Queries and plans", "query optimization, indexing", 35),
            item("Transactions/Replication", "isolation, conflicts, replicas/sharding", 30),
        ],
    },
    Rubric {
        category: "networking",
        items: &[
            item("Protocol/Transport", "choice and tuning", 30),
            item("Latency", "tuning, pools, pipelining", 35),
            item("Reliability", "LB, health checks, degradation", 35),
        ],
    },
    Rubric {
        category: "security",
        items: &[
            item("Threat modeling", "trust boundaries, STRIDE", 35),
            item("Secure code", "injections, XSS/CSRF, SSRF", 35),
            item("Crypto/PII", "algorithms, keys, compliance", 30),
        ],
    },
    Rubric {
        category: "backend",
        items: &[
            item("API design", "contracts, versions, errors", 30),
            item("Performance", "hot paths, caching", 35),
            item("Reliability/Observability", "retries, limits, metrics/traces", 35),
        ],
    },
];

pub fn rubric_for(category: &str) -> Option<&'static Rubric> {
    DEFAULT_RUBRICS.iter().find(|r| r.category == category)
}

/// Rubric text for prompts. Unknown categories yield an empty string.
pub fn build_rubric_text(category: &str) -> String {
    match rubric_for(category) {
        Some(rubric) => render_checked(rubric),
        None => {
            tracing::debug!(category, "no rubric defined for category");
            String::new()
        }
    }
}

fn render_checked(rubric: &Rubric) -> String {
    let total = rubric.total_weight();
    if total != 100 {
        tracing::warn!(category = rubric.category, total, "rubric weights do not total 100");
        return format!("{}\n(Warning: current weight total = {})", rubric.as_text(), total);
    }
    rubric.as_text()
}
