use super::context::{AgentMessage, InterviewContext};
use super::Agent;

/// Every built-in agent. Each variant produces one fixed piece of advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    // system design
    Architect,
    Storage,
    Reliability,
    Tradeoffs,
    // algorithms
    AlgTaskmaster,
    AlgComplexity,
    AlgTestGen,
    AlgOptimizer,
    // databases
    DbModeler,
    DbQueryOptimizer,
    DbConsistency,
    DbReplication,
    // networking
    NetProtocols,
    NetLatency,
    NetLoadBalancer,
    NetChaos,
    // security
    SecThreats,
    SecSecureCode,
    SecCrypto,
    SecCompliance,
    // backend
    BeApi,
    BePerf,
    BeReliability,
    BeObservability,
    // python mentor
    Teacher,
    Explainer,
    Coach,
    Reviewer,
    Motivator,
}

impl AgentKind {
    pub const ALL: [AgentKind; 29] = [
        AgentKind::Architect,
        AgentKind::Storage,
        AgentKind::Reliability,
        AgentKind::Tradeoffs,
        AgentKind::AlgTaskmaster,
        AgentKind::AlgComplexity,
        AgentKind::AlgTestGen,
        AgentKind::AlgOptimizer,
        AgentKind::DbModeler,
        AgentKind::DbQueryOptimizer,
        AgentKind::DbConsistency,
        AgentKind::DbReplication,
        AgentKind::NetProtocols,
        AgentKind::NetLatency,
        AgentKind::NetLoadBalancer,
        AgentKind::NetChaos,
        AgentKind::SecThreats,
        AgentKind::SecSecureCode,
        AgentKind::SecCrypto,
        AgentKind::SecCompliance,
        AgentKind::BeApi,
        AgentKind::BePerf,
        AgentKind::BeReliability,
        AgentKind::BeObservability,
        AgentKind::Teacher,
        AgentKind::Explainer,
        AgentKind::Coach,
        AgentKind::Reviewer,
        AgentKind::Motivator,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AgentKind::Architect => "architect",
            AgentKind::Storage => "storage",
            AgentKind::Reliability => "reliability",
            AgentKind::Tradeoffs => "tradeoffs",
            AgentKind::AlgTaskmaster => "alg_taskmaster",
            AgentKind::AlgComplexity => "alg_complexity",
            AgentKind::AlgTestGen => "alg_testgen",
            AgentKind::AlgOptimizer => "alg_optimizer",
            AgentKind::DbModeler => "db_modeler",
            AgentKind::DbQueryOptimizer => "db_query_optimizer",
            AgentKind::DbConsistency => "db_consistency",
            AgentKind::DbReplication => "db_replication",
            AgentKind::NetProtocols => "net_protocols",
            AgentKind::NetLatency => "net_latency",
            AgentKind::NetLoadBalancer => "net_lb",
            AgentKind::NetChaos => "net_chaos",
            AgentKind::SecThreats => "sec_threats",
            AgentKind::SecSecureCode => "sec_secure_code",
            AgentKind::SecCrypto => "sec_crypto",
            AgentKind::SecCompliance => "sec_compliance",
            AgentKind::BeApi => "be_api",
            AgentKind::BePerf => "be_perf",
            AgentKind::BeReliability => "be_reliability",
            AgentKind::BeObservability => "be_obs",
            AgentKind::Teacher => "teacher",
            AgentKind::Explainer => "explainer",
            AgentKind::Coach => "coach",
            AgentKind::Reviewer => "reviewer",
            AgentKind::Motivator => "motivator",
        }
    }

    pub fn from_id(id: &str) -> Option<AgentKind> {
        AgentKind::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Architect => "High-level architecture: components, APIs, data",
            AgentKind::Storage => "Storage: database choice, indexes, sharding/replication",
            AgentKind::Reliability => "Reliability/SRE: degradation, retries, limits, SLI/SLO",
            AgentKind::Tradeoffs => "Trade-off analysis across alternatives",
            AgentKind::AlgTaskmaster => "Formalizes the task and its constraints",
            AgentKind::AlgComplexity => "Assesses asymptotics and data structure choice",
            AgentKind::AlgTestGen => "Generates tests: edge, large, random",
            AgentKind::AlgOptimizer => "Suggests optimizations and simplifications",
            AgentKind::DbModeler => "Data modeling: normalization/denormalization",
            AgentKind::DbQueryOptimizer => "Query and index optimization",
            AgentKind::DbConsistency => "Transactions/isolation/locking",
            AgentKind::DbReplication => "Replication/sharding/migrations",
            AgentKind::NetProtocols => "Protocols and transport: HTTP/2/3, gRPC, TLS",
            AgentKind::NetLatency => "Latency optimization and TCP tuning",
            AgentKind::NetLoadBalancer => "Load balancing, health checks, stickiness",
            AgentKind::NetChaos => "Failure scenarios: packet loss/jitter, degradation",
            AgentKind::SecThreats => "Threat modeling: STRIDE, DFD",
            AgentKind::SecSecureCode => "Code risks: injections, XSS/CSRF, SSRF",
            AgentKind::SecCrypto => "Cryptography and secrets",
            AgentKind::SecCompliance => "PII/audit/retention",
            AgentKind::BeApi => "API contracts, versions, errors, idempotency",
            AgentKind::BePerf => "Performance profiling",
            AgentKind::BeReliability => "Reliability: retries/deadlines/limits",
            AgentKind::BeObservability => "Observability: metrics/traces/logs",
            AgentKind::Teacher => "Plans the lesson and gives the theory",
            AgentKind::Explainer => "Gives a small working example and explains it line by line",
            AgentKind::Coach => "Hands out a task with acceptance criteria",
            AgentKind::Reviewer => "Reviews style, quality and robustness",
            AgentKind::Motivator => "Encourages and proposes next steps",
        }
    }

    fn advice(&self, ctx: &InterviewContext) -> String {
        let fixed = match self {
            AgentKind::Architect => {
                "Components: Gateway/API -> Services -> DB/Cache -> Async workers. \
                 Define API contracts, service boundaries and the top-level data model."
            }
            AgentKind::Storage => {
                "Database choice: OLTP (PostgreSQL) + analytics (ClickHouse). \
                 Index by access keys, \
                 add a read replica, shard by user_id/region as load grows."
            }
            AgentKind::Reliability => {
                "Circuit breaker, timeouts, retries with jitter, rate limiting, \
                 error codes and idempotency. Metrics: latency, errors, success ratio."
            }
            AgentKind::Tradeoffs => {
                "Trade-offs: simplicity vs scalability; consistency vs availability; \
                 horizontal scaling vs operational complexity."
            }
            AgentKind::AlgTaskmaster => {
                "State the input/output, memory/time limits, and what counts as a correct solution."
            }
            AgentKind::AlgComplexity => {
                "Estimate time/space complexity and justify the data structures \
                 (array/hash/tree/heap)."
            }
            AgentKind::AlgTestGen => {
                "Generate edge cases, large inputs and random tests; \
                 check repeatability and coverage."
            }
            AgentKind::AlgOptimizer => {
                "Suggest a more efficient approach: drop redundant passes, precompute, cache."
            }
            AgentKind::DbModeler => {
                "Identify entities and relations, keys, indexes; balance normalization and \
                 denormalization for reads/writes."
            }
            AgentKind::DbQueryOptimizer => {
                "Check execution plans, add composite indexes, rewrite queries to avoid full scans."
            }
            AgentKind::DbConsistency => {
                "Name isolation levels, where phantoms/dirty reads can occur; \
                 handle deadlocks and retries."
            }
            AgentKind::DbReplication => {
                "Read replicas, sharding by access key, \
                 a migration plan with backfill and rollbacks."
            }
            AgentKind::NetProtocols => {
                "Protocol and TLS settings, pipelining/multiplexing, header compression."
            }
            AgentKind::NetLatency => {
                "Find hot RTTs, tune buffers, keep-alive, connection pools, fewer round trips."
            }
            AgentKind::NetLoadBalancer => {
                "LB scheme: RR/LC, health checks, outlier detection, \
                 stickiness/idempotency under retries."
            }
            AgentKind::NetChaos => {
                "Simulate packet loss/jitter, verify timeouts/retries and graceful degradation."
            }
            AgentKind::SecThreats => {
                "Define trust boundaries, attack surface, STRIDE threats and mitigations."
            }
            AgentKind::SecSecureCode => {
                "Check input validation, parameterized queries, CORS policies, safe serialization."
            }
            AgentKind::SecCrypto => {
                "Algorithm and mode choice, key storage/rotation, PFS, TLS configuration."
            }
            AgentKind::SecCompliance => {
                "Classify data, access, audit, retention/deletion periods according to policy."
            }
            AgentKind::BeApi => {
                "Define contracts, error codes, idempotency keys, versioning and compatibility."
            }
            AgentKind::BePerf => {
                "Find hot paths, cache, reduce allocations, optimize DB/network calls."
            }
            AgentKind::BeReliability => {
                "Set deadlines, retries with jitter, rate limits, work out idempotency."
            }
            AgentKind::BeObservability => {
                "Add metrics (RPS, p95), distributed tracing, log correlation and request context."
            }
            AgentKind::Teacher => {
                return format!(
                    "Level: {}. Topic: {}.\nLesson plan:\n{}\n\nTheory: {}",
                    ctx.level, ctx.topic, LESSON_PLAN, THEORY_NOTE
                );
            }
            AgentKind::Explainer => {
                return format!(
                    "Example:\n```python\n{}```\nWalkthrough:\n{}",
                    EXAMPLE_CODE, EXAMPLE_WALKTHROUGH
                );
            }
            AgentKind::Coach => {
                return format!("Task:\n{}\n\nCriteria:\n{}", COACH_TASK, COACH_CRITERIA);
            }
            AgentKind::Reviewer => {
                return match ctx.code_under_review.as_deref().map(str::trim) {
                    Some(code) if !code.is_empty() => format!(
                        "{}\nSubmitted code: {} line(s). Walk it against the checklist, \
                         starting with error handling.",
                        REVIEW_CHECKLIST,
                        code.lines().count()
                    ),
                    _ => REVIEW_CHECKLIST.to_string(),
                };
            }
            AgentKind::Motivator => {
                "Great job! Keep it up. Ready to offer a mini-challenge or a new topic."
            }
        };
        fixed.to_string()
    }
}

const LESSON_PLAN: &str = "- Introduction\n- Key concepts\n- Common mistakes\n- Mini task";

const THEORY_NOTE: &str = "a short walk through the key ideas and what to remember.";

const REVIEW_CHECKLIST: &str =
    "Review checklist: types, exception handling, code reuse, logging, testability, PEP8.";

const EXAMPLE_CODE: &str = "import requests\n\
resp = requests.get('https://api.github.com/users/octocat/repos', timeout=10)\n\
resp.raise_for_status()\n\
data = resp.json()\n\
print(len(data))\n";

const EXAMPLE_WALKTHROUGH: &str = "- import requests;\n- send the GET;\n- check the status;\n\
- parse the JSON;\n- print the repository count.";

const COACH_TASK: &str = "Write a function get_user_repos(username: str) -> list \
    that returns the names of a GitHub user's repositories. \
    Use requests, handle errors, 10 second timeout.";

const COACH_CRITERIA: &str =
    "- empty string -> ValueError;\n- unknown user -> empty list;\n\
     - existing user -> list of strings.";

impl Agent for AgentKind {
    fn id(&self) -> &str {
        AgentKind::id(self)
    }

    fn description(&self) -> &str {
        AgentKind::description(self)
    }

    fn act(&self, ctx: &InterviewContext) -> AgentMessage {
        AgentMessage::new(AgentKind::id(self), self.advice(ctx))
    }
}
