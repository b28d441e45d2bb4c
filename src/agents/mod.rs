pub mod context;
pub mod kind;
pub mod registry;

pub use context::{AgentMessage, InterviewContext};
pub use kind::AgentKind;
pub use registry::AgentRegistry;

/// A stateless advisor. Given the context it returns exactly one message whose
/// sender is its own id. It must not block or fail.
pub trait Agent: Send + Sync {
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    fn act(&self, ctx: &InterviewContext) -> AgentMessage;
}
