/// ReplyForge Scheduler
///
/// The Scheduling Sub-Agent (§4.5): a bounded tool-calling loop over a
/// fixed calendar tool vocabulary, dispatched sequentially against a
/// `CalendarProvider`.
pub use loop_::SchedulerAgent;
pub use tools::{propose_slots, tool_definitions, NO_CONFLICTS_SENTINEL};

pub mod loop_;
pub mod tools;
