/// The static intent-label -> agent-kind fallback table (§3.1, §4.2),
/// used both as the classifier's last resort and as the cheap first stage
/// before the language-model call is even issued.
use replyforge_core::AgentKind;

const MAPPING: &[(&str, AgentKind)] = &[
    ("Scheduling or rescheduling a meeting or event", AgentKind::Scheduler),
    ("Following up on a previous conversation or task", AgentKind::InfoResponder),
    ("Requesting information or clarification", AgentKind::InfoResponder),
    ("Providing requested information or sharing details", AgentKind::GeneralResponder),
    ("Requesting approval for a task or document", AgentKind::GeneralResponder),
    ("Declining or cancelling a meeting or request", AgentKind::Scheduler),
    ("Invoices, payments, or billing-related matters", AgentKind::GeneralResponder),
    ("Raising or addressing a support or technical issue", AgentKind::InfoResponder),
    ("Marketing emails or newsletters", AgentKind::NoResponse),
    ("Informational only – no action required (FYI)", AgentKind::NoResponse),
    ("Providing a status update on a project or task", AgentKind::GeneralResponder),
    ("Email that needs a decision or input", AgentKind::GeneralResponder),
    ("Sending or requesting a quote or proposal", AgentKind::InfoResponder),
    ("Negotiating a job or business offer", AgentKind::GeneralResponder),
    ("Reporting a bug or product issue", AgentKind::InfoResponder),
    ("Requesting a new feature or improvement", AgentKind::InfoResponder),
    ("Recruitment or HR-related message", AgentKind::GeneralResponder),
    ("Scheduling or confirming a job interview", AgentKind::Scheduler),
    ("Requesting a referral or recommendation", AgentKind::GeneralResponder),
    ("Operations or compliance-related matter", AgentKind::GeneralResponder),
    ("Legal, policy, or regulatory updates", AgentKind::GeneralResponder),
    ("Announcing a new product or feature", AgentKind::NoResponse),
    ("Shipping, delivery, or order tracking update", AgentKind::NoResponse),
    ("Invitation to an event or webinar", AgentKind::Scheduler),
    ("Thank you note or congratulatory message", AgentKind::GeneralResponder),
    ("Personal message not related to work", AgentKind::GeneralResponder),
];

/// Maps an intent label to its static fallback agent kind. Labels absent
/// from the table (including the summarizer's own "Unknown") fall through
/// to `GeneralResponder`.
pub fn static_agent_kind(intent: &str) -> AgentKind {
    MAPPING
        .iter()
        .find(|(label, _)| *label == intent)
        .map(|(_, kind)| *kind)
        .unwrap_or(AgentKind::GeneralResponder)
}

/// Parses a model-emitted `agent_type` string into the enum, matching the
/// wire values in §6 (`scheduler`, `info_responder`, `general_responder`,
/// `no_response`).
pub fn parse_agent_kind(value: &str) -> Option<AgentKind> {
    match value {
        "scheduler" => Some(AgentKind::Scheduler),
        "info_responder" => Some(AgentKind::InfoResponder),
        "general_responder" => Some(AgentKind::GeneralResponder),
        "no_response" => Some(AgentKind::NoResponse),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_scheduling_intent_maps_to_scheduler() {
        assert_eq!(
            static_agent_kind("Scheduling or rescheduling a meeting or event"),
            AgentKind::Scheduler
        );
    }

    #[test]
    fn known_marketing_intent_maps_to_no_response() {
        assert_eq!(
            static_agent_kind("Marketing emails or newsletters"),
            AgentKind::NoResponse
        );
    }

    #[test]
    fn unknown_intent_falls_back_to_general_responder() {
        assert_eq!(static_agent_kind("Unknown"), AgentKind::GeneralResponder);
        assert_eq!(static_agent_kind("gibberish"), AgentKind::GeneralResponder);
    }

    #[test]
    fn every_table_entry_round_trips_through_parse_agent_kind() {
        for (_, kind) in MAPPING {
            let wire = match kind {
                AgentKind::Scheduler => "scheduler",
                AgentKind::InfoResponder => "info_responder",
                AgentKind::GeneralResponder => "general_responder",
                AgentKind::NoResponse => "no_response",
            };
            assert_eq!(parse_agent_kind(wire), Some(*kind));
        }
    }

    #[test]
    fn parse_agent_kind_rejects_unknown_values() {
        assert_eq!(parse_agent_kind("banana"), None);
    }
}
