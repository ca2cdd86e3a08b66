/// Built-in demo inbox (`replyforge demo`): one fixture email per routing
/// path, so the full graph — scheduler, information responder, general
/// responder, and no-response — can be exercised in one command against
/// the mock providers without any real mailbox.
use replyforge_core::EmailContext;

pub struct Fixture {
    pub label: &'static str,
    pub email: EmailContext,
}

pub fn inbox() -> Vec<Fixture> {
    vec![
        Fixture {
            label: "scheduling request",
            email: EmailContext::new(
                "Quick sync next week?",
                "Priya Raman <priya@acme.example>",
                "priya@acme.example",
                "Hi, do you have 30 minutes sometime next week to go over the Q3 roadmap? \
                 Happy to work around your calendar.",
            )
            .with_summary("wants a 30 minute roadmap sync next week", "Scheduling or rescheduling a meeting or event"),
        },
        Fixture {
            label: "information request",
            email: EmailContext::new(
                "Question about your refund policy",
                "Jordan Lee <jordan@customer.example>",
                "jordan@customer.example",
                "Before I place an order, could you tell me what your refund policy covers?",
            )
            .with_summary("asking about refund policy coverage", "Question seeking information that requires document/knowledge base lookup"),
        },
        Fixture {
            label: "general chit-chat",
            email: EmailContext::new(
                "Good to see you at the conference",
                "Sam Okafor <sam@partner.example>",
                "sam@partner.example",
                "Great catching up at the conference last week, let's keep in touch.",
            )
            .with_summary("friendly follow-up after a conference", "Personal message not related to work"),
        },
        Fixture {
            label: "newsletter (no response)",
            email: EmailContext::new(
                "This week's product updates",
                "Acme Newsletter <news@acme.example>",
                "news@acme.example",
                "Check out what's new this week in our changelog.",
            )
            .with_summary("weekly product newsletter", "Marketing emails or newsletters"),
        },
    ]
}
