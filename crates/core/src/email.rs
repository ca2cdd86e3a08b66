/// The immutable per-run input to the orchestration graph, plus the
/// sanitized-directory-key transform used to resolve a user's knowledge-base
/// directory.
use serde::{Deserialize, Serialize};

/// One unread email, already summarized/classified by the upstream
/// summarizer. Immutable for the lifetime of one graph invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailContext {
    pub subject: String,
    pub sender_display: String,
    pub sender_address: String,
    pub body: String,
    pub snippet: String,
    pub summary: String,
    pub intent: String,
}

impl EmailContext {
    pub fn new(
        subject: impl Into<String>,
        sender_display: impl Into<String>,
        sender_address: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            sender_display: sender_display.into(),
            sender_address: sender_address.into(),
            body: body.into(),
            snippet: String::new(),
            summary: String::new(),
            intent: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>, intent: impl Into<String>) -> Self {
        self.summary = summary.into();
        self.intent = intent.into();
        self
    }

    /// Extracts `<email@domain>` from a `Display Name <email@domain>` header,
    /// falling back to the header verbatim (trimmed) when no angle brackets
    /// are present. Mirrors the summarizer's own sender-address extraction.
    pub fn extract_address(sender_header: &str) -> String {
        if let (Some(start), Some(end)) = (sender_header.find('<'), sender_header.find('>')) {
            if end > start {
                return sender_header[start + 1..end].trim().to_string();
            }
        }
        sender_header.trim().to_string()
    }
}

/// One message in a mail thread, kept only as read-only context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub from: String,
    pub snippet: String,
}

/// Transforms a user email into the sanitized directory-key form:
/// `@` -> `_at_`, `.` -> `_dot_`. Opaque after construction; only ever
/// reversed by `desanitize_user_key`, and only for round-trip tests.
pub fn sanitize_user_key(email: &str) -> String {
    email.replace('@', "_at_").replace('.', "_dot_")
}

/// Inverse of `sanitize_user_key`. Not used on any request path; the core
/// treats the sanitized key as opaque once constructed. Provided only to
/// exercise the round-trip invariant in §8.
pub fn desanitize_user_key(key: &str) -> String {
    key.replace("_dot_", ".").replace("_at_", "@")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_address_from_display_header() {
        assert_eq!(
            EmailContext::extract_address("Jane Doe <jane@x.com>"),
            "jane@x.com"
        );
    }

    #[test]
    fn extracts_address_from_bare_header() {
        assert_eq!(EmailContext::extract_address("jane@x.com"), "jane@x.com");
    }

    #[test]
    fn sanitize_replaces_both_characters() {
        assert_eq!(sanitize_user_key("jane.doe@x.com"), "jane_dot_doe_at_x_dot_com");
    }

    #[test]
    fn sanitize_round_trips_for_rfc5321_style_addresses() {
        let addresses = [
            "jane.doe@example.com",
            "a@b.co",
            "first.last@sub.domain.org",
        ];
        for addr in addresses {
            let sanitized = sanitize_user_key(addr);
            assert_eq!(desanitize_user_key(&sanitized), addr);
        }
    }

    #[test]
    fn with_summary_sets_both_fields() {
        let ctx = EmailContext::new("Hi", "Jane <jane@x.com>", "jane@x.com", "body")
            .with_summary("a summary", "Requesting information or clarification");
        assert_eq!(ctx.summary, "a summary");
        assert_eq!(ctx.intent, "Requesting information or clarification");
    }
}
