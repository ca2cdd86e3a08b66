/// Small text-shaping helpers shared by the responders and composer:
/// stripping a leading `<think>` block, and extracting/stripping the
/// `[ATTACH_FILE: ...]` directive (§4.6, §6).
use regex::Regex;
use std::sync::OnceLock;

fn think_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^\s*<think>.*?</think>\s*").unwrap())
}

fn attach_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[ATTACH_FILE:\s*([^\r\n\]]+)\]").unwrap())
}

/// Strips a single leading `<think>...</think>` block (DOTALL), if present.
pub fn strip_think_block(text: &str) -> String {
    think_block_re().replace(text, "").into_owned()
}

/// Returns the trimmed filename from the first `[ATTACH_FILE: ...]` marker,
/// if any.
pub fn extract_attach_file(text: &str) -> Option<String> {
    attach_file_re()
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Removes every `[ATTACH_FILE: ...]` marker from the text. Applied
/// unconditionally before a message is ever returned to the caller,
/// regardless of whether the attachment resolved (§8 invariant #6).
pub fn strip_attach_file(text: &str) -> String {
    attach_file_re().replace_all(text, "").trim().to_string()
}

/// Locates the outermost balanced `{...}` block in free-form LLM text and
/// attempts to parse it as JSON. Used by the Intent Classifier (§4.2, §9).
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let cleaned = strip_think_block(text);
    let bytes = cleaned.as_bytes();
    let start = bytes.iter().position(|&b| b == b'{')?;

    let mut depth = 0i32;
    let mut end = None;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + offset + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end?;
    serde_json::from_str(&cleaned[start..end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_think_block() {
        let text = "<think>reasoning here\nmore</think>\nActual reply.";
        assert_eq!(strip_think_block(text), "Actual reply.");
    }

    #[test]
    fn leaves_text_without_think_block_untouched() {
        let text = "Just a reply.";
        assert_eq!(strip_think_block(text), text);
    }

    #[test]
    fn extracts_attach_file_filename() {
        let text = "Here is your answer.\n[ATTACH_FILE: policy.pdf]";
        assert_eq!(extract_attach_file(text).as_deref(), Some("policy.pdf"));
    }

    #[test]
    fn strip_attach_file_removes_every_marker() {
        let text = "Body text [ATTACH_FILE: a.pdf] more text";
        let stripped = strip_attach_file(text);
        assert!(!stripped.contains("ATTACH_FILE"));
        assert!(stripped.contains("Body text"));
    }

    #[test]
    fn extract_json_object_finds_outermost_braces_amid_prose() {
        let text = "Sure, here you go: {\"agent_type\": \"scheduler\", \"confidence\": 0.9} thanks!";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["agent_type"], "scheduler");
    }

    #[test]
    fn extract_json_object_handles_nested_braces() {
        let text = "{\"a\": {\"b\": 1}, \"c\": 2}";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["a"]["b"], 1);
    }

    #[test]
    fn extract_json_object_returns_none_for_unparseable_text() {
        assert!(extract_json_object("no json here").is_none());
    }

    #[test]
    fn extract_json_object_strips_think_block_first() {
        let text = "<think>hmm</think>{\"agent_type\": \"general_responder\"}";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["agent_type"], "general_responder");
    }
}
