/// The shapes produced and consumed as an email moves through the
/// orchestration graph: classifier output, sub-agent outcome, and the
/// final draft returned to the caller.
use serde::{Deserialize, Serialize};

/// The fixed sentinel for a no-response draft. Tested directly by §8's
/// invariant #2.
pub const NO_RESPONSE_SENTINEL: &str = "This email doesn't require a response.";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Scheduler,
    InfoResponder,
    GeneralResponder,
    NoResponse,
}

/// The five values `response_type` may take on a completed run (§6, §8 #1).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Scheduler,
    InfoResponder,
    GeneralResponder,
    NoResponse,
    Error,
}

impl From<AgentKind> for ResponseType {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Scheduler => ResponseType::Scheduler,
            AgentKind::InfoResponder => ResponseType::InfoResponder,
            AgentKind::GeneralResponder => ResponseType::GeneralResponder,
            AgentKind::NoResponse => ResponseType::NoResponse,
        }
    }
}

/// Output of the Intent Classifier; consumed by the router (§3, §4.2).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponsePlan {
    pub agent_kind: AgentKind,
    pub confidence: f32,
    pub reasoning: String,
    pub suggested_action: String,
}

impl ResponsePlan {
    pub fn static_fallback(agent_kind: AgentKind, reasoning: impl Into<String>) -> Self {
        Self {
            agent_kind,
            confidence: 0.7,
            reasoning: reasoning.into(),
            suggested_action: "none".to_string(),
        }
    }
}

/// Free-form output of a sub-agent, plus an optional attachment marker
/// surfaced before the Composer strips it from the final text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl AgentOutcome {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(text: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            text: text.into(),
            attachment: Some(attachment),
        }
    }
}

/// An attachment's bytes, owned by whichever `DraftResponse` carries it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Returned to the caller by `generate_response`; persisted externally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DraftResponse {
    pub response_type: ResponseType,
    pub message: String,
    pub reasoning: String,
    pub confidence: f32,
    pub attachment: Option<Attachment>,
}

impl DraftResponse {
    pub fn no_response() -> Self {
        Self {
            response_type: ResponseType::NoResponse,
            message: NO_RESPONSE_SENTINEL.to_string(),
            reasoning: "intent mapped to no_response".to_string(),
            confidence: 1.0,
            attachment: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            message: message.into(),
            reasoning: String::new(),
            confidence: 0.0,
            attachment: None,
        }
    }
}

mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&data_encoding_base64(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        data_decoding_base64(&s).map_err(serde::de::Error::custom)
    }

    // Minimal base64 codec so the core doesn't need an extra dependency
    // purely for (de)serializing attachment bytes in tests/fixtures; the
    // wire format for real attachments is owned by the HTTP collaborator.
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn data_encoding_base64(bytes: &[u8]) -> String {
        let mut out = String::new();
        for chunk in bytes.chunks(3) {
            let b0 = chunk[0];
            let b1 = *chunk.get(1).unwrap_or(&0);
            let b2 = *chunk.get(2).unwrap_or(&0);
            let n = ((b0 as u32) << 16) | ((b1 as u32) << 8) | (b2 as u32);
            out.push(ALPHABET[((n >> 18) & 0x3f) as usize] as char);
            out.push(ALPHABET[((n >> 12) & 0x3f) as usize] as char);
            out.push(if chunk.len() > 1 {
                ALPHABET[((n >> 6) & 0x3f) as usize] as char
            } else {
                '='
            });
            out.push(if chunk.len() > 2 {
                ALPHABET[(n & 0x3f) as usize] as char
            } else {
                '='
            });
        }
        out
    }

    fn data_decoding_base64(s: &str) -> Result<Vec<u8>, String> {
        fn idx(c: u8) -> Result<u32, String> {
            ALPHABET
                .iter()
                .position(|&a| a == c)
                .map(|p| p as u32)
                .ok_or_else(|| "invalid base64 character".to_string())
        }
        let s = s.trim_end_matches('=');
        let mut out = Vec::new();
        let chars: Vec<u8> = s.bytes().collect();
        for chunk in chars.chunks(4) {
            let mut n: u32 = 0;
            for (i, &c) in chunk.iter().enumerate() {
                n |= idx(c)? << (18 - 6 * i);
            }
            out.push((n >> 16) as u8);
            if chunk.len() > 2 {
                out.push((n >> 8) as u8);
            }
            if chunk.len() > 3 {
                out.push(n as u8);
            }
        }
        Ok(out)
    }
}
