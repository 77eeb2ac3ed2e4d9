use serde::Serialize;

/// A suggested follow-up action surfaced alongside an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReply {
    pub text: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(text: &str, value: &str) -> Self {
        Self {
            text: text.to_string(),
            value: value.to_string(),
        }
    }
}

/// Provenance reference for one retrieved chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub document: String,
    pub chunk_id: usize,
    pub content_preview: String,
}

/// Uniform reply produced for every query; constructed fresh per query and
/// never mutated after return. The answer is never empty by contract.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseEnvelope {
    /// Serialized as `response` on the wire
    #[serde(rename = "response")]
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub contact_form: bool,
    pub meeting_form: bool,
    pub quick_replies: Vec<QuickReply>,
}

impl ResponseEnvelope {
    /// A canned reply: fixed answer text plus quick replies, no sources
    pub fn canned(answer: &str, quick_replies: Vec<QuickReply>) -> Self {
        Self {
            answer: answer.to_string(),
            quick_replies,
            ..Default::default()
        }
    }

    pub fn with_contact_form(mut self) -> Self {
        self.contact_form = true;
        self
    }

    pub fn with_meeting_form(mut self) -> Self {
        self.meeting_form = true;
        self
    }
}
