use std::fmt;

use serde::{Deserialize, Serialize};

/// Audio clip sent to the transcription service.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioUpload {
    pub audio: Vec<u8>,
    pub file_name: String,
    pub mime: String,
    pub module_id: String,
    pub user_email: String,
}

impl AudioUpload {
    /// Wraps a recorded clip with the service's default metadata.
    pub fn new(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            audio: audio.into(),
            file_name: "recording.webm".to_owned(),
            mime: "audio/webm".to_owned(),
            module_id: "1".to_owned(),
            user_email: "default".to_owned(),
        }
    }

    pub fn module_id(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = module_id.into();
        self
    }

    pub fn user_email(mut self, user_email: impl Into<String>) -> Self {
        self.user_email = user_email.into();
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>, mime: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self.mime = mime.into();
        self
    }
}

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
    pub transcription_id: String,
    pub file_path: String,
    /// Whether the service persisted the transcription to its database,
    /// as opposed to only a text file.
    pub db_saved: bool,
}

/// Question identifier. The question service numbers generated questions,
/// while canned sets use string ids such as `fallback-1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for QuestionId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
    /// Which participant the question is addressed to, when the service
    /// says so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_user: Option<u32>,
    /// Any other fields on the record, kept as received.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Questions for a meeting, in the `{ code, questions }` shape the UI
/// expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub code: u16,
    pub questions: Vec<Question>,
    /// Other top-level envelope fields (e.g. `note`), kept as received.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Meeting record as returned by the meeting service. The shape is owned by
/// that service and passed through untouched.
pub type Meeting = serde_json::Value;

/// Stored transcription record, passed through untouched.
pub type TranscriptionRecord = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::{Question, QuestionId};

    #[test]
    fn question_accepts_numeric_and_text_ids() {
        let numeric: Question =
            serde_json::from_str(r#"{"id": 3, "text": "Why?", "for_user": 2}"#).unwrap();
        assert_eq!(numeric.id, QuestionId::Number(3));
        assert_eq!(numeric.for_user, Some(2));

        let text: Question = serde_json::from_str(r#"{"id": "q-7", "text": "How?"}"#).unwrap();
        assert_eq!(text.id, QuestionId::from("q-7"));
        assert_eq!(text.for_user, None);
    }

    #[test]
    fn question_keeps_unknown_fields() {
        let question: Question =
            serde_json::from_str(r#"{"id": 1, "text": "Why?", "topic": "travel"}"#).unwrap();
        assert_eq!(question.extra["topic"], "travel");

        let round_trip = serde_json::to_value(&question).unwrap();
        assert_eq!(round_trip, serde_json::json!({"id": 1, "text": "Why?", "topic": "travel"}));
    }
}
