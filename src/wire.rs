use serde::{Deserialize, Serialize};

use crate::Question;

#[derive(Debug, Deserialize)]
pub struct UploadEnvelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<UploadData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    pub transcription: String,
    pub transcription_id: String,
    pub file_path: String,
    #[serde(default)]
    pub db_saved: bool,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionsEnvelope {
    pub code: i64,
    pub data: TranscriptionsData,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionsData {
    pub transcriptions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsEnvelope {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountLink<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub picture: Option<&'a str>,
}
