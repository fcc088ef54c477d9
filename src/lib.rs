//! `huddle-http` is an async client for the Huddle service constellation.
//!
//! The core is [`ResilientClient`]: an HTTP client bound to one origin that
//! retries transient and 5xx failures with bounded exponential backoff.
//! Built on it:
//! - [`HuddleApi`] for uploads, transcriptions, questions and meetings
//! - [`oauth::LinkedInAuth`] for the OAuth code exchange

mod api;
mod client;
mod config;
mod error;
mod fallback;
mod options;
mod request;
mod response;
mod types;
mod wire;

pub mod oauth;
pub mod retry;

pub use api::{clean_meeting_id, HuddleApi};
pub use client::ResilientClient;
pub use config::ServiceUrls;
pub use error::HuddleError;
pub use fallback::fallback_questions;
pub use options::ClientOptions;
pub use request::{Body, FormPart, PartValue, RequestDescriptor};
pub use response::HttpResponse;
pub use types::{
    AudioUpload, Meeting, Question, QuestionId, QuestionSet, Transcription, TranscriptionRecord,
};

pub type Result<T> = std::result::Result<T, HuddleError>;
