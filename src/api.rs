use crate::{
    wire::{QuestionsEnvelope, TranscriptionsEnvelope, UploadEnvelope},
    AudioUpload, ClientOptions, FormPart, HuddleError, Meeting, QuestionSet, RequestDescriptor,
    ResilientClient, Result, ServiceUrls, Transcription, TranscriptionRecord,
};

/// Typed access to the chatbot and meeting services.
///
/// Write paths ([`HuddleApi::transcribe_audio`]) always propagate failures.
/// Read paths whose absence would break a view ([`HuddleApi::get_question`],
/// [`HuddleApi::get_transcriptions`]) degrade to safe defaults instead.
#[derive(Clone, Debug)]
pub struct HuddleApi {
    chatbot: ResilientClient,
    meetings: ResilientClient,
}

impl HuddleApi {
    /// Creates clients for every service in `urls`, sharing one connection
    /// pool and the same options.
    pub fn new(urls: &ServiceUrls, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::new();
        let chatbot = ResilientClient::with_http(http.clone(), &urls.chatbot)?
            .with_options(options.clone());
        let meetings = ResilientClient::with_http(http, &urls.meetings)?.with_options(options);
        Ok(Self::from_clients(chatbot, meetings))
    }

    /// Builds the facade from [`ServiceUrls::from_env`] with default options.
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::new(&ServiceUrls::from_env(), ClientOptions::default()).map_err(|err| err.to_string())
    }

    pub fn from_clients(chatbot: ResilientClient, meetings: ResilientClient) -> Self {
        Self { chatbot, meetings }
    }

    /// Uploads an audio clip and returns its transcription.
    ///
    /// Fails on transport errors, non-2xx statuses, non-JSON replies and
    /// envelopes whose `code` is not 2xx.
    pub async fn transcribe_audio(&self, upload: AudioUpload) -> Result<Transcription> {
        let AudioUpload {
            audio,
            file_name,
            mime,
            module_id,
            user_email,
        } = upload;

        let request = RequestDescriptor::post("upload").multipart(vec![
            FormPart::file("audio", audio, file_name, Some(mime.as_str())),
            FormPart::text("moduleId", module_id),
            FormPart::text("userEmail", user_email),
        ]);

        let result = self.upload(&request).await;

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::error!(error = %err, "transcription upload failed");
        }

        result
    }

    async fn upload(&self, request: &RequestDescriptor) -> Result<Transcription> {
        let envelope: UploadEnvelope = self.chatbot.send(request).await?.expect_json()?;

        if !(200..300).contains(&envelope.code) {
            return Err(HuddleError::Api {
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Transcription failed".to_owned()),
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| HuddleError::Decode("upload response is missing data".to_owned()))?;

        Ok(Transcription {
            text: data.transcription,
            transcription_id: data.transcription_id,
            file_path: data.file_path,
            db_saved: data.db_saved,
        })
    }

    /// Lists stored transcriptions. Any failure yields an empty list.
    pub async fn get_transcriptions(&self) -> Vec<TranscriptionRecord> {
        match self.fetch_transcriptions().await {
            Ok(transcriptions) => transcriptions,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "listing transcriptions failed; returning empty list");
                Vec::new()
            }
        }
    }

    async fn fetch_transcriptions(&self) -> Result<Vec<TranscriptionRecord>> {
        let request = RequestDescriptor::get("transcriptions");
        let envelope: TranscriptionsEnvelope = self.chatbot.send(&request).await?.expect_json()?;
        if envelope.code != 200 {
            return Err(HuddleError::Api {
                code: envelope.code,
                message: "unexpected transcriptions code".to_owned(),
            });
        }
        Ok(envelope.data.transcriptions)
    }

    /// Fetches conversation questions for a meeting.
    ///
    /// Anything after the first `:` in `meeting_id` is dropped. Question
    /// records are returned as the service sent them. When the service
    /// cannot produce a question list (transport or status failure, non-JSON
    /// body, missing `questions`) the fixed fallback set is returned instead.
    pub async fn get_question(&self, user_email: &str, meeting_id: &str) -> QuestionSet {
        let meeting_id = clean_meeting_id(meeting_id);
        match self.fetch_questions(user_email, meeting_id).await {
            Ok(set) => set,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    error = %_err,
                    user_email,
                    meeting_id,
                    "fetching questions failed; returning fallback questions"
                );
                QuestionSet::fallback()
            }
        }
    }

    async fn fetch_questions(&self, user_email: &str, meeting_id: &str) -> Result<QuestionSet> {
        let request = RequestDescriptor::get("question")
            .query_pair("userEmail", user_email)
            .query_pair("meetingId", meeting_id);
        let envelope: QuestionsEnvelope = self.chatbot.send(&request).await?.expect_json()?;
        let questions = envelope
            .questions
            .ok_or_else(|| HuddleError::Decode("response is missing questions".to_owned()))?;
        Ok(QuestionSet {
            code: envelope.code.unwrap_or(200),
            questions,
            extra: envelope.extra,
        })
    }

    /// Lists meetings the user takes part in.
    ///
    /// Non-2xx responses are errors. A body that is not a JSON array is
    /// treated as no meetings.
    pub async fn get_user_meetings(&self, user_email: &str) -> Result<Vec<Meeting>> {
        let request = RequestDescriptor::get("get_user_meetings").segment(user_email);
        let body: serde_json::Value = self.meetings.get_json(&request).await?;
        match body {
            serde_json::Value::Array(meetings) => Ok(meetings),
            _other => {
                #[cfg(feature = "tracing")]
                tracing::warn!(body = %_other, user_email, "meetings payload is not an array");
                Ok(Vec::new())
            }
        }
    }
}

/// Strips everything from the first `:` on, e.g. `"abc123:1"` → `"abc123"`.
pub fn clean_meeting_id(meeting_id: &str) -> &str {
    meeting_id
        .split_once(':')
        .map_or(meeting_id, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::clean_meeting_id;

    #[test]
    fn meeting_id_is_cut_at_first_colon() {
        assert_eq!(clean_meeting_id("abc123:1"), "abc123");
        assert_eq!(clean_meeting_id("abc123:1:2"), "abc123");
        assert_eq!(clean_meeting_id("abc123"), "abc123");
        assert_eq!(clean_meeting_id(":1"), "");
    }
}
