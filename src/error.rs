use crate::retry::FailureClass;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum HuddleError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Service replied with a JSON envelope whose `code` signals failure.
    #[error("api error {code}: {message}")]
    Api {
        /// Application-level status code from the envelope.
        code: i64,
        /// Message from the envelope, or a default for the call site.
        message: String,
    },
    /// Response decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request could not be built (bad URL, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HuddleError {
    /// Classifies this error for the retry loop.
    ///
    /// Transport failures where no response arrived (connect refused,
    /// timeouts, aborted requests) are transient and 5xx statuses are server
    /// errors. Everything else is permanent.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::Transport(err) => {
                if err.is_builder() {
                    FailureClass::Permanent
                } else if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
                {
                    FailureClass::Transient
                } else {
                    FailureClass::Permanent
                }
            }
            Self::Http { status, .. } if *status >= 500 => FailureClass::ServerError,
            _ => FailureClass::Permanent,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HuddleError;
    use crate::retry::FailureClass;

    fn http(status: u16) -> HuddleError {
        HuddleError::Http {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_are_retryable() {
        for status in [500, 502, 503, 504, 599] {
            assert_eq!(http(status).failure_class(), FailureClass::ServerError);
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        for status in [400, 401, 404, 409, 429] {
            assert_eq!(http(status).failure_class(), FailureClass::Permanent);
        }
    }

    #[test]
    fn decode_and_api_errors_are_permanent() {
        assert!(!HuddleError::Decode("bad".to_owned())
            .failure_class()
            .is_retryable());
        assert!(!HuddleError::Api {
            code: 500,
            message: "Transcription failed".to_owned()
        }
        .failure_class()
        .is_retryable());
    }

    #[test]
    fn status_is_exposed_for_http_errors() {
        assert_eq!(http(503).status(), Some(503));
        assert_eq!(HuddleError::Decode("x".to_owned()).status(), None);
    }
}
