use reqwest::{
    header::{self, HeaderMap},
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{HuddleError, Result};

/// Successful (2xx) response, passed through as received.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// Returns the `Content-Type` header value, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// True when the response declares an `application/json` body.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|value| value.contains("application/json"))
    }

    /// Decodes the body as JSON regardless of the declared content type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            HuddleError::Decode(format!("invalid response JSON: {err}; body: {}", self.body))
        })
    }

    /// Decodes the body as JSON, failing when the content type is not JSON.
    pub fn expect_json<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_json() {
            return Err(HuddleError::Decode(format!(
                "server response was not JSON: {} (content-type: {})",
                self.status,
                self.content_type().unwrap_or("<none>")
            )));
        }
        self.json()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{
        header::{HeaderMap, HeaderValue, CONTENT_TYPE},
        StatusCode,
    };

    use super::HttpResponse;
    use crate::HuddleError;

    fn response(content_type: Option<&'static str>, body: &str) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        }
        HttpResponse {
            status: StatusCode::OK,
            headers,
            body: body.to_owned(),
        }
    }

    #[test]
    fn detects_json_with_charset() {
        assert!(response(Some("application/json; charset=utf-8"), "{}").is_json());
        assert!(!response(Some("text/html"), "<p>").is_json());
        assert!(!response(None, "{}").is_json());
    }

    #[test]
    fn expect_json_rejects_html() {
        let err = response(Some("text/html"), "<html></html>")
            .expect_json::<serde_json::Value>()
            .unwrap_err();
        assert!(matches!(err, HuddleError::Decode(message) if message.contains("not JSON")));
    }

    #[test]
    fn expect_json_decodes_body() {
        let value: serde_json::Value = response(Some("application/json"), r#"{"code":200}"#)
            .expect_json()
            .unwrap();
        assert_eq!(value["code"], 200);
    }
}
