/// Origins of the services the API facade talks to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceUrls {
    /// Composite chatbot service: uploads, transcriptions, questions.
    pub chatbot: String,
    /// Meeting service.
    pub meetings: String,
}

pub(crate) const CHATBOT_URL_VAR: &str = "COMPOSITE_CHATBOT_SERVICE_URL";
pub(crate) const MEETING_URL_VAR: &str = "MEETING_SERVICE_URL";

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            chatbot: "http://localhost:5008".to_owned(),
            meetings: "http://localhost:8003".to_owned(),
        }
    }
}

impl ServiceUrls {
    /// Reads service origins from the environment, falling back to the
    /// local development ports for unset or empty variables.
    ///
    /// Reads:
    /// - `COMPOSITE_CHATBOT_SERVICE_URL`
    /// - `MEETING_SERVICE_URL`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |name: &str, default: String| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };
        Self {
            chatbot: read(CHATBOT_URL_VAR, defaults.chatbot),
            meetings: read(MEETING_URL_VAR, defaults.meetings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceUrls, CHATBOT_URL_VAR};

    #[test]
    fn unset_variables_use_local_defaults() {
        let urls = ServiceUrls::from_lookup(|_| None);
        assert_eq!(urls, ServiceUrls::default());
    }

    #[test]
    fn set_variables_override_defaults() {
        let urls = ServiceUrls::from_lookup(|name| {
            (name == CHATBOT_URL_VAR).then(|| " https://chat.example.com ".to_owned())
        });
        assert_eq!(urls.chatbot, "https://chat.example.com");
        assert_eq!(urls.meetings, "http://localhost:8003");
    }

    #[test]
    fn empty_variables_are_ignored() {
        let urls = ServiceUrls::from_lookup(|_| Some("   ".to_owned()));
        assert_eq!(urls, ServiceUrls::default());
    }
}
