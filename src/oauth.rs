//! LinkedIn OAuth code exchange, forwarded to the account service.
//!
//! The browser hands the authorization code to [`LinkedInAuth::exchange_code`],
//! which trades it for an access token, reads the OpenID profile and links
//! the account. The account service's reply is returned verbatim; any
//! failure becomes an [`AuthFailure`] envelope.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::{
    wire::{AccessToken, AccountLink, UserInfo},
    ClientOptions, HuddleError, RequestDescriptor, ResilientClient, Result,
};

pub const DEFAULT_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
pub const DEFAULT_USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173/callback";
pub const DEFAULT_ACCOUNT_SERVICE_URL: &str = "http://localhost:5001";

/// Credentials and endpoints for the exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect registered with the provider.
    pub redirect_uri: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub account_service_url: String,
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("account_service_url", &self.account_service_url)
            .finish()
    }
}

impl OAuthConfig {
    /// Creates a config with the provider's public endpoints and local
    /// defaults for the redirect and account service.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_owned(),
            token_url: DEFAULT_TOKEN_URL.to_owned(),
            userinfo_url: DEFAULT_USERINFO_URL.to_owned(),
            account_service_url: DEFAULT_ACCOUNT_SERVICE_URL.to_owned(),
        }
    }

    /// Reads the config from environment variables.
    ///
    /// Reads:
    /// - `LINKEDIN_CLIENT_ID`, `LINKEDIN_CLIENT_SECRET` (required)
    /// - `LINKEDIN_REDIRECT_URI`, `ACCOUNT_SERVICE_URL` (optional)
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, String> {
        let required = |name: &str| -> std::result::Result<String, String> {
            let value = lookup(name).ok_or_else(|| format!("missing {name} environment variable"))?;
            if value.trim().is_empty() {
                return Err(format!("{name} is set but empty"));
            }
            Ok(value.trim().to_owned())
        };
        let mut config = Self::new(
            required("LINKEDIN_CLIENT_ID")?,
            required("LINKEDIN_CLIENT_SECRET")?,
        );
        if let Some(uri) = lookup("LINKEDIN_REDIRECT_URI").filter(|v| !v.trim().is_empty()) {
            config.redirect_uri = uri.trim().to_owned();
        }
        if let Some(url) = lookup("ACCOUNT_SERVICE_URL").filter(|v| !v.trim().is_empty()) {
            config.account_service_url = url.trim().to_owned();
        }
        Ok(config)
    }
}

/// Error envelope returned to the browser when the exchange fails.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthFailure {
    pub code: u16,
    pub message: String,
    /// Upstream error body (JSON when it parses) or the error message.
    pub error: serde_json::Value,
}

impl AuthFailure {
    fn from_error(err: &HuddleError) -> Self {
        let error = match err {
            HuddleError::Http { body, .. } => serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
            other => serde_json::Value::String(other.to_string()),
        };
        Self {
            code: 500,
            message: "Authentication failed".to_owned(),
            error,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LinkedInAuth {
    http: reqwest::Client,
    config: OAuthConfig,
    account: ResilientClient,
    timeout: Duration,
}

impl LinkedInAuth {
    /// Provider calls use the timeout from `options` but are never retried;
    /// authorization codes are single-use. Account linking goes through the
    /// resilient client.
    pub fn new(config: OAuthConfig, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::new();
        let timeout = Duration::from_millis(options.timeout_ms);
        let account = ResilientClient::with_http(http.clone(), &config.account_service_url)?
            .with_options(options);
        Ok(Self {
            http,
            config,
            account,
            timeout,
        })
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchanges `code` and links the account.
    ///
    /// Returns the account service's JSON reply verbatim.
    pub async fn exchange_code(
        &self,
        code: &str,
    ) -> std::result::Result<serde_json::Value, AuthFailure> {
        self.try_exchange(code).await.map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %err, "linkedin authentication failed");
            AuthFailure::from_error(&err)
        })
    }

    async fn try_exchange(&self, code: &str) -> Result<serde_json::Value> {
        let token = self.request_access_token(code).await?;
        let profile = self.fetch_user_info(&token.access_token).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(email = %profile.email, "linking linkedin account");

        let link = AccountLink {
            email: &profile.email,
            name: &profile.name,
            picture: profile.picture.as_deref(),
        };
        let request = RequestDescriptor::post("auth/linkedin").json(&link)?;
        self.account.get_json(&request).await
    }

    async fn request_access_token(&self, code: &str) -> Result<AccessToken> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self
            .http
            .post(&self.config.token_url)
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await
            .map_err(HuddleError::Transport)?;
        read_json(response).await
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let response = self
            .http
            .get(&self.config.userinfo_url)
            .timeout(self.timeout)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(HuddleError::Transport)?;
        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(HuddleError::Transport)?;
    if !status.is_success() {
        return Err(HuddleError::Http {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body)
        .map_err(|err| HuddleError::Decode(format!("invalid provider JSON: {err}; body: {body}")))
}

#[cfg(test)]
mod tests {
    use super::{AuthFailure, OAuthConfig, DEFAULT_ACCOUNT_SERVICE_URL};
    use crate::HuddleError;

    #[test]
    fn config_requires_client_credentials() {
        let err = OAuthConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.contains("LINKEDIN_CLIENT_ID"));

        let err = OAuthConfig::from_lookup(|name| {
            (name == "LINKEDIN_CLIENT_ID").then(|| "id".to_owned())
        })
        .unwrap_err();
        assert!(err.contains("LINKEDIN_CLIENT_SECRET"));
    }

    #[test]
    fn config_applies_optional_overrides() {
        let config = OAuthConfig::from_lookup(|name| match name {
            "LINKEDIN_CLIENT_ID" => Some("id".to_owned()),
            "LINKEDIN_CLIENT_SECRET" => Some("secret".to_owned()),
            "LINKEDIN_REDIRECT_URI" => Some("https://app.example.com/callback".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.redirect_uri, "https://app.example.com/callback");
        assert_eq!(config.account_service_url, DEFAULT_ACCOUNT_SERVICE_URL);
    }

    #[test]
    fn debug_redacts_client_secret() {
        let debug = format!("{:?}", OAuthConfig::new("id", "super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn failure_keeps_upstream_json_body() {
        let failure = AuthFailure::from_error(&HuddleError::Http {
            status: 400,
            body: r#"{"error":"invalid_grant"}"#.to_owned(),
        });
        assert_eq!(failure.code, 500);
        assert_eq!(failure.message, "Authentication failed");
        assert_eq!(failure.error["error"], "invalid_grant");
    }

    #[test]
    fn failure_falls_back_to_error_message() {
        let failure = AuthFailure::from_error(&HuddleError::Decode("bad".to_owned()));
        assert_eq!(failure.error, serde_json::json!("decode error: bad"));
    }
}
