use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart, Method, RequestBuilder, Url,
};
use serde::Serialize;

use crate::{HuddleError, Result};

/// One logical call against a service's base origin.
///
/// A descriptor is built once and may be sent any number of times; every
/// send produces an identical request. Bodies own their data so multipart
/// forms can be rebuilt per attempt.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Body,
}

/// Request payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` parts.
    Multipart(Vec<FormPart>),
}

/// A single multipart field.
#[derive(Clone, Debug, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        mime: Option<String>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        file_name: impl Into<String>,
        mime: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            value: PartValue::File {
                bytes: bytes.into(),
                file_name: file_name.into(),
                mime: mime.map(str::to_owned),
            },
        }
    }
}

impl RequestDescriptor {
    /// Creates a descriptor for `path`, relative to the client's base origin.
    ///
    /// The path is split on `/`; each segment is percent-encoded when the
    /// request URL is resolved.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: split_path(path),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends a single path segment. `/` inside `segment` is encoded, not
    /// treated as a separator.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Serializes `payload` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|err| HuddleError::InvalidRequest(format!("unserializable body: {err}")))?;
        Ok(self.body(Body::Json(value)))
    }

    pub fn multipart(self, parts: Vec<FormPart>) -> Self {
        self.body(Body::Multipart(parts))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_ref(&self) -> &Body {
        &self.body
    }

    /// Path relative to the base origin, segments joined unencoded.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Resolves the full URL against `base`.
    pub(crate) fn resolve(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                HuddleError::InvalidRequest(format!("base url cannot carry a path: {base}"))
            })?;
            path.pop_if_empty();
            path.extend(self.segments.iter());
        }
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// Applies headers and body to a builder. Called once per attempt.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let builder = builder.headers(self.headers.clone());
        let builder = match &self.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(pairs) => builder.form(pairs),
            Body::Multipart(parts) => builder.multipart(build_form(parts)?),
        };
        Ok(builder)
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

fn build_form(parts: &[FormPart]) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match &part.value {
            PartValue::Text(value) => form.text(part.name.clone(), value.clone()),
            PartValue::File {
                bytes,
                file_name,
                mime,
            } => {
                let mut file = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime).map_err(|err| {
                        HuddleError::InvalidRequest(format!("invalid mime type '{mime}': {err}"))
                    })?;
                }
                form.part(part.name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, Url};

    use super::RequestDescriptor;

    fn base(url: &str) -> Url {
        Url::parse(url).expect("test base url must parse")
    }

    #[test]
    fn resolves_relative_to_root_origin() {
        let req = RequestDescriptor::get("/transcriptions");
        let url = req.resolve(&base("http://localhost:5008")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5008/transcriptions");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let req = RequestDescriptor::get("question");
        let url = req.resolve(&base("https://svc.example.com/api/")).unwrap();
        assert_eq!(url.as_str(), "https://svc.example.com/api/question");
    }

    #[test]
    fn encodes_segments_and_query() {
        let req = RequestDescriptor::get("get_user_meetings")
            .segment("a/b c@example.com")
            .query_pair("userEmail", "ana@example.com")
            .query_pair("meetingId", "x y");
        let url = req.resolve(&base("http://localhost:8003")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8003/get_user_meetings/a%2Fb%20c@example.com?userEmail=ana%40example.com&meetingId=x+y"
        );
    }

    #[test]
    fn rejects_cannot_be_a_base_origin() {
        let req = RequestDescriptor::get("upload");
        assert!(req.resolve(&base("mailto:someone@example.com")).is_err());
    }

    #[test]
    fn descriptor_reports_method_and_path() {
        let req = RequestDescriptor::post("auth/linkedin/");
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.path(), "auth/linkedin");
    }
}
