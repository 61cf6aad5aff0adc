use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};
use serde::Serialize;

use crate::error::TransportError;
use crate::response::response_model::HttpResponse;

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs, in insertion order.
    Form(Vec<(String, String)>),
    /// No payload; the request only announces that it wants JSON back.
    EmptyJson,
}

/// An outgoing POST. `url` may be absolute or relative to the transport's base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequest {
    pub url: String,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::Form(fields),
        }
    }

    pub fn json(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::EmptyJson,
        }
    }

    /// Value of a form field, if this is a form request.
    pub fn field(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(fields) => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            RequestBody::EmptyJson => None,
        }
    }
}

/// The network boundary. One call per user action; no retries, no timeout.
pub trait Transport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest transport that follows redirects like a browser would.
///
/// Redirects are followed by hand so that a hop back to the requested URL
/// still counts as a redirect.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Request {
                url: base_url.to_string(),
                source: e,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request URL against the base, as a browser resolves `fetch('/path')`.
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        self.base_url.join(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn build(&self, url: &Url, body: &RequestBody) -> RequestBuilder {
        let builder = self.client.post(url.clone());
        match body {
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::EmptyJson => builder
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json"),
        }
    }

    fn send(builder: RequestBuilder, url: &Url) -> Result<Response, TransportError> {
        builder.send().map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Where a redirect response points, resolved against the URL that produced it.
fn redirect_target(response: &Response, from: &Url) -> Result<Option<Url>, TransportError> {
    if !response.status().is_redirection() {
        return Ok(None);
    }
    let Some(location) = response.headers().get(LOCATION).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };
    from.join(location)
        .map(Some)
        .map_err(|e| TransportError::InvalidUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })
}

impl Transport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut url = self.resolve(&request.url)?;
        let mut response = Self::send(self.build(&url, &request.body), &url)?;
        let mut hops = 0;

        while let Some(next) = redirect_target(&response, &url)? {
            if hops == MAX_REDIRECTS {
                return Err(TransportError::TooManyRedirects {
                    url: next.to_string(),
                    limit: MAX_REDIRECTS,
                });
            }
            // 307/308 replay the POST; every other redirect becomes a GET.
            let builder = match response.status() {
                StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => {
                    self.build(&next, &request.body)
                }
                _ => self.client.get(next.clone()),
            };
            response = Self::send(builder, &next)?;
            url = next;
            hops += 1;
        }

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError::Body {
            url: url.to_string(),
            source: e,
        })?;

        Ok(HttpResponse {
            status,
            redirected: hops > 0,
            url: url.to_string(),
            body,
        })
    }
}
