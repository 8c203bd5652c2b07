use std::borrow::Cow;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tegmine_common::prelude::*;

use crate::config::ClientProperties;

const AUTH_HEADER: &str = "X-Authorization";

/// Shared transport of the resource clients: base url, auth header and the status mapping of
/// every response.
#[derive(Clone)]
pub struct ApiClient {
    base_url: InlineStr,
    auth_token: Option<InlineStr>,
    client: Client,
}

impl ApiClient {
    pub fn new(properties: &ClientProperties) -> TegResult<Self> {
        let client = Client::builder()
            .timeout(properties.request_timeout)
            .build()
            .map_err(Self::transport_error)?;
        Ok(Self {
            base_url: InlineStr::from(properties.server_url.trim_end_matches('/')),
            auth_token: properties.auth_token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` is relative to the base url and must start with `/`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.auth_token {
            Some(token) => builder.header(AUTH_HEADER, token.as_str()),
            None => builder,
        }
    }

    /// Sends the request; `Ok(None)` is a "no content" answer.
    pub fn execute(&self, builder: RequestBuilder) -> TegResult<Option<String>> {
        let request = builder.build().map_err(Self::transport_error)?;
        let method = request.method().clone();
        let path = InlineStr::from(request.url().path());

        trace!("{} {}", method, request.url());
        let response = self
            .client
            .execute(request)
            .map_err(Self::transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(Self::transport_error)?;
        Self::handle_response(method.as_str(), &path, status, body)
    }

    pub fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> TegResult<Option<T>> {
        match self.execute(builder)? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// For endpoints answering with a bare id in plain text.
    pub fn execute_text(&self, builder: RequestBuilder) -> TegResult<InlineStr> {
        Ok(self
            .execute(builder)?
            .map(|body| InlineStr::from(body.trim().trim_matches('"')))
            .unwrap_or_default())
    }

    pub fn handle_response(
        method: &str,
        path: &str,
        status: u16,
        body: String,
    ) -> TegResult<Option<String>> {
        match status {
            204 => Ok(None),
            200..=299 if body.trim().is_empty() => Ok(None),
            200..=299 => Ok(Some(body)),
            404 => fmt_err!(NotFound, "{} {} not found: {}", method, path, body),
            409 => fmt_err!(Conflict, "{} {} conflict: {}", method, path, body),
            _ => fmt_err!(
                RemoteCallFailed,
                "{} {} failed with status {}: {}",
                method,
                path,
                status,
                body
            ),
        }
    }

    pub fn escape(segment: &str) -> Cow<str> {
        urlencoding::encode(segment)
    }

    fn transport_error(e: reqwest::Error) -> ErrorCode {
        ErrorCode::TransportError(format!("request to server failed: {}", e))
    }
}
