//! HTTP access to the relay and session endpoints.

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::StatusCode;

use verblix_core::models::auth::{AuthResponse, Credentials, MessageBody, SessionStatus, UserInfo};
use verblix_core::models::request::{ChatStreamRequest, ErrorBody};

use crate::error::ClientError;

/// Raw response body of an open relay stream.
pub type ByteStream = BoxStream<'static, Result<Bytes, ClientError>>;

/// Outcome of issuing a relay request.
pub enum Opened {
    Stream(ByteStream),
    /// The server answered 401: the session is gone.
    SessionExpired,
}

/// Client for one relay server. Holds the session cookie.
pub struct RelayClient {
    base_url: String,
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        reqwest::Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_http()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forget the session cookie by starting over with an empty jar.
    pub fn reset_session(&mut self) -> Result<(), ClientError> {
        self.http = build_http()?;
        Ok(())
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<UserInfo, ClientError> {
        self.authenticate("/auth/register", credentials).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo, ClientError> {
        self.authenticate("/auth/login", credentials).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.get(self.url("/auth/logout")).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    pub async fn status(&self) -> Result<SessionStatus, ClientError> {
        let response = self.http.get(self.url("/auth/status")).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Issue a relay request. The body is not read here; frames are
    /// decoded by the caller as chunks arrive.
    pub async fn open_stream(&self, request: &ChatStreamRequest) -> Result<Opened, ClientError> {
        let response = self
            .http
            .post(self.url("/chat-stream"))
            .json(request)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                tracing::info!("relay rejected the session");
                Ok(Opened::SessionExpired)
            }
            status if status.is_success() => {
                let body = response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(ClientError::from))
                    .boxed();
                Ok(Opened::Stream(body))
            }
            status => {
                let code = status.as_u16();
                match response.json::<ErrorBody>().await {
                    Ok(body) if status == StatusCode::BAD_REQUEST => Err(ClientError::Rejected(body.text)),
                    Ok(body) => {
                        tracing::warn!(status = code, text = %body.text, "relay request failed");
                        Err(ClientError::Status(code))
                    }
                    Err(_) => Err(ClientError::Status(code)),
                }
            }
        }
    }

    async fn authenticate(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<UserInfo, ClientError> {
        let response = self.http.post(self.url(path)).json(credentials).send().await?;
        let status = response.status();
        if status.is_success() {
            let body: AuthResponse = response.json().await?;
            return Ok(body.user);
        }

        match response.json::<MessageBody>().await {
            Ok(body) => Err(ClientError::Rejected(body.message)),
            Err(_) => Err(ClientError::Status(status.as_u16())),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn build_http() -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().cookie_store(true).build()?)
}
