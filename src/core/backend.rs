//! Language-model backend seam.
//!
//! The app only needs "send this text in this session, give me the reply".
//! [`HttpBackend`] implements that against any OpenAI-compatible
//! `chat/completions` endpoint; tests plug in their own [`ChatBackend`].

use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::debug;

use crate::api::ChatRequest;
use crate::core::chat_stream::{summarize_api_error, ReplyAccumulator};
use crate::core::session::ChatSession;
use crate::utils::url::construct_api_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

#[derive(Debug)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The provider answered with a non-success status.
    Status { status: u16, message: String },
    /// The provider reported an error in the middle of the event stream.
    Stream(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "connection error: {err}"),
            BackendError::Status { status, message } => {
                write!(f, "provider returned {status}: {message}")
            }
            BackendError::Stream(message) => write!(f, "stream error: {message}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err)
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `text` on top of `session`'s committed history.
    async fn send_message(&self, session: &ChatSession, text: &str) -> Result<Reply, BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, session: &ChatSession, text: &str) -> Result<Reply, BackendError> {
        let request = ChatRequest {
            model: session.model().to_string(),
            messages: session.request_messages(text),
            stream: true,
            temperature: Some(session.temperature()),
        };

        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        debug!(
            url = %chat_url,
            model = %request.model,
            history = session.turns().len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(chat_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: summarize_api_error(&body),
            });
        }

        let mut stream = response.bytes_stream();
        let mut accumulator = ReplyAccumulator::new();
        while let Some(chunk) = stream.next().await {
            if accumulator.feed(&chunk?)? {
                break;
            }
        }

        let text = accumulator.finish()?;
        debug!(chars = text.chars().count(), "chat reply complete");
        Ok(Reply { text })
    }
}
