//! In-process service doubles with canned replies
//!
//! Useful for tests and offline demos: replies are deterministic, every call
//! is counted, and the last request is kept for inspection.

use super::service::{GenerationRequest, ImageGenerationService, MediaPart, TextGenerationService};
use crate::error::ServiceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// What a scripted service does when called
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    /// Answer with this JSON value
    Respond(Value),
    /// Fail as if the API returned a non-success status
    Fail { status: u16, message: String },
    /// Fail as if the response body could not be parsed
    Malformed(String),
    /// Never complete; exercises caller timeouts
    Hang,
}

impl ScriptedReply {
    async fn play(self) -> Result<Value, ServiceError> {
        match self {
            ScriptedReply::Respond(value) => Ok(value),
            ScriptedReply::Fail { status, message } => Err(ServiceError::Api { status, message }),
            ScriptedReply::Malformed(reason) => Err(ServiceError::MalformedResponse(reason)),
            ScriptedReply::Hang => std::future::pending().await,
        }
    }
}

enum Script {
    Always(ScriptedReply),
    Sequence(VecDeque<ScriptedReply>),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Text service answering from a script
pub struct ScriptedTextService {
    script: Mutex<Script>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedTextService {
    /// Give the same reply on every call
    pub fn always(reply: ScriptedReply) -> Self {
        Self::with_script(Script::Always(reply))
    }

    /// Give replies in order; calls past the end fail as malformed
    pub fn sequence(replies: Vec<ScriptedReply>) -> Self {
        Self::with_script(Script::Sequence(replies.into()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        lock(&self.last_request).clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        match &mut *lock(&self.script) {
            Script::Always(reply) => reply.clone(),
            Script::Sequence(queue) => queue
                .pop_front()
                .unwrap_or_else(|| ScriptedReply::Malformed("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl TextGenerationService for ScriptedTextService {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_request) = Some(request);
        let reply = self.next_reply();
        reply.play().await
    }
}

/// Image service answering with a fixed payload
pub struct ScriptedImageService {
    reply: Option<MediaPart>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedImageService {
    pub fn returning(media: MediaPart) -> Self {
        Self {
            reply: Some(media),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Every call fails with a 500
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.last_prompt).clone()
    }
}

#[async_trait]
impl ImageGenerationService for ScriptedImageService {
    async fn generate_image(&self, prompt: &str) -> Result<MediaPart, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_prompt) = Some(prompt.to_string());
        self.reply.clone().ok_or_else(|| ServiceError::Api {
            status: 500,
            message: "image generation unavailable".to_string(),
        })
    }
}
