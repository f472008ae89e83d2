//! The seam between the tutor session and whatever produces replies.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatRole;

/// One turn of conversation context as sent to the model, stripped of the
/// transcript's identifiers and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// A fully assembled completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    /// The fixed Somali tutoring persona.
    pub system_instruction: String,
    /// Windowed prior turns plus the new user turn, oldest first.
    pub turns: Vec<ChatTurn>,
    pub temperature: f32,
}

/// A source of model completions.
///
/// Implementations must be safe to share across tasks; the session calls
/// `generate` at most once at a time per conversation.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Produces a single text reply for the request.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached, refuses the
    /// request, or answers with an unreadable body. The session never
    /// surfaces these to the learner; they become a canned apology.
    async fn generate(&self, request: &TutorRequest) -> Result<String>;
}

// Lets a session share its backend with the embedder (or a test harness).
#[async_trait]
impl<B: GenerativeBackend + ?Sized> GenerativeBackend for std::sync::Arc<B> {
    async fn generate(&self, request: &TutorRequest) -> Result<String> {
        (**self).generate(request).await
    }
}
