//! The AI tutor: transcript session, pluggable generative backend, and the
//! Gemini HTTP implementation.

mod backend;
mod gemini;
mod session;

pub use backend::{ChatTurn, GenerativeBackend, TutorRequest};
pub use gemini::{GeminiBackend, DEFAULT_MODEL};
pub use session::{
    TutorSession, EMPTY_REPLY_FALLBACK, FAILURE_FALLBACK, HISTORY_WINDOW, RESET_TEXT,
    SYSTEM_INSTRUCTION, TEMPERATURE, WELCOME_MESSAGE_ID, WELCOME_TEXT,
};
