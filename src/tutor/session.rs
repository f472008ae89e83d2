//! The tutor conversation: transcript state, history windowing, the busy
//! guard, and the canned Somali fallbacks that keep failures inside the chat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::tutor::backend::{ChatTurn, GenerativeBackend, TutorRequest};
use crate::types::{ChatMessage, ChatRole};

/// Identifier of the synthetic greeting; it never enters model context.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// At most this many prior turns accompany a new question.
pub const HISTORY_WINDOW: usize = 6;

/// Sampling temperature for every tutor request.
pub const TEMPERATURE: f32 = 0.7;

/// The greeting a fresh conversation opens with.
pub const WELCOME_TEXT: &str = "Asc! Magacaygu waa Yaaldug AI. Waxaan ahay macalinkaaga khaaska ah. Maanta maxaan kaa caawiyaa? Ma cashar baan kuu sharaxaa mise homework ayaan kaa caawiyaa?";

/// The greeting after the learner clears the chat.
pub const RESET_TEXT: &str = "Asc! Sidee kale ayaan kuu caawiyaa?";

/// Substituted when the model answers with no text at all.
pub const EMPTY_REPLY_FALLBACK: &str =
    "Waan ka xumahay, khalkhal ayaa ku yimid nidaamka. Fadlan mar kale isku day.";

/// Substituted when the backend call fails outright.
pub const FAILURE_FALLBACK: &str =
    "Waan ka xumahay, xiriirka internet-ka ayaa daciif ah. Fadlan isku day markale.";

/// The Macalin Yaaldug persona, sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "Waxaad tahay 'Macalin Yaaldug', macalin khabiir ah oo ardayda Soomaaliyeed ka caawiya waxbarashada.

Qawaaniintaada:
1. Marka ardaygu yiraahdo 'Sharax', bixi faahfaahin qoto dheer oo sahlan.
2. Marka lagu yiraahdo 'Soo koob', soo saar 3-5 qodob oo muhiim ah.
3. Marka ay timaado 'Homework', ha siin jawaabta tooska ah, laakiin tusi qaabka loo xaliyo (Step-by-step).
4. Had iyo jeer ku hadal Af-Soomaali dhiirigelin leh, saaxiibtinimo ah, oo fudud.
5. Haddii su'aashu tahay mid ka baxsan waxbarashada, si asluub leh ugu soo celi mawduuca barashada.";

/// A tutoring conversation over some [`GenerativeBackend`].
///
/// The session owns the transcript and a busy flag. While a reply is pending
/// the flag blocks resubmission; it is cleared on every outcome, including
/// failures and an abandoned `send` future, so the learner can always try
/// again.
pub struct TutorSession<B: GenerativeBackend> {
    backend: B,
    messages: Vec<ChatMessage>,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when it goes out of scope, so an embedder dropping
/// the in-flight `send` future cannot wedge the session.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<B: GenerativeBackend> TutorSession<B> {
    /// Opens a conversation seeded with the welcome greeting.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: vec![Self::greeting(WELCOME_TEXT)],
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    fn greeting(text: &str) -> ChatMessage {
        ChatMessage {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: ChatRole::Model,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// The transcript, oldest first, greeting included.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is currently pending.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Discards the transcript and starts over with the reset greeting.
    /// Any stale busy state is dropped with it.
    pub fn clear(&mut self) {
        self.messages = vec![Self::greeting(RESET_TEXT)];
        self.busy.store(false, Ordering::SeqCst);
    }

    /// The model context for a new question: every prior turn except
    /// greetings, windowed to the most recent [`HISTORY_WINDOW`], then the
    /// new user turn.
    fn assemble(&self, text: &str) -> TutorRequest {
        let mut turns: Vec<ChatTurn> = self
            .messages
            .iter()
            .filter(|m| m.id != WELCOME_MESSAGE_ID)
            .rev()
            .take(HISTORY_WINDOW)
            .map(|m| ChatTurn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect();
        turns.reverse();
        turns.push(ChatTurn {
            role: ChatRole::User,
            text: text.to_string(),
        });

        TutorRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            turns,
            temperature: TEMPERATURE,
        }
    }

    /// Sends a question and appends both it and the reply to the transcript.
    ///
    /// Returns the reply message, or `None` when the input is blank or a
    /// reply is already pending (the transcript is untouched in both cases).
    /// A failed or empty completion still produces a reply; it carries the
    /// matching canned apology instead of model text.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() || self.is_busy() {
            return None;
        }

        let request = self.assemble(text);
        debug!(turns = request.turns.len(), "sending tutor request");

        self.messages.push(ChatMessage {
            id: Utc::now().timestamp_millis().to_string(),
            role: ChatRole::User,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
        self.busy.store(true, Ordering::SeqCst);
        // Clears the flag on every exit from this scope, a dropped future
        // included.
        let _busy = BusyGuard(self.busy.clone());

        let reply = match self.backend.generate(&request).await {
            Ok(text) if text.is_empty() => ChatMessage {
                id: (Utc::now().timestamp_millis() + 1).to_string(),
                role: ChatRole::Model,
                text: EMPTY_REPLY_FALLBACK.to_string(),
                timestamp: Utc::now(),
            },
            Ok(text) => ChatMessage {
                id: (Utc::now().timestamp_millis() + 1).to_string(),
                role: ChatRole::Model,
                text,
                timestamp: Utc::now(),
            },
            Err(e) => {
                error!(error = %e, "tutor backend call failed");
                ChatMessage {
                    id: "error".to_string(),
                    role: ChatRole::Model,
                    text: FAILURE_FALLBACK.to_string(),
                    timestamp: Utc::now(),
                }
            }
        };
        drop(_busy);

        self.messages.push(reply);
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::error::{Error, Result};

    /// Pops one scripted outcome per call and records every request it saw.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String>>>,
        seen: Mutex<Vec<TutorRequest>>,
    }

    impl ScriptedBackend {
        fn with_replies(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> TutorRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        async fn generate(&self, request: &TutorRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("Waad mahadsan tahay!".to_string()))
        }
    }

    #[tokio::test]
    async fn send_appends_question_and_reply() {
        let backend = ScriptedBackend::with_replies(vec![Ok("Jawaab fiican".to_string())]);
        let mut session = TutorSession::new(backend.clone());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, WELCOME_TEXT);

        let reply = session.send("Maxay tahay aljebra?").await.unwrap();
        assert_eq!(reply.role, ChatRole::Model);
        assert_eq!(reply.text, "Jawaab fiican");

        let transcript = session.messages();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[1].text, "Maxay tahay aljebra?");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn requests_carry_persona_and_never_the_welcome() {
        let backend = ScriptedBackend::with_replies(vec![]);
        let mut session = TutorSession::new(backend.clone());
        session.send("Su'aal").await.unwrap();

        let request = backend.last_request();
        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(request.temperature, TEMPERATURE);
        // Only the new user turn: the greeting is filtered out.
        assert_eq!(request.turns.len(), 1);
        assert_eq!(request.turns[0].role, ChatRole::User);
        assert_eq!(request.turns[0].text, "Su'aal");
    }

    #[tokio::test]
    async fn history_is_windowed_to_six_prior_turns() {
        let backend = ScriptedBackend::with_replies(vec![]);
        let mut session = TutorSession::new(backend.clone());
        for i in 0..5 {
            session.send(&format!("su'aal {}", i)).await.unwrap();
        }
        // Transcript now holds welcome + 10 turns; the next request may only
        // carry the last 6 of those plus the new question.
        session.send("tan cusub").await.unwrap();

        let request = backend.last_request();
        assert_eq!(request.turns.len(), HISTORY_WINDOW + 1);
        assert_eq!(request.turns[0].text, "su'aal 3");
        assert_eq!(
            request.turns.last().map(|t| t.text.as_str()),
            Some("tan cusub")
        );
    }

    #[tokio::test]
    async fn empty_completion_becomes_the_canned_apology() {
        let backend = ScriptedBackend::with_replies(vec![Ok(String::new())]);
        let mut session = TutorSession::new(backend);
        let reply = session.send("Sharax").await.unwrap();
        assert_eq!(reply.text, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn backend_failure_stays_inside_the_chat() {
        let backend = ScriptedBackend::with_replies(vec![
            Err(Error::Other("boom".to_string())),
            Ok("haa".to_string()),
        ]);
        let mut session = TutorSession::new(backend.clone());

        let reply = session.send("Su'aal").await.unwrap();
        assert_eq!(reply.text, FAILURE_FALLBACK);
        assert_eq!(reply.id, "error");
        assert!(!session.is_busy());

        // The busy flag cleared, so the learner can simply retry.
        let retry = session.send("Mar kale").await.unwrap();
        assert_eq!(retry.text, "haa");
        // The failed exchange stays in context for the retry.
        let request = backend.last_request();
        assert!(request.turns.iter().any(|t| t.text == FAILURE_FALLBACK));
    }

    #[tokio::test]
    async fn blank_input_and_busy_sessions_are_ignored() {
        let backend = ScriptedBackend::with_replies(vec![]);
        let mut session = TutorSession::new(backend);

        assert!(session.send("   ").await.is_none());
        assert_eq!(session.messages().len(), 1);

        session.busy.store(true, Ordering::SeqCst);
        assert!(session.send("Su'aal").await.is_none());
        assert_eq!(session.messages().len(), 1);
    }

    /// Stalls forever on its first call, then answers normally.
    struct StallingBackend {
        stalled: AtomicBool,
    }

    #[async_trait]
    impl GenerativeBackend for StallingBackend {
        async fn generate(&self, _request: &TutorRequest) -> Result<String> {
            if self.stalled.swap(false, Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            Ok("haa".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_send_leaves_the_session_usable() {
        let mut session = TutorSession::new(Arc::new(StallingBackend {
            stalled: AtomicBool::new(true),
        }));

        // The embedder gives up on the reply and drops the future, the way
        // navigating away abandons an in-flight question.
        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            session.send("Su'aal"),
        )
        .await;
        assert!(abandoned.is_err());

        // The flag is released, so the learner can simply ask again.
        assert!(!session.is_busy());
        let retry = session.send("Mar kale").await.unwrap();
        assert_eq!(retry.text, "haa");
    }

    #[tokio::test]
    async fn clear_also_releases_a_stale_busy_flag() {
        let backend = ScriptedBackend::with_replies(vec![]);
        let mut session = TutorSession::new(backend);

        session.busy.store(true, Ordering::SeqCst);
        session.clear();
        assert!(!session.is_busy());
        assert!(session.send("Su'aal").await.is_some());
    }

    #[tokio::test]
    async fn clear_resets_to_the_short_greeting() {
        let backend = ScriptedBackend::with_replies(vec![]);
        let mut session = TutorSession::new(backend.clone());
        session.send("Su'aal").await.unwrap();
        assert_eq!(session.messages().len(), 3);

        session.clear();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, RESET_TEXT);
        assert_eq!(session.messages()[0].id, WELCOME_MESSAGE_ID);

        // The new greeting is filtered from context like the original one.
        session.send("Dib u bilow").await.unwrap();
        assert_eq!(backend.last_request().turns.len(), 1);
    }
}
