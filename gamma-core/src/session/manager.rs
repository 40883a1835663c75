//! Session manager driving the response generator

use super::generator::ResponseGenerator;
use super::store::{ChatSession, Message};
use crate::config::LimitsConfig;
use crate::limits::{UsageStore, UsageWindow};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prompt used to open a fresh conversation
pub const SEED_PROMPT: &str = "Start a new conversation";

/// Assistant reply substituted when generation fails
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

const RESTRICTED_NOTICE: &str = "question limit reached, wait for the window to elapse";

#[derive(Debug, Default)]
struct ManagerState {
    sessions: Vec<ChatSession>,
    current_id: Option<String>,
    in_flight: bool,
    usage: Option<UsageWindow>,
}

/// Owns the session list and the usage window.
///
/// One generation call at a time: a second `create_session` or
/// `send_message` while one is outstanding is rejected with [`crate::Error::Busy`].
/// The lock is never held across the generator await.
pub struct SessionManager {
    state: Mutex<ManagerState>,
    generator: Arc<dyn ResponseGenerator>,
    store: UsageStore,
    limits: LimitsConfig,
}

impl SessionManager {
    /// Create a manager, adopting a stored usage window that has not elapsed
    pub fn new(
        generator: Arc<dyn ResponseGenerator>,
        store: UsageStore,
        limits: LimitsConfig,
    ) -> Self {
        let window = Duration::seconds(limits.window_secs as i64);
        let usage = store.load_fresh(Utc::now(), window);
        if let Some(usage) = &usage {
            debug!(count = usage.count, "Adopted stored usage window");
        }
        Self {
            state: Mutex::new(ManagerState {
                usage,
                ..ManagerState::default()
            }),
            generator,
            store,
            limits,
        }
    }

    fn window(&self) -> Duration {
        Duration::seconds(self.limits.window_secs as i64)
    }

    fn check_ready(&self, state: &ManagerState, now: DateTime<Utc>) -> crate::Result<()> {
        if let Some(usage) = &state.usage {
            if usage.is_exhausted(now, self.limits.question_limit, self.window()) {
                return Err(crate::Error::RateLimited(RESTRICTED_NOTICE.to_string()));
            }
        }
        if state.in_flight {
            return Err(crate::Error::Busy(
                "a generation call is already in flight".to_string(),
            ));
        }
        Ok(())
    }

    /// Open a new conversation seeded with one assistant message.
    ///
    /// On generator failure no session is created.
    pub async fn create_session(&self) -> crate::Result<ChatSession> {
        {
            let mut state = self.state.lock();
            self.check_ready(&state, Utc::now())?;
            state.in_flight = true;
        }

        let result = self.generator.generate(SEED_PROMPT).await;

        let mut state = self.state.lock();
        state.in_flight = false;
        match result {
            Ok(reply) => {
                let mut session = ChatSession::new();
                session.push(Message::assistant(reply));
                state.sessions.push(session.clone());
                state.current_id = Some(session.id.clone());
                Ok(session)
            }
            Err(e) => {
                warn!("Error creating new chat: {}", e);
                Err(e)
            }
        }
    }

    /// Point the manager at a session id. Existence is not validated;
    /// an unknown id leaves `current_session` empty.
    pub fn select_session(&self, id: &str) {
        self.state.lock().current_id = Some(id.to_string());
    }

    /// Send a user message on the current session.
    ///
    /// The user message is appended before the generator runs. A failed
    /// generation appends the fixed fallback reply instead of an assistant
    /// answer and leaves the usage window untouched.
    pub async fn send_message(&self, content: &str) -> crate::Result<()> {
        let session_id = {
            let mut state = self.state.lock();
            self.check_ready(&state, Utc::now())?;
            let id = state
                .current_id
                .clone()
                .ok_or_else(|| crate::Error::Session("no active session".to_string()))?;
            let session = state
                .sessions
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| crate::Error::Session(format!("unknown session {}", id)))?;
            session.push(Message::user(content));
            state.in_flight = true;
            id
        };

        let result = self.generator.generate(content).await;

        let mut state = self.state.lock();
        state.in_flight = false;
        match result {
            Ok(reply) => {
                if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
                    session.push(Message::assistant(reply));
                }
                let now = Utc::now();
                let window = self.window();
                let usage = match state.usage.as_mut() {
                    Some(usage) => {
                        usage.record_send(now, window);
                        *usage
                    }
                    None => {
                        let usage = UsageWindow::starting_at(now);
                        state.usage = Some(usage);
                        usage
                    }
                };
                if let Err(e) = self.store.save(&usage) {
                    warn!("Failed to persist usage window: {}", e);
                }
            }
            Err(e) => {
                warn!("Error sending message: {}", e);
                if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
                    session.push(Message::assistant(FALLBACK_REPLY));
                }
            }
        }
        Ok(())
    }

    /// Snapshot of all sessions
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.state.lock().sessions.clone()
    }

    /// Snapshot of the current session, if the pointer matches one
    pub fn current_session(&self) -> Option<ChatSession> {
        let state = self.state.lock();
        let id = state.current_id.as_ref()?;
        state.sessions.iter().find(|s| &s.id == id).cloned()
    }

    /// Whether a generation call is outstanding
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Current usage window, if any sends are recorded
    pub fn usage(&self) -> Option<UsageWindow> {
        self.state.lock().usage
    }

    /// Whether sends are currently rejected
    pub fn is_restricted(&self) -> bool {
        let state = self.state.lock();
        state.usage.map_or(false, |usage| {
            usage.is_exhausted(Utc::now(), self.limits.question_limit, self.window())
        })
    }
}
