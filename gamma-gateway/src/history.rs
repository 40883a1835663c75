//! Per-session rolling conversation context
//!
//! Each session id owns a bounded buffer of role-tagged turns, seeded with
//! the system persona. Once the bound is exceeded the oldest turn is
//! dropped, whichever role it carries.

use gamma_providers::{ChatTurn, ChatRole};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

/// One session's bounded turn buffer
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl ConversationHistory {
    /// Create a buffer seeded with the system turn
    pub fn seeded(system_prompt: &str, max_turns: usize) -> Self {
        let mut turns = VecDeque::with_capacity(max_turns + 1);
        turns.push_back(ChatTurn::system(system_prompt));
        Self { turns, max_turns }
    }

    /// Append a turn, evicting from the front past the bound
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Snapshot of the turns in order
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }

    /// Number of buffered turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Keyed store of conversation buffers, one per session id
pub struct HistoryStore {
    sessions: RwLock<HashMap<String, ConversationHistory>>,
    system_prompt: String,
    max_turns: usize,
}

impl HistoryStore {
    /// Create an empty store
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            system_prompt: system_prompt.into(),
            max_turns,
        }
    }

    /// Append a user turn to the session's buffer and return the resulting
    /// context, creating a seeded buffer for a new session
    pub fn append_user(&self, session: &str, content: &str) -> Vec<ChatTurn> {
        let mut sessions = self.sessions.write();
        let history = sessions
            .entry(session.to_string())
            .or_insert_with(|| ConversationHistory::seeded(&self.system_prompt, self.max_turns));
        history.push(ChatTurn::user(content));
        history.turns()
    }

    /// Append an assistant turn to the session's buffer
    pub fn append_assistant(&self, session: &str, content: &str) {
        let mut sessions = self.sessions.write();
        let history = sessions
            .entry(session.to_string())
            .or_insert_with(|| ConversationHistory::seeded(&self.system_prompt, self.max_turns));
        history.push(ChatTurn::assistant(content));
    }

    /// Reset one session back to its seeded state
    pub fn reset(&self, session: &str) {
        let mut sessions = self.sessions.write();
        sessions.insert(
            session.to_string(),
            ConversationHistory::seeded(&self.system_prompt, self.max_turns),
        );
    }

    /// Reset every session
    pub fn reset_all(&self) {
        self.sessions.write().clear();
    }

    /// Snapshot of one session's turns, empty when the session is unknown
    pub fn snapshot(&self, session: &str) -> Vec<ChatTurn> {
        self.sessions
            .read()
            .get(session)
            .map(|history| history.turns())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "You are a test assistant.";

    #[test]
    fn test_new_session_is_seeded() {
        let store = HistoryStore::new(PROMPT, 7);
        let turns = store.append_user("a", "hello");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::System);
        assert_eq!(turns[1].role, ChatRole::User);
    }

    #[test]
    fn test_drop_oldest_past_bound() {
        let mut history = ConversationHistory::seeded(PROMPT, 3);
        history.push(ChatTurn::user("one"));
        history.push(ChatTurn::assistant("two"));
        history.push(ChatTurn::user("three"));

        // Bound of 3: the seed was the oldest and is gone.
        assert_eq!(history.len(), 3);
        assert_eq!(history.turns()[0].content, "one");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = HistoryStore::new(PROMPT, 7);
        store.append_user("a", "from a");
        store.append_user("b", "from b");

        let a = store.snapshot("a");
        let b = store.snapshot("b");
        assert_eq!(a[1].content, "from a");
        assert_eq!(b[1].content, "from b");
    }

    #[test]
    fn test_reset_reseeds_single_session() {
        let store = HistoryStore::new(PROMPT, 7);
        store.append_user("a", "hello");
        store.append_assistant("a", "hi");
        store.append_user("b", "other");

        store.reset("a");
        let a = store.snapshot("a");
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].role, ChatRole::System);
        // Session b is untouched.
        assert_eq!(store.snapshot("b").len(), 2);
    }

    #[test]
    fn test_reset_all_clears_store() {
        let store = HistoryStore::new(PROMPT, 7);
        store.append_user("a", "hello");
        store.reset_all();
        assert!(store.snapshot("a").is_empty());
    }
}
