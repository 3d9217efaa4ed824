//! Session-scoped conversational memory.
//!
//! An explicitly constructed, injectable store — not ambient global state.
//! Each session key owns an independent ring buffer capped at the newest
//! `turns` entries; appends to different sessions never interact. The map is
//! Mutex-guarded so concurrent appends are memory-safe, but same-session
//! ordering under parallel requests is whatever the lock hands out — the
//! usage pattern is one user per session.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Entries kept per session by default.
const DEFAULT_TURNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub role: Role,
    pub content: String,
}

/// Bounded per-session conversation history.
pub struct MemoryStore {
    turns: usize,
    sessions: Mutex<HashMap<String, VecDeque<MemoryEntry>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TURNS)
    }
}

impl MemoryStore {
    pub fn new(turns: usize) -> Self {
        Self {
            turns,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Append one entry to a session, evicting the oldest beyond the bound.
    /// Empty session ids are ignored.
    pub fn append(&self, session_id: &str, role: Role, content: &str) {
        if session_id.is_empty() {
            return;
        }
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let buf = sessions.entry(session_id.to_string()).or_default();
        buf.push_back(MemoryEntry {
            role,
            content: content.to_string(),
        });
        while buf.len() > self.turns {
            buf.pop_front();
        }
    }

    /// Ordered history for a session, oldest first, at most `turns` entries.
    pub fn get(&self, session_id: &str) -> Vec<MemoryEntry> {
        if session_id.is_empty() {
            return Vec::new();
        }
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(session_id)
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Plain-text transcript of a session ("USER: ...\nASSISTANT: ...").
    pub fn transcript(&self, session_id: &str) -> String {
        self.get(session_id)
            .iter()
            .map(|e| format!("{}: {}", e.role.to_string().to_uppercase(), e.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_get_preserve_order() {
        let store = MemoryStore::default();
        store.append("s1", Role::User, "hei");
        store.append("s1", Role::Assistant, "hallo");
        let h = store.get("s1");
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].role, Role::User);
        assert_eq!(h[1].content, "hallo");
    }

    #[test]
    fn bound_evicts_oldest() {
        let store = MemoryStore::new(3);
        for i in 0..5 {
            store.append("s", Role::User, &format!("m{i}"));
        }
        let h = store.get("s");
        assert_eq!(h.len(), 3);
        assert_eq!(h[0].content, "m2");
        assert_eq!(h[2].content, "m4");
    }

    #[test]
    fn empty_session_id_is_a_no_op() {
        let store = MemoryStore::default();
        store.append("", Role::User, "lost");
        assert!(store.get("").is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let store = MemoryStore::default();
        store.append("a", Role::User, "for a");
        store.append("b", Role::User, "for b");
        assert_eq!(store.get("a").len(), 1);
        assert_eq!(store.get("b").len(), 1);
        assert_eq!(store.get("a")[0].content, "for a");
    }

    #[test]
    fn transcript_uppercases_roles() {
        let store = MemoryStore::default();
        store.append("s", Role::User, "hei");
        store.append("s", Role::Assistant, "hallo");
        assert_eq!(store.transcript("s"), "USER: hei\nASSISTANT: hallo");
    }

    #[test]
    fn unknown_session_yields_empty_history() {
        let store = MemoryStore::default();
        assert!(store.get("nope").is_empty());
    }
}
