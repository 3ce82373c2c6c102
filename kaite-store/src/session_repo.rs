use kaite_agent::{ChatMessage, ChatSession};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

struct Entry {
    session: ChatSession,
    last_touch: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    clock: u64,
}

impl Sessions {
    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_touch)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.entries.remove(&id);
            debug!(session_id = %id, "Evicted least recently used chat session");
        }
    }
}

/// Chat transcripts keyed by session id. Memory only, lost on restart.
///
/// Holds at most `max_sessions` sessions; starting one more drops the least
/// recently used.
pub struct ChatSessionStore {
    sessions: RwLock<Sessions>,
    max_messages: usize,
    max_sessions: usize,
}

impl ChatSessionStore {
    pub fn new(max_messages: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_messages,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Append messages to a session, creating it when `session_id` is unknown
    /// or absent. Returns the id used.
    pub async fn append(&self, session_id: Option<Uuid>, messages: Vec<ChatMessage>) -> Uuid {
        let mut sessions = self.sessions.write().await;
        sessions.clock += 1;
        let now = sessions.clock;

        let id = match session_id {
            Some(id) if sessions.entries.contains_key(&id) => id,
            _ => {
                while sessions.entries.len() >= self.max_sessions {
                    sessions.evict_oldest();
                }
                let session = ChatSession::new(self.max_messages);
                let id = session.id;
                sessions.entries.insert(id, Entry { session, last_touch: now });
                id
            }
        };

        if let Some(entry) = sessions.entries.get_mut(&id) {
            entry.last_touch = now;
            for message in messages {
                entry.session.push(message);
            }
        }
        id
    }

    pub async fn get(&self, session_id: Uuid) -> Option<ChatSession> {
        self.sessions
            .read()
            .await
            .entries
            .get(&session_id)
            .map(|entry| entry.session.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaite_agent::MessageMetadata;

    #[tokio::test]
    async fn test_append_creates_and_caps_sessions() {
        let store = ChatSessionStore::new(3, 100);

        let id = store.append(None, vec![ChatMessage::user("hi")]).await;
        let same = store
            .append(
                Some(id),
                vec![
                    ChatMessage::assistant("hello", MessageMetadata::default()),
                    ChatMessage::user("waves?"),
                    ChatMessage::assistant("sure", MessageMetadata::default()),
                ],
            )
            .await;
        assert_eq!(id, same);

        let session = store.get(id).await.unwrap();
        assert_eq!(session.len(), 3);
        assert_eq!(session.messages().next().unwrap().content, "hello");

        // unknown ids start a fresh session instead of failing
        let other = store.append(Some(Uuid::new_v4()), vec![ChatMessage::user("hey")]).await;
        assert_ne!(other, id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_session_count_is_bounded() {
        let store = ChatSessionStore::new(10, 3);

        let first = store.append(None, vec![ChatMessage::user("one")]).await;
        let second = store.append(None, vec![ChatMessage::user("two")]).await;
        let third = store.append(None, vec![ChatMessage::user("three")]).await;

        // touching `first` makes `second` the oldest
        store.append(Some(first), vec![ChatMessage::user("again")]).await;
        let fourth = store.append(None, vec![ChatMessage::user("four")]).await;

        assert_eq!(store.len().await, 3);
        assert!(store.get(second).await.is_none());
        for id in [first, third, fourth] {
            assert!(store.get(id).await.is_some());
        }

        for _ in 0..500 {
            store.append(None, vec![ChatMessage::user("spam")]).await;
        }
        assert_eq!(store.len().await, 3);
    }
}
