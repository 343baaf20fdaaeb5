use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use log::debug;

use super::dialogue::Dialogue;

struct Session {
    dialogue: Dialogue,
    touched: Instant,
}

/// `(chat_id, user_id)`: in a group chat every member has a dialogue of their own.
pub type SessionKey = (i64, i64);

#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Active(Dialogue),
    Expired,
    Empty,
}

/// Active dialogues, at most one per user in a chat.
/// Sessions idle for longer than `ttl` are dropped.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionKey, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores `dialogue` under `key`, returning whatever it replaced.
    pub fn put(&self, key: SessionKey, dialogue: Dialogue) -> Option<Dialogue> {
        self.put_at(key, dialogue, Instant::now())
    }

    fn put_at(&self, key: SessionKey, dialogue: Dialogue, now: Instant) -> Option<Dialogue> {
        let replaced = self
            .lock()
            .insert(key, Session { dialogue, touched: now })
            .map(|s| s.dialogue);
        if let Some(old) = &replaced {
            debug!("session {:?}: {} dialogue replaced", key, old.name());
        }
        replaced
    }

    /// Removes and returns the dialogue for the next step.
    pub fn take(&self, key: SessionKey) -> Lookup {
        self.take_at(key, Instant::now())
    }

    fn take_at(&self, key: SessionKey, now: Instant) -> Lookup {
        match self.lock().remove(&key) {
            Some(session) if now.duration_since(session.touched) > self.ttl => {
                debug!("session {:?}: {} dialogue expired", key, session.dialogue.name());
                Lookup::Expired
            }
            Some(session) => Lookup::Active(session.dialogue),
            None => Lookup::Empty,
        }
    }

    pub fn cancel(&self, key: SessionKey) -> Option<Dialogue> {
        self.lock().remove(&key).map(|s| s.dialogue)
    }

    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    fn evict_expired_at(&self, now: Instant) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.touched) <= self.ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn one_dialogue_per_user() {
        let sessions = SessionStore::new(TTL);
        assert_eq!(sessions.put((1, 1), Dialogue::register().0), None);
        let replaced = sessions.put((1, 1), Dialogue::report_event().0);
        assert_eq!(replaced, Some(Dialogue::register().0));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.take((1, 1)), Lookup::Active(Dialogue::report_event().0));
        assert_eq!(sessions.take((1, 1)), Lookup::Empty);
    }

    #[test]
    fn group_members_do_not_share_a_dialogue() {
        let sessions = SessionStore::new(TTL);
        sessions.put((-100, 7), Dialogue::register().0);
        assert_eq!(sessions.take((-100, 8)), Lookup::Empty);
        assert_eq!(sessions.take((-100, 7)), Lookup::Active(Dialogue::register().0));
    }

    #[test]
    fn idle_sessions_expire() {
        let sessions = SessionStore::new(TTL);
        let start = Instant::now();
        sessions.put_at((1, 1), Dialogue::register().0, start);
        sessions.put_at((2, 2), Dialogue::register().0, start + Duration::from_secs(50));

        assert_eq!(sessions.take_at((1, 1), start + Duration::from_secs(61)), Lookup::Expired);
        assert_eq!(sessions.evict_expired_at(start + Duration::from_secs(200)), 1);
        assert!(sessions.is_empty());
    }

    #[test]
    fn cancel_drops_the_dialogue() {
        let sessions = SessionStore::new(TTL);
        sessions.put((5, 5), Dialogue::achievement("e".into()).0);
        assert!(sessions.cancel((5, 5)).is_some());
        assert!(sessions.cancel((5, 5)).is_none());
    }
}
