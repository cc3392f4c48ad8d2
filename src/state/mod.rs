mod dispense;
mod pool;
mod session;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::sheets::QuestionSource;
use crate::types::*;

/// Shared application state: the explicit context object handed to every
/// handler. Sessions are per-chat; the pool and admin list are process-wide
/// with explicit refresh.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<ChatId, GameSession>>>,
    /// Current question pool; snapshotted into a session at roster submission
    pub question_pool: Arc<RwLock<Vec<String>>>,
    /// Admin allow-list; empty when the last reload failed (fail-closed)
    pub admin_ids: Arc<RwLock<HashSet<String>>>,
    pub source: Arc<dyn QuestionSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            question_pool: Arc::new(RwLock::new(Vec::new())),
            admin_ids: Arc::new(RwLock::new(HashSet::new())),
            source,
        }
    }

    /// Current phase of a chat's session, if one exists
    pub async fn session_phase(&self, chat_id: ChatId) -> Option<SessionPhase> {
        self.sessions.read().await.get(&chat_id).map(|s| s.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::StaticSource;

    fn empty_state() -> AppState {
        AppState::new(Arc::new(StaticSource::new(Vec::new(), HashSet::new())))
    }

    #[tokio::test]
    async fn test_reset_creates_idle_session() {
        let state = empty_state();
        state.reset_session(7).await;

        assert_eq!(state.session_phase(7).await, Some(SessionPhase::Idle));
        let sessions = state.sessions.read().await;
        let session = sessions.get(&7).unwrap();
        assert!(session.players.is_empty());
        assert!(session.remaining_questions.is_empty());
        assert!(session.question_counts.is_empty());
    }

    #[tokio::test]
    async fn test_reset_overwrites_existing_session() {
        let state = empty_state();
        *state.question_pool.write().await = vec!["Q1".to_string()];

        state.reset_session(7).await;
        state.begin_collecting(7).await.unwrap();
        state.submit_players(7, "Alice").await.unwrap();
        assert_eq!(state.session_phase(7).await, Some(SessionPhase::Active));

        state.reset_session(7).await;
        assert_eq!(state.session_phase(7).await, Some(SessionPhase::Idle));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_per_chat() {
        let state = empty_state();
        *state.question_pool.write().await = vec!["Q1".to_string(), "Q2".to_string()];

        state.reset_session(1).await;
        state.begin_collecting(1).await.unwrap();
        state.submit_players(1, "Alice").await.unwrap();

        state.reset_session(2).await;

        assert_eq!(state.session_phase(1).await, Some(SessionPhase::Active));
        assert_eq!(state.session_phase(2).await, Some(SessionPhase::Idle));
    }
}
