use rand::seq::SliceRandom;

use super::AppState;
use crate::types::*;

/// Parse a raw player-list message: one name per line, trimmed, blanks dropped
fn parse_roster(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppState {
    /// Create a fresh idle session for the chat, overwriting any prior one
    pub async fn reset_session(&self, chat_id: ChatId) {
        self.sessions
            .write()
            .await
            .insert(chat_id, GameSession::new());
    }

    /// Move the chat's session into roster collection. Clears any previous
    /// roster so an awaiting session never carries players.
    pub async fn begin_collecting(&self, chat_id: ChatId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&chat_id).ok_or(SessionError::NoSession)?;

        *session = GameSession {
            phase: SessionPhase::AwaitingPlayers,
            ..GameSession::new()
        };
        Ok(())
    }

    /// Accept the player roster and activate the session: snapshot the
    /// current pool as a fresh permutation, zero all counts. This is the
    /// only place a session picks up the question pool.
    pub async fn submit_players(
        &self,
        chat_id: ChatId,
        raw_text: &str,
    ) -> Result<Vec<String>, SessionError> {
        // A session must be collecting before the text counts as a roster
        // at all; only then is a blank submission a retryable error.
        {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&chat_id).ok_or(SessionError::NoSession)?;
            if session.phase != SessionPhase::AwaitingPlayers {
                return Err(SessionError::NoSession);
            }
        }

        let players = parse_roster(raw_text);
        if players.is_empty() {
            // Leave the session awaiting so the user can retry in place
            return Err(SessionError::EmptyRoster);
        }

        // Snapshot the pool before taking the session lock; the clone is
        // what freezes this session against later refreshes.
        let mut questions: Vec<String> = self.question_pool.read().await.clone();
        questions.shuffle(&mut rand::rng());

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&chat_id).ok_or(SessionError::NoSession)?;
        if session.phase != SessionPhase::AwaitingPlayers {
            return Err(SessionError::NoSession);
        }

        session.question_counts = players.iter().map(|p| (p.clone(), 0)).collect();
        session.players = players.clone();
        session.remaining_questions = questions.into();
        session.phase = SessionPhase::Active;

        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::sheets::StaticSource;

    fn state_with_pool(questions: &[&str]) -> AppState {
        AppState::new(Arc::new(StaticSource::new(
            questions.iter().map(|q| q.to_string()).collect(),
            HashSet::new(),
        )))
    }

    async fn seeded(questions: &[&str]) -> AppState {
        let state = state_with_pool(questions);
        state.refresh_question_pool().await.unwrap();
        state
    }

    #[test]
    fn test_parse_roster_trims_and_drops_blank_lines() {
        assert_eq!(parse_roster("Alice\n\nBob\n "), vec!["Alice", "Bob"]);
        assert_eq!(parse_roster("  Carol  "), vec!["Carol"]);
        assert!(parse_roster("   \n").is_empty());
        assert!(parse_roster("").is_empty());
    }

    #[tokio::test]
    async fn test_begin_collecting_requires_session() {
        let state = state_with_pool(&[]);
        assert_eq!(
            state.begin_collecting(1).await,
            Err(SessionError::NoSession)
        );
    }

    #[tokio::test]
    async fn test_begin_collecting_clears_previous_roster() {
        let state = seeded(&["Q1", "Q2"]).await;
        state.reset_session(1).await;
        state.begin_collecting(1).await.unwrap();
        state.submit_players(1, "Alice\nBob").await.unwrap();

        state.begin_collecting(1).await.unwrap();

        let sessions = state.sessions.read().await;
        let session = sessions.get(&1).unwrap();
        assert_eq!(session.phase, SessionPhase::AwaitingPlayers);
        assert!(session.players.is_empty());
        assert!(session.question_counts.is_empty());
    }

    #[tokio::test]
    async fn test_submit_players_initializes_counts_and_snapshot() {
        let state = seeded(&["Q1", "Q2", "Q3"]).await;
        state.reset_session(1).await;
        state.begin_collecting(1).await.unwrap();

        let players = state
            .submit_players(1, "Alice\n\nBob\n ")
            .await
            .unwrap();
        assert_eq!(players, vec!["Alice", "Bob"]);

        let sessions = state.sessions.read().await;
        let session = sessions.get(&1).unwrap();
        assert_eq!(session.phase, SessionPhase::Active);
        assert_eq!(session.players, vec!["Alice", "Bob"]);
        assert_eq!(session.question_counts.len(), 2);
        assert!(session.question_counts.values().all(|&c| c == 0));
        assert_eq!(session.remaining_questions.len(), 3);

        // Same questions, order aside
        let mut snapshot: Vec<_> = session.remaining_questions.iter().cloned().collect();
        snapshot.sort();
        assert_eq!(snapshot, vec!["Q1", "Q2", "Q3"]);
    }

    #[tokio::test]
    async fn test_submit_players_empty_roster_keeps_awaiting() {
        let state = seeded(&["Q1"]).await;
        state.reset_session(1).await;
        state.begin_collecting(1).await.unwrap();

        assert_eq!(
            state.submit_players(1, "   \n").await,
            Err(SessionError::EmptyRoster)
        );
        assert_eq!(
            state.session_phase(1).await,
            Some(SessionPhase::AwaitingPlayers)
        );
    }

    #[tokio::test]
    async fn test_submit_players_requires_collecting_session() {
        let state = seeded(&["Q1"]).await;
        assert_eq!(
            state.submit_players(1, "Alice").await,
            Err(SessionError::NoSession)
        );

        // An idle session isn't collecting either
        state.reset_session(1).await;
        assert_eq!(
            state.submit_players(1, "Alice").await,
            Err(SessionError::NoSession)
        );
    }

    #[tokio::test]
    async fn test_blank_text_outside_collection_is_not_a_roster_error() {
        let state = seeded(&["Q1"]).await;

        // No session at all: blank text is not an empty-roster retry
        assert_eq!(
            state.submit_players(9, "   \n").await,
            Err(SessionError::NoSession)
        );

        // Active session: same, the game is already running
        state.reset_session(9).await;
        state.begin_collecting(9).await.unwrap();
        state.submit_players(9, "Alice").await.unwrap();
        assert_eq!(
            state.submit_players(9, "   \n").await,
            Err(SessionError::NoSession)
        );
    }

    #[tokio::test]
    async fn test_pool_refresh_does_not_touch_active_session() {
        let state = seeded(&["Q1", "Q2"]).await;
        state.reset_session(1).await;
        state.begin_collecting(1).await.unwrap();
        state.submit_players(1, "Alice").await.unwrap();

        // A pool replacement after activation must not leak into the session
        *state.question_pool.write().await = vec!["X".to_string()];

        let sessions = state.sessions.read().await;
        let session = sessions.get(&1).unwrap();
        assert_eq!(session.remaining_questions.len(), 2);
        assert!(!session.remaining_questions.contains(&"X".to_string()));
    }
}
