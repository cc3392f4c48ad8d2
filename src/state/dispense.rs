//! Fair question dispensing.
//!
//! The next recipient is always drawn uniformly from the players with the
//! fewest questions so far, so play stays balanced without the
//! predictability of strict round-robin. The no-repeat guarantee comes from
//! consuming the session's pre-shuffled snapshot front-first; all randomness
//! was frontloaded at roster submission.

use rand::Rng;

use super::AppState;
use crate::types::*;

impl GameSession {
    /// Hand the next question to a least-served player. The random source
    /// is injected so tests can drive selection with a seeded rng.
    pub fn dispense_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Dispense, SessionError> {
        if self.phase != SessionPhase::Active || self.players.is_empty() {
            return Err(SessionError::NoActiveSession);
        }

        let Some(question) = self.remaining_questions.pop_front() else {
            return Ok(Dispense::PoolExhausted);
        };

        let min_count = self
            .question_counts
            .values()
            .copied()
            .min()
            .unwrap_or_default();
        let candidates: Vec<&String> = self
            .question_counts
            .iter()
            .filter(|(_, count)| **count == min_count)
            .map(|(player, _)| player)
            .collect();

        // candidates is non-empty whenever players is
        let player = candidates[rng.random_range(0..candidates.len())].clone();

        if let Some(count) = self.question_counts.get_mut(&player) {
            *count += 1;
        }

        Ok(Dispense::Question { player, question })
    }
}

impl AppState {
    /// Dispense the next (player, question) pair for a chat's session
    pub async fn dispense_next(&self, chat_id: ChatId) -> Result<Dispense, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&chat_id).ok_or(SessionError::NoSession)?;
        session.dispense_next(&mut rand::rng())
    }
}
