use std::collections::{HashMap, VecDeque};

/// Telegram chat identifier (one game session per chat)
pub type ChatId = i64;
/// Telegram user identifier
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Freshly reset, waiting for the host to press "start game"
    Idle,
    /// Waiting for the player roster to be typed in
    AwaitingPlayers,
    /// Roster set, pool snapshotted, questions being handed out
    Active,
}

/// Per-chat game state. Created (or overwritten) on reset, never
/// explicitly destroyed.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub players: Vec<String>,
    /// Pre-shuffled permutation of the question pool, consumed front-first.
    /// Frozen at roster submission; a later pool refresh never touches it.
    pub remaining_questions: VecDeque<String>,
    pub question_counts: HashMap<String, u32>,
    pub phase: SessionPhase,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            remaining_questions: VecDeque::new(),
            question_counts: HashMap::new(),
            phase: SessionPhase::Idle,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a dispense request on an active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispense {
    Question { player: String, question: String },
    /// Terminal signal, not an error: every question has been handed out
    PoolExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no session exists for this chat")]
    NoSession,
    #[error("player roster is empty")]
    EmptyRoster,
    #[error("no active game in this chat")]
    NoActiveSession,
}
