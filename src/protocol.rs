//! Typed boundary between the transport adapter and the game core.
//!
//! The Telegram adapter translates raw updates into `InboundEvent` before
//! anything touches session state, and renders `Reply` back into messages.

use crate::types::{ChatId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// /start — create or overwrite the chat's session
    Reset { chat_id: ChatId },
    /// "start game" button — begin collecting the player roster
    BeginCollecting { chat_id: ChatId },
    /// Free text while the session awaits players
    PlayerListText { chat_id: ChatId, text: String },
    /// "ask question" / "next question" button
    RequestNextQuestion { chat_id: ChatId },
    /// /update — admin-only question pool refresh
    AdminRefresh { chat_id: ChatId, requester: UserId },
    /// Static informational commands (/rules, /about, ...)
    ShowInfo { chat_id: ChatId, topic: InfoTopic },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTopic {
    Rules,
    About,
    Cards,
    Donate,
}

/// What the core wants the presentation layer to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Greeting with the "start game" affordance
    Greeting { chat_id: ChatId },
    /// Ask the host to type one player name per line
    PromptForPlayers { chat_id: ChatId },
    /// Roster accepted, game is on
    RosterConfirmed { chat_id: ChatId, players: Vec<String> },
    QuestionDispensed {
        chat_id: ChatId,
        player: String,
        question: String,
    },
    /// End of game: no further dispenses until reset
    PoolExhausted { chat_id: ChatId },
    /// Recoverable: re-prompt for the roster without changing phase
    EmptyRosterRetry { chat_id: ChatId },
    /// Operation needs a session that doesn't exist; user must /start
    NoSession { chat_id: ChatId },
    /// Admin refresh outcome: question count on success, message on failure
    RefreshOutcome {
        chat_id: ChatId,
        result: Result<usize, String>,
    },
    Info { chat_id: ChatId, topic: InfoTopic },
}
