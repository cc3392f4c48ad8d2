//! Inbound event dispatch.
//!
//! The single entry point the transport adapter calls. Each event runs to
//! completion against session state before the next one is handled; the
//! only awaits here are lock acquisitions and the admin-gated source
//! refresh.

use crate::protocol::{InboundEvent, Reply};
use crate::state::AppState;
use crate::types::{Dispense, SessionError};

/// Handle one inbound event and return the reply to present, if any.
/// `None` means stay silent (ignored free text, unauthorized admin calls).
pub async fn handle_event(event: InboundEvent, state: &AppState) -> Option<Reply> {
    match event {
        InboundEvent::Reset { chat_id } => {
            state.reset_session(chat_id).await;
            Some(Reply::Greeting { chat_id })
        }

        InboundEvent::BeginCollecting { chat_id } => match state.begin_collecting(chat_id).await {
            Ok(()) => Some(Reply::PromptForPlayers { chat_id }),
            Err(_) => Some(Reply::NoSession { chat_id }),
        },

        InboundEvent::PlayerListText { chat_id, text } => {
            match state.submit_players(chat_id, &text).await {
                Ok(players) => Some(Reply::RosterConfirmed { chat_id, players }),
                Err(SessionError::EmptyRoster) => Some(Reply::EmptyRosterRetry { chat_id }),
                // Free text outside roster collection is not for us
                Err(_) => None,
            }
        }

        InboundEvent::RequestNextQuestion { chat_id } => {
            match state.dispense_next(chat_id).await {
                Ok(Dispense::Question { player, question }) => Some(Reply::QuestionDispensed {
                    chat_id,
                    player,
                    question,
                }),
                Ok(Dispense::PoolExhausted) => Some(Reply::PoolExhausted { chat_id }),
                Err(_) => Some(Reply::NoSession { chat_id }),
            }
        }

        InboundEvent::AdminRefresh { chat_id, requester } => {
            let outcome = state.admin_refresh(requester).await?;
            Some(Reply::RefreshOutcome {
                chat_id,
                result: outcome.map_err(|e| e.to_string()),
            })
        }

        InboundEvent::ShowInfo { chat_id, topic } => Some(Reply::Info { chat_id, topic }),
    }
}
