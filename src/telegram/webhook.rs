//! Webhook transport: raw Telegram updates in, rendered replies out.
//!
//! Everything here is translation; game semantics live in
//! [`crate::handlers`] and [`crate::state`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{
    ask_question_keyboard, next_question_keyboard, start_keyboard, BotApi, BotApiError, Update,
    CALLBACK_ASK_QUESTION, CALLBACK_START_GAME,
};
use crate::handlers::handle_event;
use crate::protocol::{InboundEvent, InfoTopic, Reply};
use crate::state::AppState;
use crate::tasks::UsageLogger;
use crate::texts;
use crate::types::ChatId;

/// Everything the webhook handler needs, bundled as axum state
pub struct WebhookContext {
    pub app: AppState,
    pub bot: BotApi,
    pub usage: UsageLogger,
    /// Secret path segment; requests without it are not from Telegram
    pub webhook_token: String,
}

/// POST handler for Telegram updates, mounted at `/webhook/{token}`.
/// Always responds 200 to valid-token requests so Telegram doesn't
/// redeliver updates we chose to ignore or failed to act on.
pub async fn telegram_webhook(
    State(ctx): State<Arc<WebhookContext>>,
    Path(token): Path<String>,
    Json(update): Json<Update>,
) -> StatusCode {
    if token != ctx.webhook_token {
        tracing::warn!("webhook call with wrong token path");
        return StatusCode::NOT_FOUND;
    }

    tracing::debug!(update_id = update.update_id, "received update");

    // Always dismiss the button spinner, even when we ignore the event
    if let Some(cb) = &update.callback_query {
        if let Err(e) = ctx.bot.answer_callback_query(&cb.id).await {
            tracing::warn!("failed to answer callback query: {}", e);
        }
    }

    let Some(event) = event_from_update(&update) else {
        return StatusCode::OK;
    };

    // Usage logging is transport-level: the core never sees user identity
    if matches!(event, InboundEvent::Reset { .. }) {
        if let Some(user) = update.message.as_ref().and_then(|m| m.from.as_ref()) {
            ctx.usage.record(user, "start");
        }
    }

    // Refreshes can take a while against the remote sheet, so admins get
    // an immediate status message that is edited into the outcome.
    if let InboundEvent::AdminRefresh { chat_id, requester } = event {
        if !ctx.app.authorize_admin(requester).await {
            return StatusCode::OK;
        }
        run_admin_refresh(&ctx, chat_id).await;
        return StatusCode::OK;
    }

    if let Some(reply) = handle_event(event, &ctx.app).await {
        if let Err(e) = send_reply(&ctx.bot, reply).await {
            tracing::error!("failed to deliver reply: {}", e);
        }
    }

    StatusCode::OK
}

/// Send the interim refresh status, run the refresh, then edit the
/// status message into the result. Falls back to a fresh message if the
/// interim send failed.
async fn run_admin_refresh(ctx: &WebhookContext, chat_id: ChatId) {
    let status_id = match ctx
        .bot
        .send_message(chat_id, texts::REFRESH_STARTED, None)
        .await
    {
        Ok(message_id) => Some(message_id),
        Err(e) => {
            tracing::warn!("failed to send refresh status: {}", e);
            None
        }
    };

    let text = match ctx.app.refresh_question_pool().await {
        Ok(count) => texts::refresh_ok(count),
        Err(e) => texts::refresh_failed(&e.to_string()),
    };

    let delivered = match status_id {
        Some(message_id) => ctx.bot.edit_message_text(chat_id, message_id, &text).await,
        None => ctx.bot.send_message(chat_id, &text, None).await.map(|_| ()),
    };
    if let Err(e) = delivered {
        tracing::error!("failed to deliver refresh outcome: {}", e);
    }
}

/// Strip the `@botname` suffix group chats append to commands
fn command_of(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    first.split('@').next()
}

/// Translate one update into a typed inbound event, if it concerns us
pub fn event_from_update(update: &Update) -> Option<InboundEvent> {
    if let Some(message) = &update.message {
        let chat_id = message.chat.id;
        let text = message.text.as_deref()?;

        return match command_of(text.trim()) {
            Some("/start") => Some(InboundEvent::Reset { chat_id }),
            Some("/rules") => Some(InboundEvent::ShowInfo {
                chat_id,
                topic: InfoTopic::Rules,
            }),
            Some("/about") => Some(InboundEvent::ShowInfo {
                chat_id,
                topic: InfoTopic::About,
            }),
            Some("/cards") => Some(InboundEvent::ShowInfo {
                chat_id,
                topic: InfoTopic::Cards,
            }),
            Some("/donate") => Some(InboundEvent::ShowInfo {
                chat_id,
                topic: InfoTopic::Donate,
            }),
            Some("/update") => Some(InboundEvent::AdminRefresh {
                chat_id,
                requester: message.from.as_ref()?.id,
            }),
            // Unknown commands are not roster input
            Some(_) => None,
            None => Some(InboundEvent::PlayerListText {
                chat_id,
                text: text.to_string(),
            }),
        };
    }

    if let Some(cb) = &update.callback_query {
        let chat_id = cb.message.as_ref()?.chat.id;
        return match cb.data.as_deref() {
            Some(CALLBACK_START_GAME) => Some(InboundEvent::BeginCollecting { chat_id }),
            Some(CALLBACK_ASK_QUESTION) => Some(InboundEvent::RequestNextQuestion { chat_id }),
            _ => None,
        };
    }

    None
}

/// Render a core reply into a Telegram message with the right keyboard
async fn send_reply(bot: &BotApi, reply: Reply) -> Result<(), BotApiError> {
    match reply {
        Reply::Greeting { chat_id } => {
            bot.send_message(chat_id, texts::GREETING, Some(&start_keyboard()))
                .await?;
        }
        Reply::PromptForPlayers { chat_id } => {
            bot.send_message(chat_id, texts::PROMPT_FOR_PLAYERS, None)
                .await?;
        }
        Reply::RosterConfirmed { chat_id, players } => {
            bot.send_message(
                chat_id,
                &texts::roster_confirmed(&players),
                Some(&ask_question_keyboard()),
            )
            .await?;
        }
        Reply::QuestionDispensed {
            chat_id,
            player,
            question,
        } => {
            bot.send_message(
                chat_id,
                &texts::question_for(&player, &question),
                Some(&next_question_keyboard()),
            )
            .await?;
        }
        Reply::PoolExhausted { chat_id } => {
            bot.send_message(chat_id, texts::POOL_EXHAUSTED, Some(&start_keyboard()))
                .await?;
        }
        Reply::EmptyRosterRetry { chat_id } => {
            bot.send_message(chat_id, texts::EMPTY_ROSTER, None).await?;
        }
        Reply::NoSession { chat_id } => {
            bot.send_message(chat_id, texts::NO_SESSION, None).await?;
        }
        Reply::RefreshOutcome { chat_id, result } => {
            let text = match result {
                Ok(count) => texts::refresh_ok(count),
                Err(reason) => texts::refresh_failed(&reason),
            };
            bot.send_message(chat_id, &text, None).await?;
        }
        Reply::Info { chat_id, topic } => {
            bot.send_message(chat_id, texts::info_text(topic), None)
                .await?;
        }
    }
    Ok(())
}
