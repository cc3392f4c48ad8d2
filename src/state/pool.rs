use super::AppState;
use crate::sheets::SourceResult;
use crate::types::UserId;

impl AppState {
    /// Re-fetch the question list and atomically swap the process-wide pool.
    /// On failure the previous pool stays in place and the error surfaces to
    /// the caller. Active sessions are never touched; they run on their own
    /// snapshot.
    pub async fn refresh_question_pool(&self) -> SourceResult<usize> {
        let questions = self.source.fetch_questions().await?;
        let count = questions.len();
        *self.question_pool.write().await = questions;
        tracing::info!(count, "question pool refreshed");
        Ok(count)
    }

    /// Re-fetch the admin allow-list. A fetch failure empties the list so a
    /// broken source can never widen access.
    pub async fn reload_admin_ids(&self) {
        match self.source.fetch_admin_ids().await {
            Ok(ids) => {
                tracing::debug!(count = ids.len(), "admin allow-list reloaded");
                *self.admin_ids.write().await = ids;
            }
            Err(e) => {
                tracing::error!("failed to load admin allow-list, denying all: {}", e);
                self.admin_ids.write().await.clear();
            }
        }
    }

    pub async fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_ids.read().await.contains(&user_id.to_string())
    }

    /// Authorize an admin-only request. The allow-list is reloaded first so
    /// revocations take effect immediately; refusals log but produce no
    /// user-visible response (the command is deliberately undiscoverable).
    pub async fn authorize_admin(&self, requester: UserId) -> bool {
        self.reload_admin_ids().await;

        if !self.is_admin(requester).await {
            tracing::warn!(user_id = requester, "admin command by non-admin ignored");
            return false;
        }
        true
    }

    /// Admin-gated refresh: `None` for unauthorized callers
    pub async fn admin_refresh(&self, requester: UserId) -> Option<SourceResult<usize>> {
        if !self.authorize_admin(requester).await {
            return None;
        }

        Some(self.refresh_question_pool().await)
    }
}
