use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::chat::{IncomingMessage, ServerEvent},
    entity::chat_messages::{ActiveModel, Column, Entity as ChatMessages, Model as ChatMessageModel},
    error::{AppError, AppResult},
    models::ChatMessage,
    state::AppState,
};
use chrono::Utc;

/// Full ordered history, oldest first.
pub async fn message_log(state: &AppState) -> AppResult<Vec<ChatMessage>> {
    let rows = ChatMessages::find()
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?;
    Ok(rows.into_iter().map(message_from_entity).collect())
}

pub async fn append_message(
    state: &AppState,
    incoming: IncomingMessage,
) -> AppResult<ChatMessage> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(incoming.user),
        message: Set(incoming.message),
        created_at: NotSet,
    };
    let row = active.insert(&state.orm).await?;
    Ok(message_from_entity(row))
}

/// Append a message, then push the refreshed log to every connected client.
pub async fn append_and_broadcast(state: &AppState, incoming: IncomingMessage) -> AppResult<()> {
    append_message(state, incoming).await?;
    let log = message_log(state).await?;
    let event = serde_json::to_string(&ServerEvent::MessageLog(log))
        .map_err(|e| AppError::Internal(e.into()))?;
    // Send only errors when nobody is subscribed, which is fine.
    let _ = state.chat_tx.send(event);
    Ok(())
}

fn message_from_entity(model: ChatMessageModel) -> ChatMessage {
    ChatMessage {
        id: model.id,
        user: model.username,
        message: model.message,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
