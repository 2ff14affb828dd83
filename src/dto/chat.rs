use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ChatMessage;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncomingMessage {
    pub user: String,
    pub message: String,
}

/// Events pushed to connected clients.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    MessageLog(Vec<ChatMessage>),
}

/// Events accepted from clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Message(IncomingMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn message_log_event_shape() {
        let event = ServerEvent::MessageLog(vec![ChatMessage {
            id: Uuid::nil(),
            user: "ana".into(),
            message: "hola".into(),
            created_at: Utc::now(),
        }]);
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["event"], "messageLog");
        assert_eq!(value["data"][0]["user"], "ana");
        assert_eq!(value["data"][0]["message"], "hola");
    }

    #[test]
    fn client_message_event_parses() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"message","data":{"user":"ana","message":"hola"}}"#,
        )
        .expect("parse");
        let ClientEvent::Message(incoming) = event;
        assert_eq!(incoming.user, "ana");
        assert_eq!(incoming.message, "hola");
    }
}
