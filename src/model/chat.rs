use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRoom {
    pub id: String,
    pub participants: Vec<String>,
    #[serde(default)]
    pub last_message: String,
    pub last_message_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_sender_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: i64,
    /// User ids that have seen this message; the sender always has.
    pub read_by: Vec<String>,
}
