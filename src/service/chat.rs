use crate::error::ServiceError;
use crate::model::chat::{ChatMessage, ChatRoom};
use crate::store::{Store, collections, now_ms};
use uuid::Uuid;

/// 1:1 chat rooms with last-message denormalization on the room record.
#[derive(Clone)]
pub struct ChatService {
    store: Store,
}

impl ChatService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn rooms_for(&self, user_id: &str) -> Result<Vec<ChatRoom>, ServiceError> {
        let mut rooms: Vec<ChatRoom> = self.store.load(collections::CHAT_ROOMS)?;
        rooms.retain(|r| r.participants.iter().any(|p| p == user_id));
        rooms.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        Ok(rooms)
    }

    /// Reuse the existing two-party room if there is one.
    pub fn start(&self, my_id: &str, other_id: &str) -> Result<ChatRoom, ServiceError> {
        let _guard = self.store.guard();
        let mut rooms: Vec<ChatRoom> = self.store.load(collections::CHAT_ROOMS)?;

        if let Some(room) = rooms.iter().find(|r| {
            r.participants.len() == 2
                && r.participants.iter().any(|p| p == my_id)
                && r.participants.iter().any(|p| p == other_id)
        }) {
            return Ok(room.clone());
        }

        let room = ChatRoom {
            id: format!("room_{}", Uuid::new_v4()),
            participants: vec![my_id.to_string(), other_id.to_string()],
            last_message: String::new(),
            last_message_time: now_ms(),
            last_message_sender_id: None,
        };
        rooms.push(room.clone());
        self.store.save(collections::CHAT_ROOMS, &rooms)?;
        Ok(room)
    }

    /// Oldest first, for rendering top-down.
    pub fn messages(&self, room_id: &str) -> Result<Vec<ChatMessage>, ServiceError> {
        let mut messages: Vec<ChatMessage> = self.store.load(collections::CHAT_MESSAGES)?;
        messages.retain(|m| m.room_id == room_id);
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(messages)
    }

    pub fn send(
        &self,
        room_id: &str,
        sender_id: &str,
        content: String,
    ) -> Result<ChatMessage, ServiceError> {
        let _guard = self.store.guard();
        let mut rooms: Vec<ChatRoom> = self.store.load(collections::CHAT_ROOMS)?;
        let room = rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| ServiceError::not_found(format!("chat room {room_id}")))?;

        let message = ChatMessage {
            id: format!("msg_{}", Uuid::new_v4()),
            room_id: room_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.clone(),
            timestamp: now_ms(),
            read_by: vec![sender_id.to_string()],
        };

        let mut messages: Vec<ChatMessage> = self.store.load(collections::CHAT_MESSAGES)?;
        messages.push(message.clone());
        self.store.save(collections::CHAT_MESSAGES, &messages)?;

        room.last_message = content;
        room.last_message_time = message.timestamp;
        room.last_message_sender_id = Some(sender_id.to_string());
        self.store.save(collections::CHAT_ROOMS, &rooms)?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::test_store;

    #[test]
    fn start_reuses_existing_two_party_room() {
        let (_dir, store) = test_store();
        let chat = ChatService::new(store);

        let room1 = chat.start("a", "b").unwrap();
        let room2 = chat.start("b", "a").unwrap();
        assert_eq!(room1.id, room2.id);

        let room3 = chat.start("a", "c").unwrap();
        assert_ne!(room1.id, room3.id);
    }

    #[test]
    fn send_updates_room_denormalization() {
        let (_dir, store) = test_store();
        let chat = ChatService::new(store);

        let room = chat.start("a", "b").unwrap();
        chat.send(&room.id, "a", "hello".into()).unwrap();
        let msg = chat.send(&room.id, "b", "hi there".into()).unwrap();

        let rooms = chat.rooms_for("a").unwrap();
        assert_eq!(rooms[0].last_message, "hi there");
        assert_eq!(rooms[0].last_message_sender_id.as_deref(), Some("b"));
        assert_eq!(rooms[0].last_message_time, msg.timestamp);

        let messages = chat.messages(&room.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].read_by, vec!["b"]);
    }

    #[test]
    fn sending_to_a_missing_room_errors() {
        let (_dir, store) = test_store();
        let chat = ChatService::new(store);
        assert!(matches!(
            chat.send("ghost", "a", "x".into()),
            Err(ServiceError::NotFound(_))
        ));
    }
}
