use crate::error::ServiceError;
use crate::model::message::Message;
use crate::model::role::Role;
use crate::model::user::User;
use crate::store::{Store, collections, now_ms};
use uuid::Uuid;

/// Direct (inbox-style) messages between two users.
#[derive(Clone)]
pub struct MessageService {
    store: Store,
}

impl MessageService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Everything the user sent or received, newest first.
    pub fn list_for(&self, user_id: &str) -> Result<Vec<Message>, ServiceError> {
        let mut messages: Vec<Message> = self.store.load(collections::MESSAGES)?;
        messages.retain(|m| m.receiver_id == user_id || m.sender_id == user_id);
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    /// Unread incoming messages, newest first.
    pub fn unread_for(&self, user_id: &str) -> Result<Vec<Message>, ServiceError> {
        let mut messages: Vec<Message> = self.store.load(collections::MESSAGES)?;
        messages.retain(|m| m.receiver_id == user_id && !m.is_read);
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    pub fn send(
        &self,
        sender: &User,
        receiver_id: &str,
        content: String,
    ) -> Result<Message, ServiceError> {
        let _guard = self.store.guard();
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let receiver = users
            .iter()
            .find(|u| u.id == receiver_id)
            .ok_or_else(|| ServiceError::not_found(format!("receiver {receiver_id}")))?;

        let message = Message {
            id: format!("msg_{}", Uuid::new_v4()),
            sender_id: sender.id.clone(),
            sender_name: sender.name.clone(),
            receiver_id: receiver.id.clone(),
            receiver_name: receiver.name.clone(),
            content,
            timestamp: now_ms(),
            is_read: false,
        };

        let mut messages: Vec<Message> = self.store.load(collections::MESSAGES)?;
        messages.push(message.clone());
        self.store.save(collections::MESSAGES, &messages)?;
        Ok(message)
    }

    /// Only the receiver (or an admin) may mark a message read.
    pub fn mark_read(&self, message_id: &str, actor: &User) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut messages: Vec<Message> = self.store.load(collections::MESSAGES)?;
        let message = messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ServiceError::not_found(format!("message {message_id}")))?;
        if message.receiver_id != actor.id && actor.role != Role::Admin {
            return Err(ServiceError::forbidden(
                "only the receiver may mark a message read",
            ));
        }
        message.is_read = true;
        self.store.save(collections::MESSAGES, &messages)?;
        Ok(())
    }

    /// Sender, receiver or an admin.
    pub fn delete(&self, message_id: &str, actor: &User) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut messages: Vec<Message> = self.store.load(collections::MESSAGES)?;
        let message = messages
            .iter()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ServiceError::not_found(format!("message {message_id}")))?;
        if message.sender_id != actor.id
            && message.receiver_id != actor.id
            && actor.role != Role::Admin
        {
            return Err(ServiceError::forbidden(
                "only the sender or receiver may delete a message",
            ));
        }
        messages.retain(|m| m.id != message_id);
        self.store.save(collections::MESSAGES, &messages)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_users, test_store, user};

    #[test]
    fn send_denormalizes_names_and_starts_unread() {
        let (_dir, store) = test_store();
        let service = MessageService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        let bob = user("b", "Bob", 15.0);
        seed_users(&store, &[alice.clone(), bob.clone()]);

        let msg = service.send(&alice, "b", "hi".into()).unwrap();
        assert_eq!(msg.receiver_name, "Bob");
        assert!(!msg.is_read);

        assert_eq!(service.unread_for("b").unwrap().len(), 1);
        service.mark_read(&msg.id, &bob).unwrap();
        assert!(service.unread_for("b").unwrap().is_empty());
    }

    #[test]
    fn mark_read_and_delete_enforce_ownership() {
        let (_dir, store) = test_store();
        let service = MessageService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        let bob = user("b", "Bob", 15.0);
        let carol = user("c", "Carol", 15.0);
        let mut admin = user("root", "Root", 15.0);
        admin.role = crate::model::role::Role::Admin;
        seed_users(
            &store,
            &[alice.clone(), bob.clone(), carol.clone(), admin.clone()],
        );

        let msg = service.send(&alice, "b", "hi".into()).unwrap();

        // Neither the sender nor a bystander may mark it read
        assert!(matches!(
            service.mark_read(&msg.id, &alice),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            service.mark_read(&msg.id, &carol),
            Err(ServiceError::Forbidden(_))
        ));
        service.mark_read(&msg.id, &bob).unwrap();

        // A bystander may not delete it; the sender may
        assert!(matches!(
            service.delete(&msg.id, &carol),
            Err(ServiceError::Forbidden(_))
        ));
        service.delete(&msg.id, &alice).unwrap();

        // Admins may act on anyone's messages
        let msg = service.send(&alice, "b", "again".into()).unwrap();
        service.mark_read(&msg.id, &admin).unwrap();
        service.delete(&msg.id, &admin).unwrap();
        assert!(service.list_for("b").unwrap().is_empty());
    }

    #[test]
    fn unknown_receiver_is_not_found() {
        let (_dir, store) = test_store();
        let service = MessageService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        seed_users(&store, &[alice.clone()]);

        assert!(matches!(
            service.send(&alice, "ghost", "hi".into()),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn list_covers_both_directions() {
        let (_dir, store) = test_store();
        let service = MessageService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        let bob = user("b", "Bob", 15.0);
        seed_users(&store, &[alice.clone(), bob.clone()]);

        service.send(&alice, "b", "hi".into()).unwrap();
        service.send(&bob, "a", "hello".into()).unwrap();

        assert_eq!(service.list_for("a").unwrap().len(), 2);
        assert_eq!(service.list_for("b").unwrap().len(), 2);
    }
}
