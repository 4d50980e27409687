use crate::error::ServiceError;
use crate::model::user::User;
use crate::store::{Store, collections};

/// Source of truth for user identity and leave-entitlement fields. All
/// writes persist the whole users collection back, not a diff.
#[derive(Clone)]
pub struct DirectoryService {
    store: Store,
}

impl DirectoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        // Stable storage order, no further guarantee
        self.store.load(collections::USERS)
    }

    pub fn find(&self, id: &str) -> Result<User, ServiceError> {
        let users: Vec<User> = self.store.load(collections::USERS)?;
        users
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("user {id}")))
    }

    /// Used by login: locate by id or email, then compare the password as a
    /// plain string. Equality comparison is a behavioral contract carried
    /// over from the system this replaces; see DESIGN.md.
    pub fn authenticate(
        &self,
        user_id: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, ServiceError> {
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let user = users
            .into_iter()
            .find(|u| {
                user_id.is_some_and(|id| u.id == id) || email.is_some_and(|e| u.email == e)
            })
            .ok_or_else(|| ServiceError::forbidden("Invalid credentials"))?;

        if user.password != password {
            return Err(ServiceError::forbidden("Invalid credentials"));
        }
        Ok(user)
    }

    pub fn create_user(&self, user: User) -> Result<User, ServiceError> {
        let _guard = self.store.guard();
        let mut users: Vec<User> = self.store.load(collections::USERS)?;
        if users.iter().any(|u| u.id == user.id) {
            return Err(ServiceError::DuplicateId(format!("user {}", user.id)));
        }
        users.push(user.clone());
        self.store.save(collections::USERS, &users)?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Removes the user record only. Requests and approvals referencing the
    /// id keep their denormalized names for history; no orphan cleanup.
    pub fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut users: Vec<User> = self.store.load(collections::USERS)?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(ServiceError::not_found(format!("user {id}")));
        }
        self.store.save(collections::USERS, &users)?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub fn set_password(&self, id: &str, new_password: &str) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut users: Vec<User> = self.store.load(collections::USERS)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("user {id}")))?;
        user.password = new_password.to_string();
        self.store.save(collections::USERS, &users)?;
        Ok(())
    }

    pub fn bulk_set_password(&self, new_password: &str) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut users: Vec<User> = self.store.load(collections::USERS)?;
        for user in users.iter_mut() {
            user.password = new_password.to_string();
        }
        self.store.save(collections::USERS, &users)?;
        tracing::info!("all passwords reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_users, test_store, user};

    #[test]
    fn create_rejects_duplicate_id() {
        let (_dir, store) = test_store();
        let dir = DirectoryService::new(store);

        dir.create_user(user("1", "Alice", 15.0)).unwrap();
        let err = dir.create_user(user("1", "Impostor", 10.0)).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateId(_)));
        assert_eq!(dir.list_users().unwrap().len(), 1);
    }

    #[test]
    fn authenticate_compares_plain_password() {
        let (_dir, store) = test_store();
        let dir = DirectoryService::new(store.clone());
        seed_users(&store, &[user("1", "Alice", 15.0)]);

        assert!(dir.authenticate(Some("1"), None, "1").is_ok());
        assert!(dir.authenticate(None, Some("1@example.com"), "1").is_ok());
        assert!(matches!(
            dir.authenticate(Some("1"), None, "wrong"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            dir.authenticate(Some("2"), None, "1"),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn password_ops_overwrite_in_place() {
        let (_dir, store) = test_store();
        let dir = DirectoryService::new(store.clone());
        seed_users(&store, &[user("1", "Alice", 15.0), user("2", "Bob", 15.0)]);

        dir.set_password("1", "secret").unwrap();
        assert_eq!(dir.find("1").unwrap().password, "secret");
        assert_eq!(dir.find("2").unwrap().password, "1");

        dir.bulk_set_password("reset").unwrap();
        assert_eq!(dir.find("1").unwrap().password, "reset");
        assert_eq!(dir.find("2").unwrap().password, "reset");
    }

    #[test]
    fn delete_unknown_user_is_not_found() {
        let (_dir, store) = test_store();
        let dir = DirectoryService::new(store);
        assert!(matches!(
            dir.delete_user("ghost"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
