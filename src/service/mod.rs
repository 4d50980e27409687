pub mod approval;
pub mod attendance;
pub mod board;
pub mod chat;
pub mod directory;
pub mod leave;
pub mod message;
pub mod notify;
pub mod poller;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testutil {
    use crate::model::role::Role;
    use crate::model::user::{User, UserStatus};
    use crate::store::Store;
    use tempfile::TempDir;

    pub fn test_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    pub fn user(id: &str, name: &str, total_leave: f64) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            role: Role::User,
            status: UserStatus::Active,
            position: String::new(),
            department: String::new(),
            phone: String::new(),
            join_date: None,
            total_leave,
            carryover: 0.0,
            leave_balance: total_leave,
            leave_approver: false,
            password: "1".to_string(),
        }
    }

    pub fn seed_users(store: &Store, users: &[User]) {
        store
            .save(crate::store::collections::USERS, users)
            .unwrap();
    }
}
