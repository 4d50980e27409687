pub mod approval;
pub mod attendance;
pub mod board;
pub mod chat;
pub mod leave;
pub mod message;
pub mod notify;
pub mod schedule;
pub mod users;
