pub mod approval;
pub mod attendance;
pub mod chat;
pub mod leave;
pub mod message;
pub mod post;
pub mod role;
pub mod schedule;
pub mod user;
