use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login by user id or email; password is compared as a plain string.
#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub sub: String, // user name
    pub role: Role,
    pub leave_approver: bool,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

/// Persisted refresh-token record, revoked on logout and on rotation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub user_id: String,
    pub jti: String,
    pub expires_at: i64,
    pub revoked: bool,
}
