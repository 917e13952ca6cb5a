use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(rename = "access_token")]
    pub access_token: String,
    /// Public id of the logged-in user.
    pub id: String,
}
