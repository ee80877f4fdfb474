// src/models/account.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Só estes campos do perfil podem ser alterados pelo próprio usuário.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub empresa: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordPayload {
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordChangedResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}
