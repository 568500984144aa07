use serde::Deserialize;

use crate::database::UserProfileUpdate;

#[derive(Debug, Deserialize)]
pub struct UsersUpdateRequest {
    pub user_id: String,
    pub user_name: String,
    pub nick_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remark: Option<String>,
    pub enabled: bool,
    pub one_session: bool,
}

impl UsersUpdateRequest {
    pub fn into_update(self) -> UserProfileUpdate {
        UserProfileUpdate {
            user_id: self.user_id,
            user_name: self.user_name,
            nick_name: self.nick_name,
            email: self.email,
            phone: self.phone,
            remark: self.remark,
            enabled: self.enabled,
            one_session: self.one_session,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersDeleteRequest {
    pub user_id: String,
}
