use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RolePowersQuery {
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RolePowersUpdateRequest {
    pub role_id: String,
    pub power_ids: Vec<String>,
}
