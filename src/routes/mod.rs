pub mod auth;
pub mod online;
pub mod role_powers;
pub mod users;
