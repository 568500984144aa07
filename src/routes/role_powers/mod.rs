mod handler;
mod model;

pub use handler::{get_role_powers, update_role_powers};
