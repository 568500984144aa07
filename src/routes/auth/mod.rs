mod handler;
mod model;

pub use handler::{get_user_info, login, login_mini_program, logout};
