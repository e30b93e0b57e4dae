pub mod auth;
pub mod health_check;
pub mod users;

pub use auth::{login, logout, refresh};
pub use health_check::health_check;
pub use users::{
    create_user, current_user, list_users, update_current_user, update_current_user_password,
};
