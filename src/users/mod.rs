/// Account directory: user rows, their SQL, and the validated operations
/// that are the only way to mutate them.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{NewUser, User, UserUpdate};
