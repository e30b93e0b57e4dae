/// Authentication and session management.
///
/// Token minting/verification, password hashing, the refresh-token store,
/// the session rotation engine, and the auth cookie builders.

pub mod claims;
pub mod cookies;
pub mod jwt;
pub mod password;
pub mod session;
pub mod token_store;

pub use claims::{Claims, TokenKind};
pub use jwt::{
    generate_access_token, generate_refresh_token, verify_access_token, verify_refresh_token,
};
pub use password::{hash_password, verify_password};
pub use session::{clean_up_old_tokens, log_in, log_out, refresh, LoginOutcome, TokenPair};
