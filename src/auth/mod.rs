//! Authentication module.
//!
//! Password hashing for account registration and login.

mod password;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
