//! Access-key authentication with an encrypted session cookie.
//!
//! The owner logs in with a single access key. A successful log-in stores a
//! [Token] in a private cookie, and [auth_guard] rejects requests without a
//! valid, unexpired token.

mod access_key;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod token;

pub use access_key::{
    AccessKeyHash, ValidatedAccessKey, create_access_key_table, get_access_key_hash,
    set_access_key,
};
pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::post_log_in;
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
