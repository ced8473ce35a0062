//! Email and password accounts, and the encrypted cookie that keeps a user
//! logged in between requests.
//!
//! Handlers that touch the ledger receive the logged in user as a
//! [SessionProvider] rather than reading the cookie themselves.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod session;
mod token;
mod user;

pub(crate) use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub(crate) use redirect::normalize_redirect_url;
pub use register_user::{RegistrationState, get_register_page, register_user};
pub use session::{CookieSession, Session, SessionProvider};
pub use user::{User, UserID, create_user, create_user_table, get_user_by_email, get_user_by_id};
