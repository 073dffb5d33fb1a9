//! User accounts and cookie based authentication for the admin interface.

pub mod cookie;
mod log_in;
mod log_out;
mod middleware;
pub mod password;
mod register;
mod token;
pub mod user;

pub use cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use log_in::{LogInState, get_log_in_page, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{RegistrationState, get_register_page, post_register};
pub use token::Token;
pub use user::{User, UserID, create_user, get_user_by_id, require_admin};
