pub mod auth;
pub mod config;
pub mod error;
pub mod mbti;
pub mod module;
pub mod types;

pub use auth::{bearer_token, require_user, Authenticator, CurrentUser, DenyAll, FixedUser};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use mbti::{MbtiType, UnknownMbtiType};
pub use module::Module;
pub use types::{new_id, now_rfc3339, ListResult};
