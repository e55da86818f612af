pub mod auth;
pub mod json;
pub mod path;

pub use auth::{AuthMethod, Principal};
pub use json::{ValidJson, ValidJsonOrForm};
pub use path::ValidPath;
