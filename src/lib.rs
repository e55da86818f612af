pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use db::Storage;
pub use error::RollcallError;
pub use router::{AppState, rollcall_router};
