pub mod attendance;
pub mod auth;
pub mod grades;
pub mod roster;
