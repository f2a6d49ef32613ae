/// Data models
pub mod config;
pub mod mail;
pub mod submission;

pub use config::*;
pub use mail::*;
pub use submission::*;
