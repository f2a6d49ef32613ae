/// API endpoint modules
pub mod contact;
