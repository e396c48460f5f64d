pub mod application;
pub mod client;
