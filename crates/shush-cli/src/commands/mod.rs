pub mod config;
pub mod dial;
pub mod radio;
pub mod session;
