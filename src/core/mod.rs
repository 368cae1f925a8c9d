pub mod config;
pub mod conversation;
pub mod message;
pub mod modes;
pub mod projection;
