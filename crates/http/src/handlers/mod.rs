pub mod analysis;
pub mod auth;
pub mod chat;
pub mod strategy;
