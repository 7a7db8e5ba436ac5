pub mod admin;
pub mod auth;
pub mod categories;
pub mod chat;
pub mod jobs;
pub mod notifications;
pub mod payments;
pub mod users;
pub mod wallet;
