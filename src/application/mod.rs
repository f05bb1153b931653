pub mod content;
pub mod error;
pub mod mail;
pub mod newsletter;
pub mod repos;
pub mod subscribers;
pub mod templates;
