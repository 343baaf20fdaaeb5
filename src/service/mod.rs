pub mod achievement;
pub mod admin;
pub mod auth;
pub mod dialogue;
pub mod event;
pub mod log;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod student;
