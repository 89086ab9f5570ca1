pub mod analyzer;
pub mod app;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod export;
pub mod storage;
pub mod users;
