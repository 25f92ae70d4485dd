pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod schedule;
pub mod storage;
pub mod utils;
