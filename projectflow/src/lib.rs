//! `ProjectFlow`: task manager client library.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod state;
pub mod tasks;
pub mod ui;
