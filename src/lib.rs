pub mod app;
pub mod auth;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod days;
pub mod error;
pub mod groceries;
pub mod ids;
pub mod meals;
pub mod state;
pub mod storage;
