// Command handlers module
pub mod config;
pub mod control;
pub mod info;
pub mod monitor;
pub mod ps;
