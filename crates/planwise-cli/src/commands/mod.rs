pub mod config;
pub mod habits;
pub mod schedule;
