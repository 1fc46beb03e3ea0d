pub mod config;
pub mod discovery;
pub mod release;
pub mod runner;
pub mod updater;
pub mod yaml;
