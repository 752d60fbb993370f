pub mod cache;
pub mod connection;
pub mod reports;
pub mod stats;
pub mod tasks;
