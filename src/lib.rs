pub mod cli;
pub mod config;
pub mod controller;
pub mod tasks;

pub use controller::Controller;
pub use tasks::Task;
