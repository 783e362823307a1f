pub mod artifacts;
pub mod cli;
pub mod compare;
pub mod error;
pub mod exec;
pub mod report;
pub mod service;
pub mod settings;
pub mod store;
pub mod tools;
