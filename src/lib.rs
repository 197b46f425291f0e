// Crate root library declaration and module exports.
pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod controller;
pub mod logging;
pub mod model;
pub mod report;
pub mod source;
pub mod storage;
