pub mod api;
pub mod config;
pub mod domain;
pub mod terminal;
pub mod worker;
