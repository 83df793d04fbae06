//! Application service layer - config, charge service, fleet evaluation, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
