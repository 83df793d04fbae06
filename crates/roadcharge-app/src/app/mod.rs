//! Application use cases

mod charge_service;

pub use charge_service::ChargeService;
