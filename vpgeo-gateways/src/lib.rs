//! Outer gateways: geocoding HTTP APIs and durable cache storage.

pub mod cache;
pub mod geocoding;
