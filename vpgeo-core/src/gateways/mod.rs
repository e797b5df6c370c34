pub mod cache;
pub mod geocode;
