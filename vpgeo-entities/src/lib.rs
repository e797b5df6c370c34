#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # vpgeo-entities
//!
//! Reusable, agnostic domain entities for geocoding.
//!
//! The entities only contain generic functionality that does not reveal any
//! provider specific details. Every geocoding provider is normalized into
//! these types before a result leaves the gateway layer.

pub mod address;
pub mod geo;
pub mod place;
pub mod result;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
