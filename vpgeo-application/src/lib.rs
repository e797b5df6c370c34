#[macro_use]
extern crate log;

mod chain;
mod policy;
mod service;

pub mod prelude {
    pub use super::{chain::*, policy::*, service::*};
}

pub(crate) use vpgeo_core::prelude::*;
