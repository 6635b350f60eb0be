//! Shared test utilities

#![allow(dead_code)]

pub mod hosting;

pub use hosting::{MockHosting, check_config};
