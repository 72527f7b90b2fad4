//! ascii-media library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod ascii;
pub mod batch;
pub mod cli;
pub mod config;
pub mod convert;
pub mod render;
pub mod tools;
pub mod video;
