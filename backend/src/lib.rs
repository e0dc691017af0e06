//! Course aggregate engine for the attendance backend.

pub mod config;
pub mod domain;
pub mod outbound;
