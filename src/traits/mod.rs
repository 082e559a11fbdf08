//! Core abstraction traits.

pub mod cache;
