//! Built-in request adapters, one per operation.

pub mod entity;
