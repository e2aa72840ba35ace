//! Request extractors used by the built-in adapters.

mod request;
pub use request::{AdapterInput, PAGE_CURSOR};
