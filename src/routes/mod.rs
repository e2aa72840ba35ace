//! Route registration: operation entries, per-resource routers, and the API builder.

mod builder;
mod entity;
mod table;

pub use builder::ApiBuilder;
pub use entity::{plan_routes, ResourceApi, RouteEntry, Step};
