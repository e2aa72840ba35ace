//! Datastore API: CRUD routes generated from a model and declarative settings.
//!
//! ```ignore
//! let mut api = ApiBuilder::new(ApiSettings::new().contexts("", "/private"));
//! api.create(Arc::new(users), Settings::new().path("/users"))?;
//! let app: axum::Router = api.into_router();
//! ```

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod operation;
pub mod paths;
pub mod response;
pub mod routes;
pub mod state;

pub use config::{resolve, ApiSettings, OperationBinding, OperationOptions, OperationSettings, ResolvedConfig, Segments, Settings};
pub use error::{AppError, ConfigError, DataAccessError, ErrorCode};
pub use middleware::{DecodedBody, FileUpload, Handler, Middleware};
pub use model::{Ancestors, DataAccess, DeleteResult, Entity, ListCriteria, ListResult, PlainOptions, QueryDefaults, UpdateOptions};
pub use operation::{Context, Operation};
pub use paths::{ancestors_from_params, build_paths};
pub use routes::{plan_routes, ApiBuilder, ResourceApi, RouteEntry, Step};
pub use state::ResourceState;
