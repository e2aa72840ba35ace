pub mod types;
pub mod resolver;
pub mod validator;
pub mod resolved;

pub use types::*;
pub use resolver::*;
pub use validator::*;
pub use resolved::*;
