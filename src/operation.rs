//! Operation table: the seven logical operations, their verbs, and their defaults.

use axum::http::Method;
use axum::routing::MethodFilter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path-prefix group an operation belongs to by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Context {
    Public,
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    List,
    Get,
    Create,
    UpdatePatch,
    UpdateReplace,
    Delete,
    DeleteAll,
}

impl Operation {
    /// Canonical registration order.
    pub const ALL: [Operation; 7] = [
        Operation::List,
        Operation::Get,
        Operation::Create,
        Operation::UpdatePatch,
        Operation::UpdateReplace,
        Operation::Delete,
        Operation::DeleteAll,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::UpdatePatch => "updatePatch",
            Operation::UpdateReplace => "updateReplace",
            Operation::Delete => "delete",
            Operation::DeleteAll => "deleteAll",
        }
    }

    /// Position in [`Operation::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn method(self) -> Method {
        match self {
            Operation::List | Operation::Get => Method::GET,
            Operation::Create => Method::POST,
            Operation::UpdatePatch => Method::PATCH,
            Operation::UpdateReplace => Method::PUT,
            Operation::Delete | Operation::DeleteAll => Method::DELETE,
        }
    }

    pub fn method_filter(self) -> MethodFilter {
        match self {
            Operation::List | Operation::Get => MethodFilter::GET,
            Operation::Create => MethodFilter::POST,
            Operation::UpdatePatch => MethodFilter::PATCH,
            Operation::UpdateReplace => MethodFilter::PUT,
            Operation::Delete | Operation::DeleteAll => MethodFilter::DELETE,
        }
    }

    /// Item operations get an `:id` placeholder; collection operations do not.
    pub fn targets_item(self) -> bool {
        matches!(
            self,
            Operation::Get | Operation::UpdatePatch | Operation::UpdateReplace | Operation::Delete
        )
    }

    /// Operations whose route chain starts with the body-decoding step.
    pub fn consumes_body(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::UpdatePatch | Operation::UpdateReplace
        )
    }

    pub fn context(self) -> Context {
        match self {
            Operation::List | Operation::Get => Context::Public,
            _ => Context::Private,
        }
    }

    /// deleteAll must be opted into explicitly.
    pub fn default_enabled(self) -> bool {
        self != Operation::DeleteAll
    }

    /// Resolve the enablement flag: deleteAll needs an explicit `true`,
    /// every other operation is turned off only by an explicit `false`.
    pub fn is_enabled(self, flag: Option<bool>) -> bool {
        match self {
            Operation::DeleteAll => flag == Some(true),
            _ => flag != Some(false),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
