//! Merge library overrides, model defaults, resource settings and operation options
//! into one resolved configuration per resource.

use crate::case::path_from_entity_kind;
use crate::config::resolved::{
    Contexts, OperationBinding, ResolvedConfig, ResolvedOperation, ResolvedOptions,
};
use crate::config::types::*;
use crate::config::{validate_entity_kind, validate_path, validate_segment};
use crate::error::ConfigError;
use crate::model::QueryDefaults;
use crate::operation::Operation;

/// One precedence layer of resource-level settings. `None` defers to lower layers.
#[derive(Clone, Debug, Default)]
struct Layer {
    host: Option<String>,
    public: Option<Segments>,
    private: Option<Segments>,
    show_key: Option<bool>,
    read_all: Option<bool>,
}

impl Layer {
    /// `upper` wins field by field.
    fn overlay(self, upper: Layer) -> Layer {
        Layer {
            host: upper.host.or(self.host),
            public: upper.public.or(self.public),
            private: upper.private.or(self.private),
            show_key: upper.show_key.or(self.show_key),
            read_all: upper.read_all.or(self.read_all),
        }
    }
}

impl From<&ApiSettings> for Layer {
    fn from(s: &ApiSettings) -> Self {
        Layer {
            host: s.host.clone(),
            public: s.contexts.public.clone(),
            private: s.contexts.private.clone(),
            show_key: s.show_key,
            read_all: s.read_all,
        }
    }
}

impl From<&QueryDefaults> for Layer {
    fn from(d: &QueryDefaults) -> Self {
        Layer {
            show_key: d.show_key,
            read_all: d.read_all,
            ..Layer::default()
        }
    }
}

impl From<&Settings> for Layer {
    fn from(s: &Settings) -> Self {
        Layer {
            host: s.host.clone(),
            public: s.contexts.public.clone(),
            private: s.contexts.private.clone(),
            show_key: s.show_key,
            read_all: s.read_all,
        }
    }
}

/// Prefix list with at least one entry; an empty list mounts at the root.
fn prefix_list(segments: Option<&Segments>) -> Result<Vec<String>, ConfigError> {
    let list = segments.map(Segments::to_vec).unwrap_or_default();
    for prefix in &list {
        validate_segment(prefix)?;
    }
    if list.is_empty() {
        Ok(vec![String::new()])
    } else {
        Ok(list)
    }
}

fn suffix(segments: Option<&Segments>) -> Result<String, ConfigError> {
    let suffix = segments.map(Segments::joined).unwrap_or_default();
    validate_segment(&suffix)?;
    Ok(suffix)
}

/// Build the resolved config for one resource.
///
/// Precedence, lowest to highest: `overrides` < model `defaults` < `settings` <
/// the operation's own `options`.
pub fn resolve(
    entity_kind: &str,
    defaults: &QueryDefaults,
    overrides: &ApiSettings,
    settings: Settings,
) -> Result<ResolvedConfig, ConfigError> {
    validate_entity_kind(entity_kind)?;

    let merged = [
        Layer::from(overrides),
        Layer::from(defaults),
        Layer::from(&settings),
    ]
    .into_iter()
    .fold(Layer::default(), Layer::overlay);

    let path = match &settings.path {
        Some(p) => p.clone(),
        None => format!("/{}", path_from_entity_kind(entity_kind)),
    };
    validate_path(&path)?;

    let show_key = merged.show_key.unwrap_or(false);
    let read_all = merged.read_all.unwrap_or(false);

    let mut operation_settings = settings.operations;
    let mut operations = Vec::with_capacity(Operation::ALL.len());
    for operation in Operation::ALL {
        let op = operation_settings.remove(&operation).unwrap_or_default();
        let prefix = match &op.path.prefix {
            Some(p) => Some(prefix_list(Some(p))?),
            None => None,
        };
        operations.push(ResolvedOperation {
            operation,
            enabled: operation.is_enabled(op.enabled),
            middleware: op.middleware,
            binding: match op.handler {
                Some(handler) => OperationBinding::Custom(handler),
                None => OperationBinding::Builtin,
            },
            prefix,
            suffix: suffix(op.path.suffix.as_ref())?,
            options: ResolvedOptions {
                show_key: op.options.show_key.unwrap_or(show_key),
                read_all: op.options.read_all.unwrap_or(read_all),
                query: op.options.query,
            },
        });
    }

    let config = ResolvedConfig {
        entity_kind: entity_kind.to_string(),
        host: merged.host.unwrap_or_default(),
        path,
        contexts: Contexts {
            public: prefix_list(merged.public.as_ref())?,
            private: prefix_list(merged.private.as_ref())?,
        },
        ancestors: settings
            .ancestors
            .as_ref()
            .map(Segments::to_vec)
            .unwrap_or_default(),
        show_key,
        read_all,
        body_limit: overrides.body_limit.unwrap_or(DEFAULT_BODY_LIMIT),
        operations,
    };
    tracing::debug!(
        entity_kind = %config.entity_kind,
        path = %config.path,
        ancestors = config.ancestors.len(),
        "resolved resource settings"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Handler;
    use axum::response::IntoResponse;
    use serde_json::json;

    fn resolve_default(settings: Settings) -> ResolvedConfig {
        resolve("BlogPost", &QueryDefaults::default(), &ApiSettings::default(), settings).unwrap()
    }

    #[test]
    fn derives_path_from_entity_kind() {
        assert_eq!(resolve_default(Settings::new()).path, "/blog-posts");
        assert_eq!(resolve_default(Settings::new().path("/users")).path, "/users");
    }

    #[test]
    fn empty_entity_kind_is_missing_model() {
        let err = resolve("", &QueryDefaults::default(), &ApiSettings::default(), Settings::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingModel));
    }

    #[test]
    fn delete_all_disabled_by_default() {
        let config = resolve_default(Settings::new());
        for op in Operation::ALL {
            assert_eq!(config.operation(op).enabled, op != Operation::DeleteAll, "{}", op);
        }
        let config = resolve_default(
            Settings::new().operation(Operation::DeleteAll, OperationSettings::new().enabled(true)),
        );
        assert!(config.operation(Operation::DeleteAll).enabled);
    }

    #[test]
    fn layers_merge_in_precedence_order() {
        let overrides = ApiSettings::new()
            .show_key(false)
            .read_all(true)
            .host("http://api.my-host.com")
            .contexts("/public", "/private");
        let defaults = QueryDefaults {
            show_key: Some(true),
            read_all: None,
        };

        let config = resolve("User", &defaults, &overrides, Settings::new()).unwrap();
        assert!(config.show_key);
        assert!(config.read_all);
        assert_eq!(config.host, "http://api.my-host.com");
        assert_eq!(config.contexts.public, vec!["/public"]);

        let settings = Settings::new()
            .show_key(false)
            .contexts("", "/admin")
            .operation(Operation::Get, OperationSettings::new().show_key(true).read_all(false));
        let config = resolve("User", &defaults, &overrides, settings).unwrap();
        assert!(!config.show_key);
        assert_eq!(config.contexts.private, vec!["/admin"]);
        assert_eq!(config.contexts.public, vec![""]);

        let get = &config.operation(Operation::Get).options;
        assert!(get.show_key);
        assert!(!get.read_all);
        let list = &config.operation(Operation::List).options;
        assert!(!list.show_key);
        assert!(list.read_all);
    }

    #[test]
    fn operation_prefix_and_suffix() {
        let settings = Settings::new().operation(
            Operation::List,
            OperationSettings::new()
                .prefix(["/p1", "/p2"])
                .suffix(["/a", "/b"])
                .option("limit", json!(13)),
        );
        let config = resolve_default(settings);
        let list = config.operation(Operation::List);
        assert_eq!(list.prefix, Some(vec!["/p1".to_string(), "/p2".to_string()]));
        assert_eq!(list.suffix, "/a/b");
        assert_eq!(list.options.query.get("limit"), Some(&json!(13)));
        assert_eq!(config.prefixes(Operation::List), ["/p1", "/p2"]);
        assert_eq!(config.prefixes(Operation::Create), [""]);
    }

    #[test]
    fn custom_handler_binding() {
        let handler = Handler::from_fn(|_req| async { "custom".into_response() });
        let config = resolve_default(Settings::new().handler(Operation::Get, handler));
        assert!(matches!(
            config.operation(Operation::Get).binding,
            OperationBinding::Custom(_)
        ));
        assert!(config.operation(Operation::List).binding.is_builtin());
    }

    #[test]
    fn prefixes_and_suffixes_need_leading_slash() {
        let err = resolve(
            "User",
            &QueryDefaults::default(),
            &ApiSettings::new().contexts("api", ""),
            Settings::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath(p) if p == "api"));

        let settings = Settings::new()
            .operation(Operation::Get, OperationSettings::new().prefix(["/v1", "v2"]));
        assert!(matches!(
            resolve("User", &QueryDefaults::default(), &ApiSettings::default(), settings),
            Err(ConfigError::InvalidPath(_))
        ));

        let settings =
            Settings::new().operation(Operation::Get, OperationSettings::new().suffix("mysuffix"));
        assert!(matches!(
            resolve("User", &QueryDefaults::default(), &ApiSettings::default(), settings),
            Err(ConfigError::InvalidPath(_))
        ));
    }

    #[test]
    fn body_limit_from_overrides() {
        let config = resolve(
            "User",
            &QueryDefaults::default(),
            &ApiSettings::new().body_limit(16),
            Settings::new(),
        )
        .unwrap();
        assert_eq!(config.body_limit, 16);
        assert_eq!(resolve_default(Settings::new()).body_limit, DEFAULT_BODY_LIMIT);
    }
}
