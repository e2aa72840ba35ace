//! Path builder: concrete URL paths per operation, and ancestor extraction from path params.

use crate::case::path_from_entity_kind;
use crate::config::ResolvedConfig;
use crate::model::Ancestors;
use crate::operation::Operation;
use std::collections::HashMap;

/// Path parameter holding the item identifier.
pub const ID_PARAM: &str = "id";

/// Path parameter name for the ancestor at `index`, e.g. `anc0ID`.
pub fn ancestor_param(index: usize) -> String {
    format!("anc{}ID", index)
}

/// `/<plural-kebab kind>/:anc<i>ID` for each ancestor, in chain order.
pub fn ancestor_segments(ancestors: &[String]) -> String {
    ancestors
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("/{}/:{}", path_from_entity_kind(kind), ancestor_param(i)))
        .collect()
}

/// Paths for one operation: one per prefix, in prefix order.
/// `<prefix><ancestor segments><path>[/:id]<suffix>`
pub fn build_paths(config: &ResolvedConfig, operation: Operation) -> Vec<String> {
    let nested = ancestor_segments(&config.ancestors);
    let id = if operation.targets_item() {
        format!("/:{}", ID_PARAM)
    } else {
        String::new()
    };
    let suffix = &config.operation(operation).suffix;
    config
        .prefixes(operation)
        .iter()
        .map(|prefix| format!("{}{}{}{}{}", prefix, nested, config.path, id, suffix))
        .collect()
}

/// Interleaved `[kind0, id0, kind1, id1, ...]` from `anc<i>ID` params.
/// Pairs without a value are skipped; `None` when nothing is left.
pub fn ancestors_from_params(
    params: &HashMap<String, String>,
    chain: &[String],
) -> Option<Ancestors> {
    let items: Vec<String> = chain
        .iter()
        .enumerate()
        .filter_map(|(i, kind)| {
            params
                .get(&ancestor_param(i))
                .filter(|v| !v.is_empty())
                .map(|v| [kind.clone(), v.clone()])
        })
        .flatten()
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(Ancestors::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ApiSettings, OperationSettings, Settings};
    use crate::model::QueryDefaults;

    fn config(settings: Settings) -> ResolvedConfig {
        resolve("User", &QueryDefaults::default(), &ApiSettings::default(), settings).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn chain(kinds: &[&str]) -> Vec<String> {
        kinds.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn flat_resource_paths() {
        let c = config(Settings::new().path("/users"));
        assert_eq!(build_paths(&c, Operation::List), vec!["/users"]);
        assert_eq!(build_paths(&c, Operation::Get), vec!["/users/:id"]);
        assert_eq!(build_paths(&c, Operation::Create), vec!["/users"]);
        assert_eq!(build_paths(&c, Operation::Delete), vec!["/users/:id"]);
        assert_eq!(build_paths(&c, Operation::DeleteAll), vec!["/users"]);
    }

    #[test]
    fn ancestor_segments_in_chain_order() {
        let c = config(Settings::new().path("/users").ancestors(["GrandFather", "Dad"]));
        assert_eq!(
            build_paths(&c, Operation::Get),
            vec!["/grand-fathers/:anc0ID/dads/:anc1ID/users/:id"]
        );
        let c = config(Settings::new().path("/users").ancestors(["grand-Father", "MyDad-1"]));
        assert_eq!(
            build_paths(&c, Operation::Get),
            vec!["/grand-fathers/:anc0ID/my-dad-1S/:anc1ID/users/:id"]
        );
    }

    #[test]
    fn context_prefixes() {
        let c = config(Settings::new().path("/users").contexts("/public", "/private"));
        assert_eq!(build_paths(&c, Operation::List), vec!["/public/users"]);
        assert_eq!(build_paths(&c, Operation::Get), vec!["/public/users/:id"]);
        assert_eq!(build_paths(&c, Operation::UpdateReplace), vec!["/private/users/:id"]);
        assert_eq!(build_paths(&c, Operation::DeleteAll), vec!["/private/users"]);
    }

    #[test]
    fn prefix_fan_out_and_suffix() {
        let c = config(
            Settings::new()
                .path("/users")
                .ancestors("Dad")
                .operation(
                    Operation::Get,
                    OperationSettings::new().prefix(["/p1", "/p2"]).suffix("/mysuffix"),
                ),
        );
        assert_eq!(
            build_paths(&c, Operation::Get),
            vec![
                "/p1/dads/:anc0ID/users/:id/mysuffix",
                "/p2/dads/:anc0ID/users/:id/mysuffix",
            ]
        );
    }

    #[test]
    fn paths_are_deterministic() {
        let c = config(Settings::new().ancestors(["GrandFather", "Dad"]));
        assert_eq!(build_paths(&c, Operation::List), build_paths(&c, Operation::List));
    }

    #[test]
    fn ancestors_all_present() {
        let anc = ancestors_from_params(
            &params(&[("anc0ID", "a1"), ("anc1ID", "a2"), ("id", "123")]),
            &chain(&["GrandFather", "Dad"]),
        )
        .unwrap();
        assert_eq!(anc.as_slice(), ["GrandFather", "a1", "Dad", "a2"]);
    }

    #[test]
    fn ancestors_longer_chain_skips_missing_pair() {
        let anc = ancestors_from_params(
            &params(&[("anc0ID", "a1"), ("anc1ID", "a2")]),
            &chain(&["GrandFather", "Dad", "Other"]),
        )
        .unwrap();
        assert_eq!(anc.as_slice(), ["GrandFather", "a1", "Dad", "a2"]);
    }

    #[test]
    fn ancestors_none_when_empty() {
        assert_eq!(ancestors_from_params(&params(&[("anc0ID", "a1")]), &[]), None);
        assert_eq!(
            ancestors_from_params(&params(&[("id", "1")]), &chain(&["Dad"])),
            None
        );
    }
}
