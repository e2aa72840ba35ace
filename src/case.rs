//! Case conversion for paths: entity kinds (PascalCase) -> plural kebab-case URL segments.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Pluralization rules, first match wins. Replacement syntax is `regex` expansion.
const PLURAL_RULES: &[(&str, &str)] = &[
    (
        r"(?i)(equipment|information|rice|money|species|series|fish|sheep|deer|news|data)$",
        "${1}",
    ),
    (r"(?i)(pe)(?:rson|ople)$", "${1}ople"),
    (r"(?i)(child)(?:ren)?$", "${1}ren"),
    (r"(?i)m[ae]n$", "men"),
    (r"(?i)\b((?:tit)?m|l)(?:ice|ouse)$", "${1}ice"),
    (r"(?i)(matr|cod|mur|sil|vert|ind|append)(?:ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh|zz)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(?:(kni|wi|li)fe|(ar|l|ea|eo|oa|hoo)f)$", "${1}${2}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)(alias|[^aou]us|t[lm]as|gas|ris)$", "${1}es"),
    (r"(?i)s?$", "s"),
];

fn plural_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        PLURAL_RULES
            .iter()
            .map(|(pattern, replacement)| {
                (Regex::new(pattern).expect("valid pluralization rule"), *replacement)
            })
            .collect()
    })
}

/// Lower-case the first character only. e.g. "BlogPost" -> "blogPost"
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert an identifier to kebab-case.
/// Underscores and whitespace become dashes, each upper-case letter starts a new word,
/// repeated dashes collapse. e.g. "blogPost" -> "blog-post", "grand-Father" -> "grand-father"
pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        let dash = c == '_' || c.is_whitespace() || c == '-' || c.is_uppercase();
        if dash && !out.ends_with('-') {
            out.push('-');
        }
        if c != '_' && c != '-' && !c.is_whitespace() {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Pluralize the trailing word using the fixed rule table.
pub fn pluralize(word: &str) -> String {
    for (re, replacement) in plural_rules() {
        if let Some(caps) = re.captures(word) {
            return replace_match(word, &caps, replacement);
        }
    }
    word.to_string()
}

fn replace_match(word: &str, caps: &Captures<'_>, replacement: &str) -> String {
    let m = caps.get(0).map(|m| (m.start(), m.as_str()));
    let (start, matched) = m.unwrap_or((word.len(), ""));
    let mut token = String::new();
    caps.expand(replacement, &mut token);

    // Suffix case follows the replaced text, or the preceding character on an empty match.
    let basis = if matched.is_empty() {
        word[..start].chars().last().map(String::from).unwrap_or_default()
    } else {
        matched.to_string()
    };
    let token = if !basis.is_empty() && basis == basis.to_uppercase() {
        token.to_uppercase()
    } else if basis == basis.to_lowercase() {
        token.to_lowercase()
    } else {
        token
    };
    format!("{}{}", &word[..start], token)
}

/// URL segment for an entity kind, without leading slash. e.g. "BlogPost" -> "blog-posts"
pub fn path_from_entity_kind(kind: &str) -> String {
    pluralize(&to_kebab_case(&lower_first(kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case() {
        assert_eq!(to_kebab_case("blogPost"), "blog-post");
        assert_eq!(to_kebab_case("grand-Father"), "grand-father");
        assert_eq!(to_kebab_case("user_profile"), "user-profile");
    }

    #[test]
    fn entity_kind_paths() {
        assert_eq!(path_from_entity_kind("BlogPost"), "blog-posts");
        assert_eq!(path_from_entity_kind("GrandFather"), "grand-fathers");
        assert_eq!(path_from_entity_kind("Dad"), "dads");
        assert_eq!(path_from_entity_kind("grand-Father"), "grand-fathers");
        assert_eq!(path_from_entity_kind("MyDad-1"), "my-dad-1S");
    }

    #[test]
    fn entity_kind_path_is_deterministic() {
        let first = path_from_entity_kind("BlogPost");
        assert_eq!(first, path_from_entity_kind("BlogPost"));
    }

    #[test]
    fn plural_rules() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("users"), "users");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("news"), "news");
        assert_eq!(pluralize("meta-data"), "meta-data");
        assert_eq!(pluralize("POST"), "POSTS");
    }
}
