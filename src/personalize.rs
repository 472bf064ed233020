use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::context::RenderOptions;

fn token_pattern() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([a-zA-Z][a-zA-Z0-9_]*\.[a-zA-Z][a-zA-Z0-9_]*)\s*\}\}").unwrap()
    })
}

/// Flat lookup table behind `{{namespace.field}}` tokens. Built once per
/// render from the supplied context; a `BTreeMap` keeps iteration order
/// stable so renders stay deterministic.
///
/// Resolution never fails: a token with no table entry is left in the
/// output verbatim, which keeps missing data visible in previews and lets
/// a downstream merge engine take a second pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTable {
    entries: BTreeMap<String, String>,
}

impl TokenTable {
    pub fn build(options: &RenderOptions) -> Self {
        let mut entries = BTreeMap::new();
        if let Some(contact) = &options.contact {
            insert_opt(&mut entries, "contact.firstName", contact.first_name.as_deref());
            insert_opt(&mut entries, "contact.lastName", contact.last_name.as_deref());
            insert_opt(&mut entries, "contact.email", contact.email.as_deref());
            insert_opt(&mut entries, "contact.city", contact.city.as_deref());
            insert_opt(
                &mut entries,
                "contact.fullName",
                contact.full_name().as_deref(),
            );
        }
        if let Some(show) = &options.show {
            if !show.name.is_empty() {
                entries.insert("show.name".to_string(), show.name.clone());
            }
            if !show.venue.is_empty() {
                entries.insert("show.venue".to_string(), show.venue.clone());
            }
            insert_opt(&mut entries, "show.city", show.city.as_deref());
            insert_opt(&mut entries, "show.date", show.date_label().as_deref());
            insert_opt(&mut entries, "show.url", show.url.as_deref());
            insert_opt(&mut entries, "show.price", show.price.as_deref());
        }
        if let Some(base_url) = &options.base_url {
            let base = base_url.trim_end_matches('/');
            let query = options
                .contact
                .as_ref()
                .and_then(|c| c.email.as_deref())
                .map(|email| format!("?contact={email}"))
                .unwrap_or_default();
            entries.insert(
                "links.unsubscribeLink".to_string(),
                format!("{base}/email/unsubscribe{query}"),
            );
            entries.insert(
                "links.preferencesLink".to_string(),
                format!("{base}/email/preferences{query}"),
            );
            entries.insert(
                "links.webVersionLink".to_string(),
                format!("{base}/email/view{query}"),
            );
        }
        TokenTable { entries }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every resolvable `{{namespace.field}}` occurrence in the
    /// input. Whitespace inside the braces is tolerated; unresolvable
    /// tokens pass through untouched.
    pub fn resolve(&self, input: &str) -> String {
        if !input.contains("{{") {
            return input.to_string();
        }
        token_pattern()
            .replace_all(input, |caps: &Captures| match self.entries.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

fn insert_opt(entries: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        entries.insert(key.to_string(), value.to_string());
    }
}
