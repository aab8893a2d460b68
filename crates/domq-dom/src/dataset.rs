//! Dataset (DOMStringMap)
//!
//! `data-*` attribute access by camelCase key: `fooBar` <-> `data-foo-bar`.

use crate::{DomResult, DomTree, NodeId};

/// Convert kebab-case to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert camelCase to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Attribute name backing a dataset key
pub fn to_attribute_name(key: &str) -> String {
    format!("data-{}", to_kebab_case(key))
}

impl DomTree {
    /// Read `dataset[key]`
    pub fn dataset_get(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get_attribute(id, &to_attribute_name(key))
    }

    /// Write `dataset[key] = value`
    pub fn dataset_set(&mut self, id: NodeId, key: &str, value: &str) -> DomResult<()> {
        self.set_attribute(id, &to_attribute_name(key), value)
    }

    /// `delete dataset[key]`
    pub fn dataset_remove(&mut self, id: NodeId, key: &str) -> DomResult<Option<String>> {
        self.remove_attribute(id, &to_attribute_name(key))
    }

    /// All dataset entries as (camelCase key, value)
    pub fn dataset(&self, id: NodeId) -> Vec<(String, String)> {
        self.attributes(id)
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("data-")
                    .map(|key| (to_camel_case(key), value.to_string()))
            })
            .collect()
    }
}
