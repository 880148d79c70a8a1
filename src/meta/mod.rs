//! Route metadata resolution.
//!
//! Merge order, later layers overriding earlier ones key by key:
//!
//! | Layer | Source                                   | Key              |
//! |-------|------------------------------------------|------------------|
//! | 1     | empty default                            | -                |
//! | 2     | external metadata file                   | exact route path |
//! | 3     | metadata embedded in the component file  | file identity    |

mod embedded;
mod external;

pub use embedded::EmbeddedMeta;
pub use external::{ExternalMeta, MetaStore};

use crate::route::{Meta, RoutePath};

/// Read-only view over the metadata layers for one synthesis pass.
#[derive(Debug, Clone, Copy)]
pub struct MetadataResolver<'a> {
    external: &'a ExternalMeta,
    /// `None` when embedded metadata is disabled in config.
    embedded: Option<&'a EmbeddedMeta>,
}

impl<'a> MetadataResolver<'a> {
    pub const fn new(external: &'a ExternalMeta, embedded: Option<&'a EmbeddedMeta>) -> Self {
        Self { external, embedded }
    }

    /// Merged metadata for a fully qualified route path.
    pub fn resolve(&self, path: &RoutePath, component: Option<&str>) -> Meta {
        let mut meta = Meta::new();

        if let Some(external) = self.external.get(path.as_str()) {
            merge(&mut meta, external);
        }

        if let Some(embedded) = self.embedded
            && let Some(identity) = component
            && let Some(found) = embedded.get(identity)
        {
            merge(&mut meta, found);
        }

        meta
    }
}

fn merge(into: &mut Meta, from: &Meta) {
    for (key, value) in from {
        into.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: serde_json::Value) -> Meta {
        value.as_object().cloned().unwrap()
    }

    fn layers() -> (ExternalMeta, EmbeddedMeta) {
        let mut external = ExternalMeta::new();
        external.insert("/users", meta(json!({"title": "Ext", "order": 1})));

        let mut embedded = EmbeddedMeta::new();
        embedded.insert("/src/views/users/index.vue", meta(json!({"title": "Emb", "auth": true})));
        (external, embedded)
    }

    #[test]
    fn test_embedded_wins_shared_keys_external_only_survive() {
        let (external, embedded) = layers();
        let resolver = MetadataResolver::new(&external, Some(&embedded));

        let merged = resolver.resolve(
            &RoutePath::from_relative("users"),
            Some("/src/views/users/index.vue"),
        );
        assert_eq!(merged, meta(json!({"title": "Emb", "order": 1, "auth": true})));
    }

    #[test]
    fn test_default_is_empty() {
        let (external, embedded) = layers();
        let resolver = MetadataResolver::new(&external, Some(&embedded));
        assert!(resolver.resolve(&RoutePath::from_relative("about"), None).is_empty());
    }

    #[test]
    fn test_embedded_disabled() {
        let (external, _) = layers();
        let resolver = MetadataResolver::new(&external, None);
        let merged = resolver.resolve(
            &RoutePath::from_relative("users"),
            Some("/src/views/users/index.vue"),
        );
        assert_eq!(merged["title"], json!("Ext"));
    }

    #[test]
    fn test_embedded_lookup_is_exact_identity() {
        let (external, embedded) = layers();
        let resolver = MetadataResolver::new(&external, Some(&embedded));
        // shares a suffix with the recorded identity but is a different file
        let merged = resolver.resolve(
            &RoutePath::from_relative("admin/users"),
            Some("/src/views/admin/users/index.vue"),
        );
        assert!(merged.is_empty());
    }
}
