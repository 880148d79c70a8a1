//! One synthesis pass, end to end.
//!
//! ```text
//! scan → embedded meta (optional) → synthesize(external snapshot) → report → publish
//! ```
//!
//! The external metadata layer is whatever the `MetaStore` holds when the
//! pass starts; a load still in flight is simply not seen.

use std::sync::Arc;

use crate::{
    config::RouteConfig,
    debug, debug_do, discover,
    meta::{EmbeddedMeta, MetaStore, MetadataResolver},
    output::{RESOLVED_VIRTUAL_ID, VirtualRoutes, declaration, inspect},
    route::{RouteTree, synthesize},
};

pub struct Pipeline {
    config: Arc<RouteConfig>,
    meta: Arc<MetaStore>,
    routes: Arc<VirtualRoutes>,
}

impl Pipeline {
    pub fn new(config: Arc<RouteConfig>) -> Self {
        Self {
            config,
            meta: MetaStore::new(),
            routes: VirtualRoutes::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    #[inline]
    pub fn virtual_routes(&self) -> &Arc<VirtualRoutes> {
        &self.routes
    }

    /// Start loading the external metadata source, if one is configured.
    pub fn load_metadata(&self) -> Option<tokio::task::JoinHandle<()>> {
        let source = self.config.meta_source()?;
        debug!("meta"; "loading {}", source.display());
        Some(self.meta.spawn_load(source))
    }

    /// Run one pass and publish its tree to the virtual module.
    pub fn run_pass(&self) -> RouteTree {
        let config = &self.config;
        let rules = config.rules();
        let files = discover::scan(&config.root, &rules, config.routes.lazy);

        let embedded = config
            .meta
            .embedded
            .then(|| EmbeddedMeta::collect(&files, |id| discover::read_component(&config.root, id)));
        let external = self.meta.snapshot();
        let resolver = MetadataResolver::new(&external, embedded.as_ref());

        let tree = synthesize(&files, &rules, resolver);
        tree.report();

        debug_do! {
            debug!("routes"; "generated routes:\n{}", inspect::debug_summary(&tree.routes));
        }

        self.routes.publish(tree.routes.clone());
        tree
    }

    /// Write the declaration artifact when enabled. Never fails the pass.
    pub fn finalize(&self, tree: &RouteTree) {
        if self.config.declaration.enable {
            declaration::write_logged(&self.config.declaration_path(), &tree.routes);
        }
    }

    /// Seeds for hot update invalidation.
    pub fn invalidation_seeds(&self) -> Vec<String> {
        let mut seeds = self.config.routes.registration.clone();
        seeds.push(RESOLVED_VIRTUAL_ID.to_string());
        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)], config: &str) -> (TempDir, Pipeline) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let mut config = test_parse_config(config);
        config.root = dir.path().to_path_buf();
        (dir, Pipeline::new(Arc::new(config)))
    }

    #[test]
    fn test_pass_builds_and_publishes() {
        let (_dir, pipeline) = project(
            &[
                ("src/views/index.vue", "<template/>"),
                ("src/views/about.vue", "<template/>"),
                ("src/views/users/_layout.vue", "<template/>"),
                ("src/views/users/index.vue", "<template/>"),
                ("src/views/users/[id]/index.vue", "<template/>"),
                ("src/views/components/Button.vue", "<template/>"),
            ],
            "",
        );

        let tree = pipeline.run_pass();
        let paths: Vec<_> = tree.routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/about", "/users"]);
        let children: Vec<_> = tree.routes[2].children.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(children, vec!["", ":id"]);

        let served = pipeline.virtual_routes().snapshot().unwrap();
        assert_eq!(*served, tree.routes);
    }

    #[test]
    fn test_embedded_meta_toggle() {
        let files = [(
            "src/views/about.vue",
            "<script setup>\nexport const meta = { title: 'About', auth: true }\n</script>",
        )];

        let (_dir, pipeline) = project(&files, "");
        let tree = pipeline.run_pass();
        assert_eq!(tree.routes[0].meta["title"], json!("About"));
        assert_eq!(tree.routes[0].meta["auth"], json!(true));

        let (_dir, pipeline) = project(&files, "[meta]\nembedded = false");
        assert!(pipeline.run_pass().routes[0].meta.is_empty());
    }

    #[tokio::test]
    async fn test_external_meta_after_load() {
        let (_dir, pipeline) = project(
            &[
                ("src/views/about.vue", "<template/>"),
                ("routes.meta.toml", "[\"/about\"]\ntitle = \"About\"\n"),
            ],
            "[meta]\nsource = \"routes.meta.toml\"",
        );

        // before the load completes the external layer is empty
        assert!(pipeline.run_pass().routes[0].meta.is_empty());

        pipeline.load_metadata().unwrap().await.unwrap();
        assert_eq!(pipeline.run_pass().routes[0].meta["title"], json!("About"));
    }

    #[test]
    fn test_finalize_writes_declaration() {
        let (dir, pipeline) = project(&[("src/views/index.vue", "")], "");
        let tree = pipeline.run_pass();
        pipeline.finalize(&tree);
        assert!(dir.path().join("src/router/routes.d.ts").exists());

        let (dir, pipeline) = project(&[("src/views/index.vue", "")], "[declaration]\nenable = false");
        pipeline.finalize(&pipeline.run_pass());
        assert!(!Path::new(&dir.path().join("src/router/routes.d.ts")).exists());
    }

    #[test]
    fn test_invalidation_seeds() {
        let (_dir, pipeline) = project(&[], "");
        assert_eq!(
            pipeline.invalidation_seeds(),
            vec!["/src/router/index.ts", "\0virtual:convention-routes"]
        );
    }
}
