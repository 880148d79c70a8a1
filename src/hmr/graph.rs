//! Host module graph and importer closure.
//!
//! The host reports, per module, which modules import it. Only that reverse
//! direction is kept, since invalidation walks from a changed module outward
//! to everything that imports it.
//!
//! On disk (`[hmr].graph`) it is a JSON object of module → importers:
//!
//! ```json
//! { "/src/router/index.ts": ["/src/main.ts"], "/src/main.ts": [] }
//! ```

use std::collections::VecDeque;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};

type ModuleSet = FxHashSet<String>;
type ModuleSetMap = FxHashMap<String, ModuleSet>;

/// Read access to the importer relation.
pub trait ModuleGraph {
    /// Whether the host knows this module at all.
    fn contains(&self, id: &str) -> bool;

    /// Direct importers of `id`, in a stable order.
    fn importers(&self, id: &str) -> Vec<&str>;
}

/// Module graph as the host reports it. Self-imports are dropped.
#[derive(Debug, Default, Clone)]
pub struct ImporterGraph {
    modules: ModuleSet,
    /// module → modules importing it
    importers: ModuleSetMap,
}

impl ImporterGraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module without edges.
    pub fn add_module(&mut self, id: impl Into<String>) {
        self.modules.insert(id.into());
    }

    /// Build from the on-disk `module → importers` form.
    pub fn from_importer_map(map: FxHashMap<String, Vec<String>>) -> Self {
        let mut graph = Self::new();
        for (module, importers) in map {
            graph.add_module(module.clone());
            for importer in importers {
                if importer == module {
                    continue;
                }
                graph.add_module(importer.clone());
                graph
                    .importers
                    .entry(module.clone())
                    .or_default()
                    .insert(importer);
            }
        }
        graph
    }

    /// Best-effort load; a missing or invalid file yields an empty graph.
    pub fn load(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(map) => Self::from_importer_map(map),
            Err(e) => {
                crate::debug!("hmr"; "module graph {} unavailable: {}", path.display(), e);
                Self::new()
            }
        }
    }

    #[inline]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl ModuleGraph for ImporterGraph {
    fn contains(&self, id: &str) -> bool {
        self.modules.contains(id)
    }

    fn importers(&self, id: &str) -> Vec<&str> {
        let mut found: Vec<&str> = self
            .importers
            .get(id)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        found.sort_unstable();
        found
    }
}

/// Reflexive-transitive closure of `seeds` over the importer relation.
///
/// Seeds unknown to the graph are ignored. Each module is visited once, so
/// import cycles terminate. Result is in breadth-first visit order.
pub fn importer_closure<G, I, S>(graph: &G, seeds: I) -> Vec<String>
where
    G: ModuleGraph + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    for seed in seeds {
        let seed = seed.as_ref();
        if graph.contains(seed) && visited.insert(seed.to_string()) {
            order.push(seed.to_string());
            queue.push_back(seed.to_string());
        }
    }

    while let Some(id) = queue.pop_front() {
        for importer in graph.importers(&id) {
            if visited.insert(importer.to_string()) {
                order.push(importer.to_string());
                queue.push_back(importer.to_string());
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> ImporterGraph {
        let map = edges
            .iter()
            .map(|(m, importers)| {
                (
                    (*m).to_string(),
                    importers.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();
        ImporterGraph::from_importer_map(map)
    }

    mod importer_graph {
        use super::*;

        #[test]
        fn new_graph_is_empty() {
            let graph = ImporterGraph::new();
            assert!(!graph.contains("/a.ts"));
            assert!(graph.importers("/a.ts").is_empty());
        }

        #[test]
        fn map_builds_reverse_edges() {
            let graph = graph(&[("/router.ts", &["/main.ts"]), ("/app.vue", &["/main.ts"])]);
            assert_eq!(graph.importers("/router.ts"), vec!["/main.ts"]);
            assert_eq!(graph.importers("/app.vue"), vec!["/main.ts"]);
            assert!(graph.importers("/main.ts").is_empty());
            // importers are modules too
            assert!(graph.contains("/main.ts"));
        }

        #[test]
        fn self_import_excluded() {
            let graph = graph(&[("/a.ts", &["/a.ts"]), ("/b.ts", &["/a.ts"])]);
            assert!(graph.importers("/a.ts").is_empty());
            assert_eq!(graph.importers("/b.ts"), vec!["/a.ts"]);
        }

        #[test]
        fn importers_are_sorted() {
            let graph = graph(&[("/shared.ts", &["/z.ts", "/a.ts", "/m.ts"])]);
            assert_eq!(graph.importers("/shared.ts"), vec!["/a.ts", "/m.ts", "/z.ts"]);
        }

        #[test]
        fn load_from_json() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = dir.path().join("modules.json");
            std::fs::write(&path, r#"{"/router.ts": ["/main.ts"], "/main.ts": []}"#).unwrap();
            let graph = ImporterGraph::load(&path);
            assert_eq!(graph.module_count(), 2);
            assert_eq!(graph.importers("/router.ts"), vec!["/main.ts"]);
        }

        #[test]
        fn load_missing_is_empty() {
            assert_eq!(ImporterGraph::load(Path::new("/no/such/modules.json")).module_count(), 0);
        }
    }

    mod closure {
        use super::*;

        #[test]
        fn cycle_terminates() {
            // A imports B and B imports A
            let graph = graph(&[("A", &["B"]), ("B", &["A"])]);
            let mut closure = importer_closure(&graph, ["A"]);
            closure.sort();
            assert_eq!(closure, vec!["A", "B"]);
        }

        #[test]
        fn reflexive_and_transitive() {
            let graph = graph(&[
                ("/router.ts", &["/main.ts"]),
                ("/main.ts", &["/index.html"]),
                ("/unrelated.ts", &["/main.ts"]),
            ]);
            assert_eq!(
                importer_closure(&graph, ["/router.ts"]),
                vec!["/router.ts", "/main.ts", "/index.html"]
            );
        }

        #[test]
        fn unknown_seeds_are_ignored() {
            let graph = graph(&[("/router.ts", &[])]);
            assert!(importer_closure(&graph, ["\0virtual:convention-routes"]).is_empty());
            assert_eq!(
                importer_closure(&graph, ["/router.ts", "/nope.ts"]),
                vec!["/router.ts"]
            );
        }

        #[test]
        fn shared_importer_visited_once() {
            let graph = graph(&[("/a.ts", &["/main.ts"]), ("/b.ts", &["/main.ts"])]);
            assert_eq!(
                importer_closure(&graph, ["/a.ts", "/b.ts"]),
                vec!["/a.ts", "/b.ts", "/main.ts"]
            );
        }
    }
}
