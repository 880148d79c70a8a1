//! Route tree value types.

use serde::Serialize;

/// Route metadata: an ordered string → value mapping.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// How the consuming router gets hold of a component.
///
/// The payload is the import target, i.e. the project-rooted file identity
/// (`/src/views/about.vue`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "load", content = "import", rename_all = "lowercase")]
pub enum ComponentRef {
    /// Deferred `() => import(...)`.
    Lazy(String),
    /// Resolved up front.
    Eager(String),
}

impl ComponentRef {
    pub fn new(identity: impl Into<String>, lazy: bool) -> Self {
        let identity = identity.into();
        if lazy {
            Self::Lazy(identity)
        } else {
            Self::Eager(identity)
        }
    }

    /// File identity this component was loaded from.
    pub fn identity(&self) -> &str {
        match self {
            Self::Lazy(id) | Self::Eager(id) => id,
        }
    }
}

/// One file matched by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Project-rooted path, `/`-separated (`/src/views/users/index.vue`).
    pub raw_path: String,
    pub loader: ComponentRef,
}

impl DiscoveredFile {
    pub fn new(raw_path: impl Into<String>, lazy: bool) -> Self {
        let raw_path = raw_path.into();
        let loader = ComponentRef::new(raw_path.clone(), lazy);
        Self { raw_path, loader }
    }
}

/// One entry of the generated route tree.
///
/// Nested records carry paths relative to their layout (`:id`, or `` for an
/// index child); top-level records carry absolute paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
}

impl RouteRecord {
    /// A named leaf route.
    pub fn leaf(path: impl Into<String>, name: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            component: Some(component),
            children: Vec::new(),
            redirect: None,
            meta: Meta::new(),
        }
    }

    /// An unnamed layout route wrapping `children`.
    pub fn layout(path: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: Some(component),
            children: Vec::new(),
            redirect: None,
            meta: Meta::new(),
        }
    }

    /// A component-less redirect.
    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: None,
            children: Vec::new(),
            redirect: Some(target.into()),
            meta: Meta::new(),
        }
    }

    #[inline]
    pub const fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }

    /// Pre-order walk over this record and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RouteRecord)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Pre-order mutable walk.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut RouteRecord)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}
