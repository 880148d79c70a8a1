//! Route name collision policy.
//!
//! Names are derived from paths and two different files can reduce to the
//! same slug (`users-id` from `users/[id]` and `users-[id]`). The first record
//! in pre-order keeps the name; every later one gets the smallest free
//! numeric suffix (`users-id-2`, `users-id-3`, ...).

use rustc_hash::FxHashSet;

use super::builder::SynthesisWarning;
use super::record::RouteRecord;

/// Make every route name in the tree unique, reporting each rename.
pub(super) fn dedupe_names(routes: &mut [RouteRecord]) -> Vec<SynthesisWarning> {
    let mut taken: FxHashSet<String> = FxHashSet::default();
    for route in routes.iter() {
        route.walk(&mut |record| {
            if let Some(name) = &record.name {
                taken.insert(name.clone());
            }
        });
    }

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut warnings = Vec::new();

    for route in routes.iter_mut() {
        route.walk_mut(&mut |record| {
            let Some(name) = record.name.clone() else {
                return;
            };
            if seen.insert(name.clone()) {
                return;
            }

            let mut n = 2;
            let renamed = loop {
                let candidate = format!("{name}-{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(renamed.clone());
            seen.insert(renamed.clone());

            warnings.push(SynthesisWarning::NameCollision {
                name,
                renamed: renamed.clone(),
                source: record
                    .component
                    .as_ref()
                    .map_or_else(|| record.path.clone(), |c| c.identity().to_string()),
            });
            record.name = Some(renamed);
        });
    }

    warnings
}
