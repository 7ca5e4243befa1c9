//! The process-wide, hot-swappable generator catalog
//!
//! Readers take a lock-free snapshot of the current `GeneratorSet` and work
//! against it for the whole call. `replace` publishes a fully compiled set
//! with a single atomic pointer swap, so a reader sees either the old set or
//! the new one and never a mix.

use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::Rng;
use tracing::info;

use crate::config::SampleBounds;
use crate::error::NotFoundError;
use crate::generator::{Generator, GeneratorSet};

/// Holds the active generator set.
#[derive(Debug)]
pub struct Catalog {
    current: ArcSwap<GeneratorSet>,
    bounds: SampleBounds,
}

/// A generator pinned to the snapshot it was looked up in.
///
/// Stays valid after the catalog is replaced.
#[derive(Debug, Clone)]
pub struct GeneratorRef {
    set: Arc<GeneratorSet>,
    index: usize,
}

impl GeneratorRef {
    /// The set this generator belongs to.
    pub fn set(&self) -> &Arc<GeneratorSet> {
        &self.set
    }
}

impl Deref for GeneratorRef {
    type Target = Generator;

    fn deref(&self) -> &Generator {
        self.set.by_index(self.index)
    }
}

impl Catalog {
    pub fn new(set: GeneratorSet, bounds: SampleBounds) -> Self {
        Self {
            current: ArcSwap::from_pointee(set),
            bounds,
        }
    }

    pub fn bounds(&self) -> SampleBounds {
        self.bounds
    }

    /// The whole currently installed set.
    pub fn snapshot(&self) -> Arc<GeneratorSet> {
        self.current.load_full()
    }

    pub fn lookup(&self, name: &str) -> Option<GeneratorRef> {
        let set = self.current.load_full();
        let index = set.position(name)?;
        Some(GeneratorRef { set, index })
    }

    /// Draw `count` picks (clamped to the configured bounds) from `name`.
    pub fn sample(&self, name: &str, count: i64) -> Result<Vec<String>, NotFoundError> {
        self.sample_with(name, count, &mut rand::rng())
    }

    /// Like [`Catalog::sample`] with a caller-supplied RNG.
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        name: &str,
        count: i64,
        rng: &mut R,
    ) -> Result<Vec<String>, NotFoundError> {
        let set = self.current.load();
        let generator = set
            .get(name)
            .ok_or_else(|| NotFoundError(name.to_string()))?;
        Ok(generator.pick_many(self.bounds.clamp(count), rng))
    }

    /// Installed generator names in declaration order.
    pub fn category_names(&self) -> Vec<String> {
        self.current.load().names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Atomically install a new set. The previous one is dropped once the
    /// last in-flight reader releases it.
    pub fn replace(&self, set: GeneratorSet) {
        let installed = set.len();
        let previous = self.current.swap(Arc::new(set));
        info!(
            "Installed {} generators (replacing {})",
            installed,
            previous.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::document::{ConfigDocument, GeneratorSpec};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn colors() -> GeneratorSet {
        compile(ConfigDocument::new(vec![GeneratorSpec::unweighted(
            "colors",
            &["red", "blue"],
        )]))
        .unwrap()
    }

    #[test]
    fn test_colors_scenario() {
        let catalog = Catalog::new(colors(), SampleBounds::default());

        assert_eq!(catalog.category_names(), vec!["colors".to_string()]);

        let picks = catalog.sample("colors", 3).unwrap();
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|p| p == "red" || p == "blue"));

        assert_eq!(
            catalog.sample("shapes", 1),
            Err(NotFoundError("shapes".to_string()))
        );
        assert!(catalog.lookup("shapes").is_none());
    }

    #[test]
    fn test_sample_clamps_count() {
        let catalog = Catalog::new(colors(), SampleBounds::new(2, 5).unwrap());
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(catalog.sample_with("colors", -1, &mut rng).unwrap().len(), 2);
        assert_eq!(catalog.sample_with("colors", 0, &mut rng).unwrap().len(), 2);
        assert_eq!(catalog.sample_with("colors", 4, &mut rng).unwrap().len(), 4);
        assert_eq!(catalog.sample_with("colors", 500, &mut rng).unwrap().len(), 5);
    }

    #[test]
    fn test_lookup_survives_replace() {
        let catalog = Catalog::new(colors(), SampleBounds::default());
        let pinned = catalog.lookup("colors").unwrap();

        catalog.replace(GeneratorSet::empty());

        assert!(catalog.lookup("colors").is_none());
        assert!(catalog.is_empty());
        assert_eq!(pinned.name(), "colors");
        assert!(pinned.contains("red"));
        assert_eq!(pinned.set().len(), 1);
    }

    #[test]
    fn test_replace_installs_new_set() {
        let catalog = Catalog::new(colors(), SampleBounds::default());
        let before = catalog.snapshot();

        let shapes = compile(ConfigDocument::new(vec![
            GeneratorSpec::unweighted("shapes", &["circle"]),
            GeneratorSpec::unweighted("sizes", &["small"]),
        ]))
        .unwrap();
        catalog.replace(shapes);

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.category_names(),
            vec!["shapes".to_string(), "sizes".to_string()]
        );
        assert_eq!(catalog.sample("shapes", 1).unwrap(), vec!["circle".to_string()]);
        assert!(catalog.sample("colors", 1).is_err());
        // Snapshots taken earlier are unaffected.
        assert!(before.get("colors").is_some());
    }
}
