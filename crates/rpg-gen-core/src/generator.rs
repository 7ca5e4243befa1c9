//! Compiled generators and the immutable sets that own them

use std::collections::HashMap;

use rand::Rng;

use crate::document::GeneratorKind;
use crate::sampler::{Entry, Sampler};

/// A named, compiled collection. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Generator {
    name: String,
    /// `None` for placeholder generators built from an unknown kind.
    kind: Option<GeneratorKind>,
    sampler: Sampler,
}

impl Generator {
    pub(crate) fn new(name: String, kind: Option<GeneratorKind>, sampler: Sampler) -> Self {
        Self {
            name,
            kind,
            sampler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<GeneratorKind> {
        self.kind
    }

    pub fn entries(&self) -> &[Entry] {
        self.sampler.entries()
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.sampler.pick(rng)
    }

    /// Draw `count` independent picks.
    pub fn pick_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count).map(|_| self.pick(rng).to_string()).collect()
    }

    /// Whether `value` is one of this generator's entries.
    pub fn contains(&self, value: &str) -> bool {
        self.entries().iter().any(|e| e.value() == value)
    }
}

/// Ordered generators with unique names.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSet {
    generators: Vec<Generator>,
    by_name: HashMap<String, usize>,
}

impl GeneratorSet {
    /// Build from generators whose names are already known to be unique.
    pub(crate) fn from_unique(generators: Vec<Generator>) -> Self {
        let by_name = generators
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name.clone(), i))
            .collect();
        Self {
            generators,
            by_name,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Generator> {
        self.position(name).map(|i| &self.generators[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|g| g.name())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Generator> {
        self.generators.iter()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub(crate) fn by_index(&self, index: usize) -> &Generator {
        &self.generators[index]
    }
}

impl<'a> IntoIterator for &'a GeneratorSet {
    type Item = &'a Generator;
    type IntoIter = std::slice::Iter<'a, Generator>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
