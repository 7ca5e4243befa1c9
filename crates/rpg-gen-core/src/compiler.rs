//! Validation and compilation of generator documents
//!
//! The whole document compiles or nothing does: any invalid generator fails
//! the compile, so a caller never installs a partial dataset.

use std::collections::HashMap;

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::config::{CompilePolicy, DuplicatePolicy, UnknownKindPolicy};
use crate::document::{ConfigDocument, EntrySpec, GeneratorKind, GeneratorSpec, CURRENT_VERSION};
use crate::error::{CompileError, LoadError};
use crate::generator::{Generator, GeneratorSet};
use crate::sampler::{scale_weight, Entry, Sampler};

/// Compile with the strict default policy.
pub fn compile(doc: ConfigDocument) -> Result<GeneratorSet, CompileError> {
    compile_with(doc, &CompilePolicy::default())
}

/// Compile a document into an immutable `GeneratorSet`.
pub fn compile_with(
    doc: ConfigDocument,
    policy: &CompilePolicy,
) -> Result<GeneratorSet, CompileError> {
    if doc.version != CURRENT_VERSION {
        return Err(CompileError::UnsupportedVersion(doc.version));
    }

    let mut generators: Vec<Generator> = Vec::with_capacity(doc.generators.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, spec) in doc.generators.into_iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(CompileError::EmptyName { index });
        }

        let existing = positions.get(&spec.name).copied();
        if existing.is_some() && policy.duplicates == DuplicatePolicy::Reject {
            return Err(CompileError::DuplicateName(spec.name));
        }

        let generator = compile_generator(spec, policy)?;
        match existing {
            Some(pos) => {
                warn!(
                    "Generator '{}' declared more than once; keeping the last declaration",
                    generator.name()
                );
                generators[pos] = generator;
            }
            None => {
                positions.insert(generator.name().to_string(), generators.len());
                generators.push(generator);
            }
        }
    }

    debug!("Compiled {} generators", generators.len());
    Ok(GeneratorSet::from_unique(generators))
}

impl GeneratorSet {
    /// Parse and compile YAML (or JSON) text in one step.
    pub fn from_yaml_str(text: &str, policy: &CompilePolicy) -> Result<Self, LoadError> {
        let doc = ConfigDocument::from_yaml_str(text)?;
        Ok(compile_with(doc, policy)?)
    }

    pub fn from_slice(bytes: &[u8], policy: &CompilePolicy) -> Result<Self, LoadError> {
        let doc = ConfigDocument::from_slice(bytes)?;
        Ok(compile_with(doc, policy)?)
    }
}

/// Diagnostic entry used by `UnknownKindPolicy::Placeholder`.
pub fn placeholder_entry(kind: &str) -> String {
    format!("invalid type: {}. THIS IS A BUG", kind)
}

fn compile_generator(spec: GeneratorSpec, policy: &CompilePolicy) -> Result<Generator, CompileError> {
    let GeneratorSpec {
        name,
        kind: raw_kind,
        entries: raw_entries,
    } = spec;

    let Some(kind) = GeneratorKind::parse(&raw_kind) else {
        return match policy.unknown_kind {
            UnknownKindPolicy::Reject => Err(CompileError::UnknownKind {
                name,
                kind: raw_kind,
            }),
            UnknownKindPolicy::Placeholder => {
                warn!(
                    "Generator '{}' has unknown type '{}'; serving a placeholder entry",
                    name, raw_kind
                );
                let sampler = Sampler::new(&name, vec![Entry::new(placeholder_entry(&raw_kind), 1)])?;
                Ok(Generator::new(name, None, sampler))
            }
        };
    };

    let entries = raw_entries
        .iter()
        .enumerate()
        .map(|(index, raw)| resolve_entry(&name, kind, index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let sampler = Sampler::new(&name, entries)?;
    debug!(
        "Compiled {} generator '{}' ({} entries, total weight {})",
        kind,
        name,
        sampler.entries().len(),
        sampler.total_weight()
    );

    Ok(Generator::new(name, Some(kind), sampler))
}

fn resolve_entry(
    name: &str,
    kind: GeneratorKind,
    index: usize,
    raw: &Value,
) -> Result<Entry, CompileError> {
    let spec = EntrySpec::resolve(kind, raw).map_err(|reason| CompileError::MalformedEntry {
        name: name.to_string(),
        index,
        reason,
    })?;

    match spec {
        EntrySpec::Unweighted(value) => Ok(Entry::new(value, 1)),
        EntrySpec::Weighted(value, weight) => {
            let scaled = scale_weight(weight).ok_or_else(|| CompileError::InvalidWeight {
                name: name.to_string(),
                index,
                weight,
            })?;
            Ok(Entry::new(value, scaled))
        }
    }
}
