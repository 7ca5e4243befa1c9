//! Weighted random generators with a hot-swappable catalog
//!
//! This crate provides the data model behind the rpg-gen server:
//! - Parsing of versioned generator documents (YAML or JSON)
//! - Validation and compilation into immutable, weighted samplers
//! - A `Catalog` that serves picks while the whole dataset can be replaced
//!   atomically at runtime
//!
//! # Example
//!
//! ```
//! use rpg_gen_core::{Catalog, CompilePolicy, GeneratorSet, SampleBounds};
//!
//! let set = GeneratorSet::from_yaml_str(
//!     "version: 1\ngenerators:\n  - name: colors\n    type: unweighted\n    entries: [red, blue]\n",
//!     &CompilePolicy::default(),
//! )
//! .unwrap();
//!
//! let catalog = Catalog::new(set, SampleBounds::default());
//! let picks = catalog.sample("colors", 3).unwrap();
//! assert_eq!(picks.len(), 3);
//! ```

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod sampler;

pub use catalog::{Catalog, GeneratorRef};
pub use compiler::{compile, compile_with};
pub use config::{CompilePolicy, DuplicatePolicy, SampleBounds, UnknownKindPolicy};
pub use document::{ConfigDocument, EntrySpec, GeneratorKind, GeneratorSpec};
pub use error::{CompileError, ConfigError, LoadError, NotFoundError, ParseError};
pub use generator::{Generator, GeneratorSet};
pub use sampler::{Entry, Sampler};
