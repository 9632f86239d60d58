// src/lib.rs
//! Batch transformations used to annotate genomes with functional clusters
//! (FCs): PSI-BLAST filtering, KEGG BRITE lookups, cluster sequence
//! resolution, cluster membership reshaping and annotation joins.
//!
//! Each module exposes the pure transformation plus a `run` function that
//! reads the input files, applies it and writes the output file.
pub mod error;
pub mod io;
pub mod types;
pub mod clusters;
pub mod psiblast;
pub mod brite;
pub mod traits;
pub mod reshape;
pub mod matchfcs;

pub use crate::brite::{BriteSource, KeggRestClient};
pub use crate::clusters::{ClusterEntry, ClusterTable};
pub use crate::error::{FcError, Result};
pub use crate::types::{BriteLevels, BriteRow, GenomeProtein, MembershipRow, TraitRecord};
