mod bounds;
mod bytes;
mod error;
mod graph;
mod hashname;
mod header;
mod merge;
mod registry;
mod section;
/// Built-in section variants.
pub mod sections;
/// On-disk section type tags.
pub mod tags;

/// Bounding-volume recomputation and transform helpers.
pub use bounds::{Bounds, recompute_bounds, scaled_bounds};
/// Little-endian read/write primitives used by section codecs.
pub use bytes::{Cursor, Writer};
/// Error and result aliases.
pub use error::{ModelError, Result};
/// In-memory section graph and its file codec.
pub use graph::{ModelGraph, SectionSummary};
/// Diesel idstring hashing.
pub use hashname::HashName;
/// File preamble and section table headers.
pub use header::{FileHeader, PreambleStyle, SectionHeader};
/// Import merge of external mesh data into a graph.
pub use merge::{ImportedObject, MergeOptions, MergeReport, MeshFragment, apply_pattern_uv, merge_fragment};
/// Tag → decoder table.
pub use registry::{DecodeFn, Registry};
/// Section trait and weak cross-reference types.
pub use section::{DanglingRef, Section, SectionLookup, SectionRef, TypedSection};
