pub mod align;
mod bitset;
pub mod compare;
pub mod error;
pub mod extract;
pub mod graph;
pub mod relation;
pub mod variant;

pub use align::{LcsTable, align, edit_distance};
pub use compare::compare;
pub use error::{Error, Result};
pub use extract::{canonical, local_supremal};
pub use graph::LcsGraph;
pub use relation::Relation;
pub use variant::{Variant, patch};

/// Sentinel index meaning "absent" in the node, edge and run arenas.
pub(crate) const NONE: usize = usize::MAX;
