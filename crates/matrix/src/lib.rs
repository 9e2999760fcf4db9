//! Sparse and dense representations of the user×content rating matrix.

pub mod surface;
pub mod triples;

pub use surface::RatingSurface;
pub use triples::{RatingTriple, TripleTable};
