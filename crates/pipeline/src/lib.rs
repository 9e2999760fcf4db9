//! The batch pipeline: read interactions, admit new users, merge, build the
//! rating matrix, and complete it with the similarity engine.

pub mod io;
pub mod predict;
pub mod run;

pub use predict::{complete_surface, Prediction};
pub use run::{run, RunReport};
