//! Cohort maintenance — deriving the active user/content sets from the base
//! dataset, admitting new users by engagement rank, and merging their
//! interactions into the working set.

pub mod admission;
pub mod builder;
pub mod merge;

pub use admission::select_new_users;
pub use builder::build_cohort;
pub use merge::merge_admitted;
