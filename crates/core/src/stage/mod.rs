//! Stage runners.
//!
//! One runner per concurrency policy: [`run_parallel`] fans out and waits
//! for every unit to settle; [`SequentialRunner`] serializes calls to the
//! rate-limited collaborator with a minimum gap between them.

mod parallel;
mod sequential;
mod types;

pub use parallel::run_parallel;
pub use sequential::SequentialRunner;
pub use types::{Settled, StageError};
