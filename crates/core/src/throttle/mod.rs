//! Rate limiting for the throttled collaborator.

mod clock;
mod pacer;

pub use clock::{Clock, TokioClock};
pub use pacer::Pacer;
