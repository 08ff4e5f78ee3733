//! External collaborator contracts and adapters.
//!
//! The pipeline only ever talks to collaborators through the traits in
//! [`traits`]; [`remote`] provides the HTTP-backed production
//! implementations.

mod error;
mod remote;
mod traits;
mod types;

pub use error::{CompositeError, MaskError, PrepareError, PublishError};
pub use remote::RemoteStudio;
pub use traits::{Compositor, ImagePreparer, MaskBuilder, Publisher};
pub use types::{FinalArtifact, MaskHandle, PreparedImage, PublishedArtifact};
