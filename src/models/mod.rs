//! Data transfer objects (DTOs) for API responses and page messages.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `commit`: Commit, the normalized log record
//! - `repository`: RepositoryEntry, RepositoryListing, SelectionRequest
//! - `message`: RenderPayload, OutboundMessage, InboundIntent, CopyAck
//! - `view`: ViewModel, DerivedGroup, ViewStats, TaggedCommit

pub mod commit;
pub mod message;
pub mod repository;
pub mod view;

pub use commit::*;
pub use message::*;
pub use repository::*;
pub use view::*;
