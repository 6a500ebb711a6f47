//! Grid storage for the Mycel trail simulation.
//!
//! - [`FieldGrid`]: the mutable multi-channel trail map, one channel per
//!   species, backed by a [`PingPongBuffer`] so diffusion passes can read a
//!   stable front buffer while writing the back buffer.
//! - [`ObstacleMask`]: immutable blocked/open cells with the grid's extent.
//! - [`FieldSnapshot`] / [`OwnedFieldSnapshot`]: read-only views handed to
//!   renderers after a tick settles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod obstacle;
pub mod pingpong;
pub mod snapshot;

pub use field::FieldGrid;
pub use obstacle::{ObstacleMask, BLOCKED_LUMA_THRESHOLD};
pub use pingpong::PingPongBuffer;
pub use snapshot::{ChannelIter, FieldRead, FieldSnapshot, OwnedFieldSnapshot};
