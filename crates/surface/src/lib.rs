//! In-memory rendering surface for typefx.
//!
//! Models the small part of a page an animator touches: containers holding
//! an ordered list of single-character nodes, class lists, inline style
//! properties, a page-wide stylesheet registry, and one attachment slot per
//! container for back-references from whatever is bound to it.

mod container;
mod error;
mod node;
mod surface;

pub use container::Container;
pub use error::{Result, SurfaceError};
pub use node::{Node, NodeId, NodeKind};
pub use surface::{ContainerId, Surface};
