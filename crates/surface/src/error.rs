use thiserror::Error;

use crate::{ContainerId, NodeId};

/// Errors raised when mutating or reading a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
	/// The container was never created on this surface.
	#[error("unknown container {0:?}")]
	UnknownContainer(ContainerId),
	/// The container has been removed from the page.
	#[error("container {0:?} is detached from the surface")]
	Detached(ContainerId),
	/// The node is not a child of the container.
	#[error("node {0:?} is not a child of the container")]
	MissingNode(NodeId),
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
