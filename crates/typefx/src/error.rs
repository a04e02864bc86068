//! Error types for animators and their configuration.

use thiserror::Error;
use typefx_surface::SurfaceError;
use typefx_worker::QueueFault;

/// Failure of a scheduled animation step.
///
/// Boundaries (running out of siblings) and cancellation are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeFxError {
	/// The surface rejected a mutation, e.g. the container was detached.
	#[error(transparent)]
	Surface(#[from] SurfaceError),
	/// The queue could not run a step to completion.
	#[error(transparent)]
	Queue(#[from] QueueFault),
}

/// Result type for animator operations.
pub type Result<T> = std::result::Result<T, TypeFxError>;

/// Errors that can occur when loading animator options.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML source could not be parsed.
	#[error("options parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A field parsed but holds an unusable value.
	#[error("invalid value for '{field}': {reason}")]
	Invalid {
		/// The option's key.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
}
