//! Chainable typewriter animations.
//!
//! A [`TypeFx`] binds to one container on a [`Surface`] and animates its
//! content through a caret node: typing characters before it, deleting the
//! ones behind it, walking it over existing content, and selecting what it
//! walks over. Every verb returns immediately and appends a step to the
//! animator's queue; steps run one after another, never overlapping.
//!
//! ```ignore
//! let fx = TypeFx::bind(&surface, container, TypeFxOptions::default())?;
//! fx.type_text("Hello, wrold")
//! 	.wait(Duration::from_millis(400))
//! 	.move_caret(-3)
//! 	.select(-1)
//! 	.delete(0)
//! 	.move_caret(1)
//! 	.type_text("r")
//! 	.move_caret(Shift::to_end());
//! fx.settled().await?;
//! ```

mod count;
mod error;
mod fx;
mod options;
mod pacer;
mod steps;
pub mod style;

pub use count::{Count, Direction, Shift};
pub use error::{ConfigError, Result, TypeFxError};
pub use fx::TypeFx;
pub use options::{DEFAULT_CARET_COLOR, DEFAULT_CARET_WIDTH, DEFAULT_SPEED, DEFAULT_SPEED_RANGE, TypeFxOptions};
pub use typefx_surface::{ContainerId, Surface};
