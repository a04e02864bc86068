//! Animator options.
//!
//! Options can be built in code or loaded from a TOML fragment using the
//! same keys the stylesheet variables and timing use:
//!
//! ```toml
//! speed = 80        # base per-step delay, milliseconds
//! speedRange = 40   # jitter span, milliseconds
//! caretWidth = "2px"
//! caretColor = "#ff0066"
//! seed = 7          # optional, makes jitter reproducible
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Default base delay between animation steps.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(50);
/// Default jitter span around the base delay.
pub const DEFAULT_SPEED_RANGE: Duration = Duration::from_millis(50);
/// Default caret thickness, a thin line relative to the font size.
pub const DEFAULT_CARET_WIDTH: &str = "0.05em";
/// Default caret colour: inherit the text colour.
pub const DEFAULT_CARET_COLOR: &str = "currentColor";

/// Timing and caret appearance for one animator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeFxOptions {
	/// Base delay after each animation step.
	#[serde(deserialize_with = "millis")]
	pub speed: Duration,
	/// Span of the random jitter centred on `speed`.
	#[serde(deserialize_with = "millis")]
	pub speed_range: Duration,
	/// CSS length used for the caret's border.
	pub caret_width: String,
	/// CSS colour used for the caret's border.
	pub caret_color: String,
	/// Seed for the jitter generator; random when absent.
	pub seed: Option<u64>,
}

impl Default for TypeFxOptions {
	fn default() -> Self {
		Self {
			speed: DEFAULT_SPEED,
			speed_range: DEFAULT_SPEED_RANGE,
			caret_width: DEFAULT_CARET_WIDTH.to_string(),
			caret_color: DEFAULT_CARET_COLOR.to_string(),
			seed: None,
		}
	}
}

impl TypeFxOptions {
	pub fn with_speed(mut self, speed: Duration) -> Self {
		self.speed = speed;
		self
	}

	pub fn with_speed_range(mut self, range: Duration) -> Self {
		self.speed_range = range;
		self
	}

	pub fn with_caret_width(mut self, width: impl Into<String>) -> Self {
		self.caret_width = width.into();
		self
	}

	pub fn with_caret_color(mut self, color: impl Into<String>) -> Self {
		self.caret_color = color.into();
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Parses and validates options from TOML; missing keys keep defaults.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let options: Self = toml::from_str(src)?;
		options.validate()?;
		Ok(options)
	}

	/// Rejects values the stylesheet cannot use.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.caret_width.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "caretWidth",
				reason: "must be a non-empty CSS length",
			});
		}
		if self.caret_color.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "caretColor",
				reason: "must be a non-empty CSS colour",
			});
		}
		Ok(())
	}
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
	u64::deserialize(deserializer).map(Duration::from_millis)
}
