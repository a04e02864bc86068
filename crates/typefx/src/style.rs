//! Class names and the page-wide stylesheet animators rely on.

use typefx_surface::Surface;

/// Element id of the injected stylesheet.
pub const STYLE_ID: &str = "typefx-style";

/// Added to every bound container.
pub const CONTAINER_CLASS: &str = "typefx-container";
/// Marks the caret node.
pub const CARET_CLASS: &str = "typefx-caret";
/// Idle blink animation; removed while a step loop runs.
pub const CARET_BLINK_CLASS: &str = "typefx-caret-blink";
/// Hides the caret.
pub const CARET_HIDDEN_CLASS: &str = "typefx-caret-hidden";
/// Highlights nodes waiting to be consumed by a delete.
pub const SELECTED_CLASS: &str = "typefx-selected";

/// Inline custom property carrying the caret width.
pub const CARET_WIDTH_VAR: &str = "--typefx-caret-width";
/// Inline custom property carrying the caret colour.
pub const CARET_COLOR_VAR: &str = "--typefx-caret-color";

const STYLESHEET: &str = r#"
.typefx-container::after {
  content: "\200B";
  visibility: hidden;
  user-select: none;
  pointer-events: none;
}
.typefx-caret {
  position: absolute;
  display: inline-block;
  overflow: visible;
  width: 0px;
}
.typefx-caret::after {
  width: 0px;
  border-left: var(--typefx-caret-width) solid var(--typefx-caret-color);
  overflow: visible;
  content: "";
  position: relative;
}
.typefx-caret.typefx-caret-blink {
  animation: typefx-caret-blink 0.9s steps(1, end) infinite;
}
.typefx-caret.typefx-caret-hidden {
  display: none;
}
.typefx-selected {
  background-color: #00000044;
}
@keyframes typefx-caret-blink { 0%, 49% { opacity: 1; } 50%, 100% { opacity: 0; } }
"#;

/// Stylesheet text installed under [`STYLE_ID`].
pub fn stylesheet() -> &'static str {
	STYLESHEET
}

/// Installs the stylesheet once per surface; returns true on first install.
pub(crate) fn inject(surface: &Surface) -> bool {
	let installed = surface.install_stylesheet(STYLE_ID, STYLESHEET);
	if installed {
		tracing::debug!(id = STYLE_ID, "typefx.style_injected");
	}
	installed
}
