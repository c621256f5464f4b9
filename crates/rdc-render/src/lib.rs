//! Host surfaces for scratch notes: a text measurer, an SVG renderer and a
//! plain-text renderer for terminals.

pub mod metrics;
pub mod plain;
pub mod svg;
pub mod theme;

pub use metrics::EstimateMeasurer;
pub use plain::render_plain;
pub use svg::render_svg;
pub use theme::RenderTheme;
