//! HTML rendering for the map and the dashboard.

pub mod dashboard;
pub mod escape;
pub mod map;

pub use dashboard::{render_dashboard, DashboardSummary};
pub use escape::escape_html;
pub use map::{extract_markers, render_map_html, Marker};
