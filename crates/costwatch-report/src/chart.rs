//! Donut chart geometry for cost breakdowns
//!
//! Each breakdown entry becomes one ring segment drawn with a stroke dash on
//! a circle of radius 100, so the full ring is 628 units long. Segments
//! start at the top of the ring and run clockwise in input order.

use crate::format::{format_currency, html_escape};
use costwatch_core::types::BreakdownEntry;

/// Ring length for a radius of 100
pub const DONUT_CIRCUMFERENCE: f64 = 628.0;

const RING_RADIUS: u32 = 100;
const RING_WIDTH: u32 = 20;
const CENTER: u32 = 140;

/// Segment colors, reused cyclically
pub const SEGMENT_COLORS: &[&str] = &[
    "#00d4ff", "#00ff88", "#ffb000", "#ff4757", "#8b5cf6", "#64ffda",
];

/// One ring segment
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    /// Tag or service name
    pub label: String,
    /// Cost in USD
    pub cost: f64,
    /// Share of the breakdown total, 0-100
    pub percent: f64,
    /// Stroke dash length on the ring
    pub dash_length: f64,
    /// Rotation in degrees where the segment starts
    pub rotation: f64,
    /// Fill color
    pub color: &'static str,
}

/// Compute ring segments for a breakdown
///
/// Shares are taken against the breakdown's own sum. When that sum is zero
/// every segment is empty instead of dividing by zero.
///
/// # Examples
/// ```
/// use costwatch_core::types::BreakdownEntry;
/// use costwatch_report::chart::donut_segments;
///
/// let segments = donut_segments(&[
///     BreakdownEntry::new("Production", 75.0),
///     BreakdownEntry::new("Staging", 25.0),
/// ]);
/// assert_eq!(segments[0].percent, 75.0);
/// assert_eq!(segments[0].rotation, -90.0);
/// assert_eq!(segments[1].rotation, 180.0);
/// ```
pub fn donut_segments(entries: &[BreakdownEntry]) -> Vec<DonutSegment> {
    let total: f64 = entries.iter().map(|e| e.cost).sum();
    let mut preceding = 0.0;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let percent = if total > 0.0 {
                entry.cost / total * 100.0
            } else {
                0.0
            };
            let segment = DonutSegment {
                label: entry.label.clone(),
                cost: entry.cost,
                percent,
                dash_length: percent / 100.0 * DONUT_CIRCUMFERENCE,
                rotation: preceding / 100.0 * 360.0 - 90.0,
                color: SEGMENT_COLORS[index % SEGMENT_COLORS.len()],
            };
            preceding += percent;
            segment
        })
        .collect()
}

/// Render the ring as an inline SVG element
pub fn render_donut_svg(segments: &[DonutSegment]) -> String {
    let total: f64 = segments.iter().map(|s| s.cost).sum();
    let circles: Vec<String> = segments
        .iter()
        .map(|segment| {
            format!(
                r#"<circle cx="{CENTER}" cy="{CENTER}" r="{RING_RADIUS}" fill="none" stroke="{color}" stroke-width="{RING_WIDTH}" stroke-dasharray="{dash:.2} {DONUT_CIRCUMFERENCE}" transform="rotate({rotation:.2} {CENTER} {CENTER})"><title>{label}</title></circle>"#,
                color = segment.color,
                dash = segment.dash_length,
                rotation = segment.rotation,
                label = html_escape(&segment.label),
            )
        })
        .collect();

    format!(
        r#"<svg width="280" height="280" viewBox="0 0 280 280">
<circle cx="{CENTER}" cy="{CENTER}" r="{RING_RADIUS}" fill="none" stroke="rgba(35, 53, 84, 0.3)" stroke-width="{RING_WIDTH}"/>
{circles}
<text x="{CENTER}" y="{CENTER}" text-anchor="middle" font-size="24" font-weight="bold">{total}</text>
</svg>"#,
        circles = circles.join("\n"),
        total = format_currency(total),
    )
}
