//! Hand geometry
//!
//! Screen space is row-major with the origin top-left: +x right, +y down.
//! Angles are in degrees with 0 at 12 o'clock, increasing clockwise. All
//! arithmetic is integer via [`crate::trig`].

use embedded_graphics::geometry::Point;
use heapless::Vec;

use crate::style::{DialConfig, HandDims, HandStyle};
use crate::time::CivilDateTime;
use crate::trig::{cos_k, from_k, sin_k};

/// Point list of one hand polygon (line or triangle)
pub type Outline = Vec<Point, 3>;

/// Tip of a hand of `length` pixels pointing at `angle_deg`
pub fn hand_endpoint(angle_deg: i32, length: i32, center: Point) -> Point {
    Point::new(
        center.x + from_k(length * sin_k(angle_deg)),
        center.y - from_k(length * cos_k(angle_deg)),
    )
}

/// Polygon footprint of a hand, consumed by the rasteriser
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandShape {
    /// Filled in the foreground colour. Two points for a hairline hand,
    /// otherwise `[base_left, tip, base_right]`.
    pub outline: Outline,
    /// Filled in the background colour on top of `outline` to leave a
    /// border of the configured thickness
    pub inner: Option<Outline>,
}

impl HandShape {
    /// Tip of the hand
    pub fn tip(&self) -> Point {
        self.outline.get(1).copied().unwrap_or_default()
    }

    /// Whether this hand is drawn as a single line
    pub fn is_line(&self) -> bool {
        self.outline.len() == 2
    }
}

/// Compute the polygon of a hand
///
/// Widths of 0 or 1 produce a line from the centre to the tip. Wider hands
/// are triangles whose base straddles the centre perpendicular to the hand.
pub fn hand_polygon(angle_deg: i32, dims: HandDims, center: Point) -> HandShape {
    let tip = hand_endpoint(angle_deg, dims.length, center);
    if dims.width <= 1 {
        return HandShape {
            outline: Vec::from_slice(&[center, tip]).unwrap_or_default(),
            inner: None,
        };
    }

    let outline = triangle(angle_deg, half_width(dims.width), tip, center);

    // The border is taken off the full width and off the length
    let inner_width = dims.width - dims.border;
    let inner_length = dims.length - dims.border;
    let inner = (dims.border > 0 && inner_width > 0 && inner_length > 0).then(|| {
        let inner_tip = hand_endpoint(angle_deg, inner_length, center);
        triangle(angle_deg, half_width(inner_width), inner_tip, center)
    });

    HandShape { outline, inner }
}

/// Base offset from the centre, rounded up
fn half_width(width: i32) -> i32 {
    (width + 1) / 2
}

fn triangle(angle_deg: i32, half_width: i32, tip: Point, center: Point) -> Outline {
    let left = hand_endpoint(angle_deg - 90, half_width, center);
    let right = hand_endpoint(angle_deg + 90, half_width, center);
    let mut points = Vec::new();
    // Capacity is exactly three
    let _ = points.push(left);
    let _ = points.push(tip);
    let _ = points.push(right);
    points
}

/// Angles of the three hands for a wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandAngles {
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl HandAngles {
    /// Hour hand advances half a degree per minute; minute and second
    /// hands step six degrees.
    pub fn from_time(hour: u8, minute: u8, second: u8) -> Self {
        let (h, m, s) = (i32::from(hour), i32::from(minute), i32::from(second));
        Self {
            hour: 30 * (h % 12) + m / 2,
            minute: 6 * m,
            second: 6 * s,
        }
    }
}

/// Polygons for all three hands of the dial
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialHands {
    pub hour: HandShape,
    pub minute: HandShape,
    pub second: HandShape,
}

impl DialHands {
    pub fn compute(local: &CivilDateTime, style: &HandStyle, dial: &DialConfig) -> Self {
        let angles = HandAngles::from_time(local.hour, local.minute, local.second);
        Self {
            hour: hand_polygon(angles.hour, style.hour, dial.center),
            minute: hand_polygon(angles.minute, style.minute, dial.center),
            second: hand_polygon(angles.second, style.second, dial.center),
        }
    }
}
