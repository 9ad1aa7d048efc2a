//! Hand styles and dial layout
//!
//! Every style the watch ships with is a named preset; which one is active
//! is a persisted index (see [`crate::sync::SyncState`]).

use embedded_graphics::geometry::Point;

/// Geometry of one hand in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandDims {
    /// Distance from the dial centre to the tip
    pub length: i32,
    /// Width of the hand at the centre
    pub width: i32,
    /// Outline thickness; 0 draws a solid hand
    pub border: i32,
}

impl HandDims {
    pub const fn new(length: i32, width: i32, border: i32) -> Self {
        Self {
            length,
            width,
            border,
        }
    }
}

/// A complete set of hands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandStyle {
    pub name: &'static str,
    pub hour: HandDims,
    pub minute: HandDims,
    pub second: HandDims,
}

impl HandStyle {
    /// Broad hour hand, outlined minute hand
    pub const BOLD: HandStyle = HandStyle {
        name: "bold",
        hour: HandDims::new(45, 25, 0),
        minute: HandDims::new(75, 10, 6),
        second: HandDims::new(20, 1, 0),
    };

    /// Slim hands with a thin minute outline
    pub const SLIM: HandStyle = HandStyle {
        name: "slim",
        hour: HandDims::new(45, 10, 0),
        minute: HandDims::new(75, 8, 2),
        second: HandDims::new(20, 1, 0),
    };

    /// All presets, addressed by the persisted style index
    pub const PRESETS: &'static [HandStyle] = &[Self::BOLD, Self::SLIM];

    /// Index used when nothing valid has been persisted
    pub const DEFAULT_INDEX: u8 = 1;

    /// Look up a preset, falling back to the default for stale indices
    pub fn by_index(index: u8) -> &'static HandStyle {
        Self::PRESETS
            .get(usize::from(index))
            .unwrap_or(&Self::PRESETS[Self::DEFAULT_INDEX as usize])
    }

    /// Look up a preset by name
    pub fn by_name(name: &str) -> Option<(u8, &'static HandStyle)> {
        Self::PRESETS
            .iter()
            .enumerate()
            .find(|(_, style)| style.name == name)
            .map(|(i, style)| (i as u8, style))
    }
}

impl Default for HandStyle {
    fn default() -> Self {
        *Self::by_index(Self::DEFAULT_INDEX)
    }
}

/// Dial layout of the watchface bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialConfig {
    /// Pivot point of all hands
    pub center: Point,
    /// Radius of the centre dot drawn over the hands
    pub center_dot_radius: u32,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            center: Point::new(85, 85),
            center_dot_radius: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_keep_original_dimensions() {
        assert_eq!(HandStyle::BOLD.hour, HandDims::new(45, 25, 0));
        assert_eq!(HandStyle::BOLD.minute, HandDims::new(75, 10, 6));
        assert_eq!(HandStyle::SLIM.minute, HandDims::new(75, 8, 2));
        assert_eq!(HandStyle::SLIM.second, HandDims::new(20, 1, 0));
    }

    #[test]
    fn test_stale_index_falls_back_to_default() {
        assert_eq!(HandStyle::by_index(0).name, "bold");
        assert_eq!(HandStyle::by_index(1).name, "slim");
        assert_eq!(HandStyle::by_index(200), &HandStyle::SLIM);
        assert_eq!(HandStyle::default(), HandStyle::SLIM);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(HandStyle::by_name("bold").map(|(i, _)| i), Some(0));
        assert!(HandStyle::by_name("ornate").is_none());
    }
}
