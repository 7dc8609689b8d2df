use core::cmp::Ordering;

/// Z-ordering key for draw items.
///
/// Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer used for screen-space overlays (labels, HUD).
    pub const OVERLAY: ZIndex = ZIndex(i32::MAX);

    /// Layer for orbit guides. Lines are painted in a pass before any disc.
    pub const GUIDE: ZIndex = ZIndex(i32::MIN);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    /// Maps a view-space depth to a z-index so that nearer geometry sorts on top.
    ///
    /// Depth is quantized to 1/1024 units; non-finite depths go to the back.
    #[inline]
    pub fn from_depth(depth: f32) -> Self {
        if !depth.is_finite() {
            return Self(i32::MIN);
        }
        let q = (depth * 1024.0).clamp(0.0, (i32::MAX - 1) as f32);
        Self(-(q as i32))
    }
}

impl Ord for ZIndex {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ZIndex {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_depth_sorts_above_farther() {
        assert!(ZIndex::from_depth(1.0) > ZIndex::from_depth(10.0));
    }

    #[test]
    fn overlay_sorts_above_any_depth() {
        assert!(ZIndex::OVERLAY > ZIndex::from_depth(0.0));
    }

    #[test]
    fn nan_depth_goes_to_back() {
        assert_eq!(ZIndex::from_depth(f32::NAN), ZIndex(i32::MIN));
    }

    #[test]
    fn guides_sort_below_any_depth() {
        assert!(ZIndex::GUIDE < ZIndex::from_depth(1.0e6));
    }
}
