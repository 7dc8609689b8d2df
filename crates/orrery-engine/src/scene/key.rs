use super::ZIndex;

/// Paint-order key: back-to-front by `z`, then by insertion.
///
/// Field order matters: the derived ordering compares `z` first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    /// Position in the draw list, breaking ties within one layer.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_layer_dominates_insertion() {
        let far_late = SortKey::new(ZIndex::from_depth(30.0), 9);
        let near_early = SortKey::new(ZIndex::from_depth(10.0), 0);
        assert!(far_late < near_early);
        assert!(SortKey::new(ZIndex::OVERLAY, 0) > near_early);
    }

    #[test]
    fn insertion_breaks_ties() {
        assert!(SortKey::new(ZIndex(3), 1) < SortKey::new(ZIndex(3), 2));
    }
}
