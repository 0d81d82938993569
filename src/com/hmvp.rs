use super::*;

/// History-based motion vector predictor table.
///
/// Entries are kept oldest first. An entry identical to a new one is
/// removed before the new one is appended, otherwise the oldest entry is
/// evicted once the table holds `MAX_NUM_HMVP_CANDS`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HmvpTable {
    cands: Vec<MotionInfo>,
}

impl HmvpTable {
    pub fn new() -> Self {
        HmvpTable {
            cands: Vec::with_capacity(MAX_NUM_HMVP_CANDS),
        }
    }

    pub fn reset(&mut self) {
        self.cands.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cands.is_empty()
    }

    /// Entries from the most recent to the oldest.
    pub fn newest_first(&self) -> impl Iterator<Item = &MotionInfo> {
        self.cands.iter().rev()
    }

    pub fn add(&mut self, mi: &MotionInfo) {
        let mi = mi.canonical();
        if let Some(pos) = self.cands.iter().position(|c| c.has_same_motion(&mi)) {
            self.cands.remove(pos);
        } else if self.cands.len() == MAX_NUM_HMVP_CANDS {
            self.cands.remove(0);
        }
        self.cands.push(mi);
    }
}
