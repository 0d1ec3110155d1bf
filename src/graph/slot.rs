use std::fmt;

/// Identifies one polygon slot in a working set.
///
/// Slots are assigned contiguous indices starting from `0` in descending-area
/// order when the working set is built.  A slot keeps its index for the whole
/// run; merging a polygon away retires its slot rather than renumbering the
/// slots after it, so the matrix and the polygon list can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}

impl From<usize> for SlotId {
    #[inline] fn from(index: usize) -> Self { Self(index as u32) }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}
