use std::cmp::Ordering;

/// Which child of a node we're talking about. Rotations and rebalancing are written once in
/// terms of a `Direction` and its [`mirror`][Direction::mirror] instead of once per side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    /// The other side.
    pub(crate) fn mirror(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The side a search for a key descends into, given how the key compares to the current
    /// node's key. `None` means the key was found.
    pub(crate) fn towards(ordering: Ordering) -> Option<Self> {
        match ordering {
            Ordering::Less => Some(Self::Left),
            Ordering::Equal => None,
            Ordering::Greater => Some(Self::Right),
        }
    }
}
