use vodca::{AsRefln, Fromln};

/// Stored counter of reviews. It is bumped by [`crate::entity::Book::record_review`]
/// and is not derived from the review rows, so the two can drift apart.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Fromln, AsRefln)]
pub struct ReviewCount(i32);

impl ReviewCount {
    pub fn new(count: impl Into<i32>) -> Self {
        Self(count.into())
    }

    /// `None` once the counter is at `i32::MAX`.
    pub fn increment(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

#[cfg(test)]
mod test {
    use crate::entity::ReviewCount;

    #[test]
    fn increment_stops_at_the_column_limit() {
        assert_eq!(ReviewCount::new(4).increment(), Some(ReviewCount::new(5)));
        assert_eq!(ReviewCount::new(i32::MAX).increment(), None);
    }
}
