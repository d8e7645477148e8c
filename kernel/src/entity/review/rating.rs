use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(rating: impl Into<i32>) -> Self {
        Self(rating.into())
    }

    pub fn is_in_range(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Rating;

    #[test]
    fn range() {
        assert!(Rating::new(1).is_in_range());
        assert!(Rating::new(5).is_in_range());
        assert!(!Rating::new(0).is_in_range());
        assert!(!Rating::new(6).is_in_range());
    }
}
