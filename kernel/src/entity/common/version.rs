use std::marker::PhantomData;

/// Row version used for optimistic concurrency. A freshly inserted row starts
/// at [`RowVersion::initial`] and every committed update moves it to [`RowVersion::next`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowVersion<T>(i64, PhantomData<T>);

impl<T> RowVersion<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    pub fn initial() -> Self {
        Self::new(0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.0.saturating_add(1))
    }
}

impl<T> From<i64> for RowVersion<T> {
    fn from(version: i64) -> Self {
        Self::new(version)
    }
}

impl<T> From<RowVersion<T>> for i64 {
    fn from(version: RowVersion<T>) -> Self {
        version.0
    }
}

impl<T> AsRef<i64> for RowVersion<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::RowVersion;

    #[test]
    fn next_is_one_ahead() {
        let version = RowVersion::<()>::initial();
        assert_eq!(*version.as_ref(), 0);
        assert_eq!(version.next(), RowVersion::new(1));
        assert_eq!(i64::from(version.next().next()), 2);
    }
}
