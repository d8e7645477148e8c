use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct GenreId(i32);

impl GenreId {
    pub fn new(id: impl Into<i32>) -> Self {
        Self(id.into())
    }
}
