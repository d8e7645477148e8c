use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct ReviewId(i32);

impl ReviewId {
    pub fn new(id: impl Into<i32>) -> Self {
        Self(id.into())
    }
}
