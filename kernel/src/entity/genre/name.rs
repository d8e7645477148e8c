use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct GenreName(String);

impl GenreName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
