use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookCoverImageUrl(String);

impl BookCoverImageUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}
