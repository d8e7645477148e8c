use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, Eq, PartialEq, Fromln, AsRefln)]
pub struct ReviewComment(String);

impl ReviewComment {
    pub fn new(comment: impl Into<String>) -> Self {
        Self(comment.into())
    }
}
