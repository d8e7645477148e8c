mod aggregate;
mod author;
mod book;
mod genre;
mod review;

pub use self::{aggregate::*, author::*, book::*, genre::*, review::*};
