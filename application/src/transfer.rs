mod author;
mod book;
mod genre;
mod review;

pub use self::{author::*, book::*, genre::*, review::*};
