mod author;
mod book;
mod common;
mod genre;
mod review;

pub use self::{author::*, book::*, common::*, genre::*, review::*};
