mod operation;
mod time;
mod version;

pub use self::{operation::*, time::*, version::*};
