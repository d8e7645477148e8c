use rust_decimal::Decimal;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookPrice(Decimal);

impl BookPrice {
    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }
}
