//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{LineId, ProductSnapshot};

/// Reasons a list of lines cannot form a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCart {
    /// Two lines share the same id.
    #[error("line {0} appears more than once")]
    DuplicateLine(LineId),

    /// A line has a quantity of zero.
    #[error("line {0} has zero quantity")]
    ZeroQuantity(LineId),
}

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line id
    pub id: LineId,

    /// Display name captured at add time
    pub title: String,

    /// Unit price captured at add time
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,

    /// Image URI captured at add time
    pub image: String,

    /// Number of units, never zero while the line is in a cart
    pub quantity: u32,
}

impl CartLine {
    /// Create a line holding a single unit of `product`.
    #[must_use]
    pub fn new(product: ProductSnapshot) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// `price * quantity`, saturating at the decimal range.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered lines in add order, each id appearing at most once.
///
/// Serializes as a bare JSON array of lines. Deserializing rejects arrays that
/// break the id or quantity invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing lines.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCart`] if ids repeat or a quantity is zero.
    pub fn with_lines(lines: impl Into<Vec<CartLine>>) -> Result<Self, InvalidCart> {
        let lines = lines.into();

        for (i, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(InvalidCart::ZeroQuantity(line.id));
            }

            if lines.iter().take(i).any(|earlier| earlier.id == line.id) {
                return Err(InvalidCart::DuplicateLine(line.id));
            }
        }

        Ok(Self { lines })
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Iterate over lines in add order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Lines in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: LineId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub(crate) fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub(crate) fn remove(&mut self, id: LineId) -> Option<CartLine> {
        let position = self.lines.iter().position(|line| line.id == id)?;

        Some(self.lines.remove(position))
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = InvalidCart;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::with_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
