//! Products

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a cart line.
///
/// Depending on [`LineIdentity`](crate::catalog::LineIdentity) this is either the
/// catalog product id or an id minted per add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LineId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Product details captured at the moment it is added to the cart.
///
/// Later catalog changes never reach lines already in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    /// Line id the product is added under
    pub id: LineId,

    /// Display name
    pub title: String,

    /// Unit price
    pub price: Decimal,

    /// Image URI
    pub image: String,
}

impl ProductSnapshot {
    /// Create a snapshot.
    pub fn new(
        id: impl Into<LineId>,
        title: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}
