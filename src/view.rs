//! Cart view
//!
//! A DOM-free render model of the cart sidebar. [`CartView`] observes a
//! [`CartStore`] and rebuilds its [`CartSummary`] after every change; user
//! actions on a rendered line come back in as [`ViewAction`]s.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    cart::{Cart, CartLine},
    pricing::{Totals, format_amount},
    products::LineId,
    storage::StorageBackend,
    store::{CartError, CartEvent, CartObserver, CartStore, ChangeKind},
};

/// Cart badge next to the cart icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Badge {
    /// Total quantity in the cart
    pub count: u64,

    /// Hidden when the cart is empty
    pub hidden: bool,
}

impl Badge {
    /// Badge showing `count`, hidden at zero.
    #[must_use]
    pub fn new(count: u64) -> Self {
        Self {
            count,
            hidden: count == 0,
        }
    }
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    /// Line id, used to route quantity controls back to the store
    pub id: LineId,

    /// Display name
    pub title: String,

    /// Image URI
    pub image: String,

    /// Quantity
    pub quantity: u32,

    /// Formatted unit price
    pub unit_price: String,

    /// Formatted `unit_price * quantity`
    pub subtotal: String,
}

impl LineRow {
    fn new(line: &CartLine, currency: &'static Currency) -> Self {
        Self {
            id: line.id,
            title: line.title.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: format_amount(line.price, currency),
            subtotal: format_amount(line.subtotal(), currency),
        }
    }
}

/// Everything needed to draw the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Lines in add order
    pub rows: Vec<LineRow>,

    /// Unformatted total
    pub total_amount: Decimal,

    /// Formatted total
    pub total: String,

    /// Badge state
    pub badge: Badge,
}

impl CartSummary {
    /// Build the render model for `cart`.
    #[must_use]
    pub fn new(cart: &Cart, currency: &'static Currency) -> Self {
        let totals = Totals::from(cart);

        Self {
            rows: cart.iter().map(|line| LineRow::new(line, currency)).collect(),
            total_amount: totals.total,
            total: format_amount(totals.total, currency),
            badge: Badge::new(totals.item_count),
        }
    }

    /// Check if there are no lines to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the summary as a table followed by the total.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_table(&self, out: &mut impl io::Write) -> io::Result<()> {
        if self.is_empty() {
            return writeln!(out, "Your cart is empty.");
        }

        let mut builder = Builder::default();

        builder.push_record(["ID", "Item", "Qty", "Price", "Subtotal"]);

        for row in &self.rows {
            builder.push_record([
                row.id.to_string(),
                row.title.clone(),
                row.quantity.to_string(),
                row.unit_price.clone(),
                row.subtotal.clone(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Items: {}", self.badge.count)?;
        writeln!(out, " Total: {}", self.total)
    }
}

/// A user action on a rendered cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// "+" control
    Increment(LineId),

    /// "-" control
    Decrement(LineId),

    /// Remove control
    Remove(LineId),
}

impl<S: StorageBackend, O: CartObserver> CartStore<S, O> {
    /// Apply a view action to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persist`] if the resulting cart could not be saved.
    pub fn apply(&mut self, action: ViewAction) -> Result<ChangeKind, CartError> {
        match action {
            ViewAction::Increment(id) => self.update_quantity(id, 1),
            ViewAction::Decrement(id) => self.update_quantity(id, -1),
            ViewAction::Remove(id) => self.remove_item(id).map(|removed| {
                if removed {
                    ChangeKind::ItemRemoved
                } else {
                    ChangeKind::NotFound
                }
            }),
        }
    }
}

/// Render model kept in sync with a store.
#[derive(Debug, Clone)]
pub struct CartView {
    currency: &'static Currency,
    summary: CartSummary,
    panel_open: bool,
    renders: u64,
}

impl CartView {
    /// Create a view for an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            summary: CartSummary::new(&Cart::new(), currency),
            panel_open: false,
            renders: 0,
        }
    }

    /// Latest render model.
    #[must_use]
    pub fn summary(&self) -> &CartSummary {
        &self.summary
    }

    /// Badge state.
    #[must_use]
    pub fn badge(&self) -> Badge {
        self.summary.badge
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Open the cart panel.
    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// Close the cart panel.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Toggle the cart panel, returning the new state.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_open = !self.panel_open;
        self.panel_open
    }

    /// Number of times the summary has been rebuilt.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn render(&mut self, cart: &Cart) {
        self.summary = CartSummary::new(cart, self.currency);
        self.renders += 1;
    }
}

impl CartObserver for CartView {
    fn on_change(&mut self, event: &CartEvent, cart: &Cart) {
        self.render(cart);

        if event.open_panel {
            self.open_panel();
        }
    }

    fn on_load(&mut self, cart: &Cart) {
        self.render(cart);
    }
}
