//! Cartkit
//!
//! Cartkit is the state core of a client-side shopping cart: an ordered list of
//! products persisted to key-value storage, derived totals, and DOM-free render
//! models for the cart panel, badge, toast notifications and product card
//! slideshows.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod notifications;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod slideshow;
pub mod storage;
pub mod store;
pub mod view;
