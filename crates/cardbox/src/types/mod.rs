//! Inventory data model.

pub mod card;
pub mod deck;
pub mod edition;
