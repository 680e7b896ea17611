use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ProductDetails;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub product: ProductDetails,
    pub quantity: u32,
}

/// Cart lines in insertion order, at most one per product id.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, merging into an existing line with the same id.
    /// Returns the line's quantity afterwards.
    pub fn add_to_cart(&mut self, product: ProductDetails) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
            return item.quantity;
        }
        self.items.push(CartItem {
            product,
            quantity: 1,
        });
        1
    }

    pub fn cart_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}
