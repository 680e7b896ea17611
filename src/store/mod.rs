//! Per-session in-memory stores. Nothing here is persisted; a store lives
//! exactly as long as the session that owns it.

pub mod cart;
pub mod interactions;

pub use cart::{CartItem, CartStore};
pub use interactions::{Comment, InteractionStore};
