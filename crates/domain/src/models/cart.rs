//! Session-scoped shopping cart.
//!
//! The cart is a plain value: a mapping of dish id to quantity plus the
//! restaurant the cart is bound to. Every operation takes the cart in and
//! hands it back mutated; persisting it between requests is the cart
//! repository's job, not this module's.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The single-restaurant invariant would be violated.
    #[error("You can only order from one restaurant at a time. Clear the cart to switch.")]
    DifferentRestaurant,
}

/// A customer's cart for one browsing session.
///
/// Invariant: while non-empty, every dish in the cart belongs to
/// `restaurant_id`. The guard is enforced on [`Cart::add`] only; `update`
/// deliberately skips it to match the checkout flow's observable behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    restaurant_id: Option<Uuid>,
    items: BTreeMap<Uuid, u32>,
}

impl Cart {
    /// An empty, unbound cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored rows. The first row binds the restaurant;
    /// rows with non-positive quantities are discarded.
    pub fn from_rows(rows: impl IntoIterator<Item = (Uuid, Uuid, i32)>) -> Self {
        let mut cart = Cart::new();
        for (dish_id, restaurant_id, quantity) in rows {
            if quantity <= 0 {
                continue;
            }
            if cart.restaurant_id.is_none() {
                cart.restaurant_id = Some(restaurant_id);
            }
            cart.items.insert(dish_id, quantity as u32);
        }
        cart
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The restaurant this cart is bound to, while non-empty.
    pub fn restaurant_id(&self) -> Option<Uuid> {
        self.restaurant_id
    }

    /// Quantity for one dish, 0 if absent.
    pub fn quantity(&self, dish_id: Uuid) -> u32 {
        self.items.get(&dish_id).copied().unwrap_or(0)
    }

    /// Sum of all quantities; drives the cart badge.
    pub fn count(&self) -> u32 {
        self.items.values().sum()
    }

    /// Iterates entries in stable (dish id) order.
    pub fn entries(&self) -> impl Iterator<Item = (Uuid, u32)> + '_ {
        self.items.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Adds one unit of a dish, binding the cart to the dish's restaurant on
    /// first add. Fails when the cart already holds another restaurant's
    /// dishes; the cart is left untouched in that case.
    pub fn add(&mut self, dish_id: Uuid, dish_restaurant_id: Uuid) -> Result<u32, CartError> {
        match self.restaurant_id {
            Some(bound) if !self.items.is_empty() && bound != dish_restaurant_id => {
                return Err(CartError::DifferentRestaurant);
            }
            _ => {}
        }
        self.restaurant_id = Some(dish_restaurant_id);
        let qty = self.items.entry(dish_id).or_insert(0);
        *qty += 1;
        Ok(*qty)
    }

    /// Sets a dish's quantity; `qty <= 0` removes the entry. No restaurant
    /// check here (the guard lives on `add` only).
    pub fn update(&mut self, dish_id: Uuid, qty: i64) -> u32 {
        if qty <= 0 {
            self.items.remove(&dish_id);
            self.unbind_if_empty();
            0
        } else {
            let qty = qty.min(u32::MAX as i64) as u32;
            self.items.insert(dish_id, qty);
            qty
        }
    }

    /// Removes a dish entirely; no-op when absent.
    pub fn remove(&mut self, dish_id: Uuid) {
        self.items.remove(&dish_id);
        self.unbind_if_empty();
    }

    /// Empties the cart and unbinds the restaurant.
    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant_id = None;
    }

    fn unbind_if_empty(&mut self) {
        if self.items.is_empty() {
            self.restaurant_id = None;
        }
    }
}
