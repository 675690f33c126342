//! Entity definitions (database row mappings).

pub mod cart;
pub mod category;
pub mod dish;
pub mod order;
pub mod profile;
pub mod restaurant;
pub mod ticket;
pub mod user;

pub use cart::{CartItemEntity, CartLineEntity};
pub use category::CategoryEntity;
pub use dish::{CatalogDishEntity, DishEntity};
pub use order::{OrderEntity, OrderItemDetailEntity};
pub use profile::RestaurantProfileEntity;
pub use restaurant::RestaurantEntity;
pub use ticket::SupportTicketEntity;
pub use user::UserEntity;
