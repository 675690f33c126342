//! Domain models for FoodBooking.

pub mod caller;
pub mod cart;
pub mod catalog;
pub mod category;
pub mod dashboard;
pub mod dish;
pub mod order;
pub mod profile;
pub mod restaurant;
pub mod ticket;
pub mod user;

pub use caller::Caller;
pub use cart::{Cart, CartError};
pub use catalog::{
    group_by_category, CatalogDish, CategoryGroup, DishFilter, PriceBand, SortKey, VegFilter,
};
pub use category::Category;
pub use dashboard::{DashboardMetrics, TopDish};
pub use dish::Dish;
pub use order::{NewOrder, NewOrderLine, Order, OrderItem, PaymentMethod};
pub use profile::{RestaurantProfile, StaffRole};
pub use restaurant::Restaurant;
pub use ticket::{SupportTicket, TicketStatus};
pub use user::User;
