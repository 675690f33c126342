//! Repository implementations.

pub mod cart;
pub mod category;
pub mod dashboard;
pub mod dish;
pub mod order;
pub mod profile;
pub mod restaurant;
pub mod ticket;
pub mod user;

pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use dashboard::DashboardRepository;
pub use dish::{DishRepository, NewDish, UpdateDish};
pub use order::OrderRepository;
pub use profile::ProfileRepository;
pub use restaurant::RestaurantRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;
