pub mod category;
pub mod product;
pub mod stock;
pub mod user;

pub use category::{Category, CategoryInput};
pub use product::{Product, ProductInput};
pub use stock::{StockDirection, StockMovement, StockMovementInput};
pub use user::{NewUser, User, UserProfile};
