pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod wishlist;

pub use error::WishrError;
pub use store::{MemoryStore, Store};
pub use wishlist::{Clock, Stats, SystemClock, Wishlist};
