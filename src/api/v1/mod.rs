//! V1 API handlers.

mod access;
mod admin;
mod catalog;
mod chat;
mod donations;
mod system;


pub use access::*;
pub use admin::*;
pub use catalog::*;
pub use chat::*;
pub use donations::*;
pub use system::*;
