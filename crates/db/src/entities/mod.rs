//! Database entities.

#![allow(missing_docs)]

pub mod account;
pub mod booking;
pub mod chat_message;
pub mod hotel;
pub mod review;
pub mod room;

pub use account::Entity as Account;
pub use booking::Entity as Booking;
pub use chat_message::Entity as ChatMessage;
pub use hotel::Entity as Hotel;
pub use review::Entity as Review;
pub use room::Entity as Room;
