//! Repositories for database access.

#![allow(missing_docs)]

pub mod account;
pub mod booking;
pub mod chat_message;
pub mod hotel;
pub mod review;
pub mod room;

pub use account::{AccountFilter, AccountRepository};
pub use booking::{BookingFilter, BookingRepository};
pub use chat_message::ChatMessageRepository;
pub use hotel::{HotelRepository, HotelSearchFilter};
pub use review::ReviewRepository;
pub use room::RoomRepository;
