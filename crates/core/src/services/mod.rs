//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod admin;
pub mod ai;
pub mod booking;
pub mod chat;
pub mod email;
pub mod geocoding;
pub mod hotel;
pub mod media;
pub mod oauth;
pub mod password_reset;
pub mod review;
pub mod room;

pub use account::{
    AccountService, AuthOutcome, RegisterInput, UpdateProfileInput,
};
pub use admin::{AdminService, PendingApprovals, PlatformAnalytics};
pub use ai::{
    AiService, MarketingContentInput, PricingSuggestionInput, RoomDescriptionInput,
};
pub use booking::{BookingService, CreateBookingInput, UpdateBookingInput};
pub use chat::{ChatEvent, ChatEventPublisher, ChatService, NoOpChatEventPublisher, SendMessageInput};
pub use email::EmailService;
pub use geocoding::{Coordinates, GeocodingService};
pub use hotel::{CreateHotelInput, HotelService, SearchHotelsInput, UpdateHotelInput};
pub use media::{
    MediaHost, MediaReference, NoopMediaHost, delete_media_best_effort, parse_media_refs,
};
pub use oauth::{OAuthCallbackInput, OAuthService};
pub use password_reset::PasswordResetService;
pub use review::{CreateReviewInput, RespondToReviewInput, ReviewService, UpdateReviewInput};
pub use room::{CreateRoomInput, RoomService, UpdateRoomInput};
