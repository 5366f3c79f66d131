//! Room catalog service.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, IdGenerator};
use stayhub_db::{
    entities::{
        account::{self, Role},
        room::{self, RoomType},
    },
    repositories::{HotelRepository, RoomRepository},
};
use validator::Validate;

use crate::media::{MediaHost, MediaReference, delete_media_best_effort, parse_media_refs};

/// Input for creating a room.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomInput {
    pub hotel_id: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 4096))]
    pub description: String,

    pub room_type: RoomType,

    /// Nightly base price in minor currency units.
    #[validate(range(min = 1))]
    pub price_base: i64,

    #[serde(default = "default_currency")]
    pub price_currency: String,

    #[validate(range(min = 1))]
    pub capacity_adults: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub capacity_children: i32,

    #[serde(default)]
    pub images: Vec<MediaReference>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[validate(range(min = 1))]
    pub quantity: i32,

    /// Defaults to `quantity` when not given.
    pub available: Option<i32>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Input for updating a room. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 4096))]
    pub description: Option<String>,

    pub room_type: Option<RoomType>,

    #[validate(range(min = 1))]
    pub price_base: Option<i64>,

    pub price_currency: Option<String>,

    #[validate(range(min = 1))]
    pub capacity_adults: Option<i32>,

    #[validate(range(min = 0))]
    pub capacity_children: Option<i32>,

    /// Replaces the full image set; old media is deleted best-effort.
    pub images: Option<Vec<MediaReference>>,

    pub amenities: Option<Vec<String>>,

    #[validate(range(min = 1))]
    pub quantity: Option<i32>,

    pub is_active: Option<bool>,
}

/// Room catalog service.
#[derive(Clone)]
pub struct RoomService {
    room_repo: RoomRepository,
    hotel_repo: HotelRepository,
    media_host: Arc<dyn MediaHost>,
    id_gen: IdGenerator,
}

impl RoomService {
    /// Create a new room service.
    #[must_use]
    pub fn new(
        room_repo: RoomRepository,
        hotel_repo: HotelRepository,
        media_host: Arc<dyn MediaHost>,
    ) -> Self {
        Self {
            room_repo,
            hotel_repo,
            media_host,
            id_gen: IdGenerator::new(),
        }
    }

    /// List active rooms.
    pub async fn list_active(&self) -> AppResult<Vec<room::Model>> {
        self.room_repo.find_active().await
    }

    /// Get a room by ID.
    pub async fn get(&self, id: &str) -> AppResult<room::Model> {
        self.room_repo.get_by_id(id).await
    }

    /// List active rooms for a hotel.
    pub async fn list_by_hotel(&self, hotel_id: &str) -> AppResult<Vec<room::Model>> {
        self.room_repo.find_by_hotel(hotel_id).await
    }

    /// Create a room under a hotel the actor owns (or as admin).
    pub async fn create(
        &self,
        actor: &account::Model,
        input: CreateRoomInput,
    ) -> AppResult<room::Model> {
        input.validate()?;

        let hotel = self.hotel_repo.get_by_id(&input.hotel_id).await?;
        ensure_owner_or_admin(actor, &hotel.owner_id, "create rooms for this hotel")?;

        let quantity = input.quantity;
        let available = input.available.unwrap_or(quantity).clamp(0, quantity);

        let model = room::ActiveModel {
            id: Set(self.id_gen.generate()),
            hotel_id: Set(hotel.id),
            name: Set(input.name),
            description: Set(input.description),
            room_type: Set(input.room_type),
            price_base: Set(input.price_base),
            price_currency: Set(input.price_currency),
            capacity_adults: Set(input.capacity_adults),
            capacity_children: Set(input.capacity_children),
            images: Set(serde_json::json!(input.images)),
            amenities: Set(serde_json::json!(input.amenities)),
            quantity: Set(quantity),
            available: Set(available),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let room = self.room_repo.create(model).await?;
        tracing::info!(room_id = %room.id, hotel_id = %room.hotel_id, "Room created");
        Ok(room)
    }

    /// Update a room. Owning hotel's owner or admin only.
    pub async fn update(
        &self,
        actor: &account::Model,
        room_id: &str,
        input: UpdateRoomInput,
    ) -> AppResult<room::Model> {
        input.validate()?;

        let room = self.room_repo.get_by_id(room_id).await?;
        let hotel = self.hotel_repo.get_by_id(&room.hotel_id).await?;
        ensure_owner_or_admin(actor, &hotel.owner_id, "update this room")?;

        let old_images = parse_media_refs(&room.images);
        let replacing_images = input.images.is_some();
        let current_available = room.available;

        let mut active: room::ActiveModel = room.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(room_type) = input.room_type {
            active.room_type = Set(room_type);
        }
        if let Some(price_base) = input.price_base {
            active.price_base = Set(price_base);
        }
        if let Some(price_currency) = input.price_currency {
            active.price_currency = Set(price_currency);
        }
        if let Some(capacity_adults) = input.capacity_adults {
            active.capacity_adults = Set(capacity_adults);
        }
        if let Some(capacity_children) = input.capacity_children {
            active.capacity_children = Set(capacity_children);
        }
        if let Some(images) = input.images {
            active.images = Set(serde_json::json!(images));
        }
        if let Some(amenities) = input.amenities {
            active.amenities = Set(serde_json::json!(amenities));
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
            // Keep the cached counter inside the new bounds
            active.available = Set(current_available.clamp(0, quantity));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.room_repo.update(active).await?;

        if replacing_images {
            delete_media_best_effort(self.media_host.as_ref(), &old_images).await;
        }

        Ok(updated)
    }

    /// Delete a room (hard delete). Owning hotel's owner or admin only.
    pub async fn delete(&self, actor: &account::Model, room_id: &str) -> AppResult<()> {
        let room = self.room_repo.get_by_id(room_id).await?;
        let hotel = self.hotel_repo.get_by_id(&room.hotel_id).await?;
        ensure_owner_or_admin(actor, &hotel.owner_id, "delete this room")?;

        let images = parse_media_refs(&room.images);
        self.room_repo.delete(room).await?;
        delete_media_best_effort(self.media_host.as_ref(), &images).await;

        tracing::info!(room_id = room_id, actor_id = %actor.id, "Room deleted");
        Ok(())
    }
}

fn ensure_owner_or_admin(
    actor: &account::Model,
    owner_id: &str,
    action: &str,
) -> AppResult<()> {
    if actor.role == Role::Admin || actor.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Not authorized to {action}")))
    }
}
