//! Hotel catalog service.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, IdGenerator};
use stayhub_db::{
    entities::{
        account::{self, Role},
        hotel::{self, Category},
    },
    repositories::{HotelRepository, HotelSearchFilter},
};
use validator::Validate;

use crate::geocoding::GeocodingService;
use crate::media::{MediaHost, MediaReference, delete_media_best_effort, parse_media_refs};

/// Input for creating a hotel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 4096))]
    pub description: String,

    pub category: Category,

    #[validate(length(min = 1, max = 512))]
    pub address: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(min = 1, max = 128))]
    pub state: String,

    #[validate(length(min = 1, max = 128))]
    pub country: String,

    pub zip_code: Option<String>,

    #[serde(default)]
    pub images: Vec<MediaReference>,

    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Input for updating a hotel. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotelInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 4096))]
    pub description: Option<String>,

    pub category: Option<Category>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,

    /// Replaces the full image set; old media is deleted best-effort.
    pub images: Option<Vec<MediaReference>>,

    pub amenities: Option<Vec<String>>,

    pub is_active: Option<bool>,
}

/// Input for public hotel search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHotelsInput {
    pub category: Option<Category>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in kilometers, used when coordinates are given.
    pub radius: Option<f64>,
}

/// Hotel catalog service.
#[derive(Clone)]
pub struct HotelService {
    hotel_repo: HotelRepository,
    media_host: Arc<dyn MediaHost>,
    geocoder: Option<GeocodingService>,
    id_gen: IdGenerator,
}

impl HotelService {
    /// Create a new hotel service.
    #[must_use]
    pub fn new(
        hotel_repo: HotelRepository,
        media_host: Arc<dyn MediaHost>,
        geocoder: Option<GeocodingService>,
    ) -> Self {
        Self {
            hotel_repo,
            media_host,
            geocoder,
            id_gen: IdGenerator::new(),
        }
    }

    /// List publicly visible hotels.
    pub async fn list_public(&self) -> AppResult<Vec<hotel::Model>> {
        self.hotel_repo.find_public().await
    }

    /// Get a hotel together with its owner.
    pub async fn get_with_owner(
        &self,
        id: &str,
    ) -> AppResult<(hotel::Model, Option<account::Model>)> {
        self.hotel_repo
            .find_with_owner(id)
            .await?
            .ok_or_else(|| AppError::HotelNotFound(id.to_string()))
    }

    /// Get a hotel by ID.
    pub async fn get(&self, id: &str) -> AppResult<hotel::Model> {
        self.hotel_repo.get_by_id(id).await
    }

    /// List the actor's own hotels.
    pub async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<hotel::Model>> {
        self.hotel_repo.find_by_owner(owner_id).await
    }

    /// Search publicly visible hotels.
    pub async fn search(&self, input: SearchHotelsInput) -> AppResult<Vec<hotel::Model>> {
        let filter = HotelSearchFilter {
            category: input.category,
            city: input.city.clone(),
        };
        let mut hotels = self.hotel_repo.search(&filter).await?;

        // Radius filter runs over stored coordinates; hotels without
        // coordinates are excluded from a radius search.
        if let (Some(lat), Some(lon)) = (input.latitude, input.longitude) {
            let radius_km = input.radius.unwrap_or(50.0);
            hotels.retain(|hotel| match (hotel.latitude, hotel.longitude) {
                (Some(hlat), Some(hlon)) => haversine_km(lat, lon, hlat, hlon) <= radius_km,
                _ => false,
            });
        }

        Ok(hotels)
    }

    /// Create a hotel. Approved owners and admins only; the owner is the
    /// actor.
    pub async fn create(
        &self,
        actor: &account::Model,
        input: CreateHotelInput,
    ) -> AppResult<hotel::Model> {
        input.validate()?;

        match actor.role {
            Role::Admin => {}
            Role::HotelOwner if actor.is_approved => {}
            Role::HotelOwner => {
                return Err(AppError::Forbidden(
                    "Your account is pending admin approval".to_string(),
                ));
            }
            Role::Customer => {
                return Err(AppError::Forbidden(
                    "Only hotel owners can create hotels".to_string(),
                ));
            }
        }

        // Geocoding is optional; addresses are stored without coordinates
        // when no geocoder is configured.
        let coordinates = match &self.geocoder {
            Some(geocoder) => Some(
                geocoder
                    .resolve(
                        &input.address,
                        &input.city,
                        &input.state,
                        &input.country,
                        input.zip_code.as_deref(),
                    )
                    .await?,
            ),
            None => None,
        };

        let model = hotel::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor.id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            zip_code: Set(input.zip_code),
            latitude: Set(coordinates.map(|c| c.latitude)),
            longitude: Set(coordinates.map(|c| c.longitude)),
            images: Set(serde_json::json!(input.images)),
            amenities: Set(serde_json::json!(input.amenities)),
            rating_average: Set(0.0),
            rating_count: Set(0),
            is_approved: Set(false),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let hotel = self.hotel_repo.create(model).await?;
        tracing::info!(hotel_id = %hotel.id, owner_id = %actor.id, "Hotel created");
        Ok(hotel)
    }

    /// Update a hotel. Owner or admin only; approval state is not patchable
    /// through this path.
    pub async fn update(
        &self,
        actor: &account::Model,
        hotel_id: &str,
        input: UpdateHotelInput,
    ) -> AppResult<hotel::Model> {
        input.validate()?;

        let hotel = self.hotel_repo.get_by_id(hotel_id).await?;
        ensure_owner_or_admin(actor, &hotel.owner_id, "update this hotel")?;

        let old_images = parse_media_refs(&hotel.images);
        let replacing_images = input.images.is_some();

        let mut active: hotel::ActiveModel = hotel.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(country) = input.country {
            active.country = Set(country);
        }
        if let Some(zip_code) = input.zip_code {
            active.zip_code = Set(Some(zip_code));
        }
        if let Some(images) = input.images {
            active.images = Set(serde_json::json!(images));
        }
        if let Some(amenities) = input.amenities {
            active.amenities = Set(serde_json::json!(amenities));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.hotel_repo.update(active).await?;

        if replacing_images {
            delete_media_best_effort(self.media_host.as_ref(), &old_images).await;
        }

        Ok(updated)
    }

    /// Delete a hotel (hard delete). Owner or admin only.
    pub async fn delete(&self, actor: &account::Model, hotel_id: &str) -> AppResult<()> {
        let hotel = self.hotel_repo.get_by_id(hotel_id).await?;
        ensure_owner_or_admin(actor, &hotel.owner_id, "delete this hotel")?;

        let images = parse_media_refs(&hotel.images);
        self.hotel_repo.delete(hotel).await?;
        delete_media_best_effort(self.media_host.as_ref(), &images).await;

        tracing::info!(hotel_id = hotel_id, actor_id = %actor.id, "Hotel deleted");
        Ok(())
    }

    /// Approve a hotel (admin only). Idempotent.
    pub async fn approve(
        &self,
        actor: &account::Model,
        hotel_id: &str,
    ) -> AppResult<hotel::Model> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only admins can approve hotels".to_string(),
            ));
        }

        let hotel = self.hotel_repo.get_by_id(hotel_id).await?;
        if hotel.is_approved {
            return Ok(hotel);
        }

        let mut active: hotel::ActiveModel = hotel.into();
        active.is_approved = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.hotel_repo.update(active).await?;
        tracing::info!(hotel_id = %updated.id, approved_by = %actor.id, "Hotel approved");
        Ok(updated)
    }
}

/// Ownership gate shared by hotel mutations.
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

/// Great-circle distance between two coordinates, in kilometers.
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        assert!(haversine_km(40.7128, -74.0060, 40.7128, -74.0060) < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // New York to Philadelphia is roughly 130 km
        let d = haversine_km(40.7128, -74.0060, 39.9526, -75.1652);
        assert!(d > 120.0 && d < 140.0, "got {d}");
    }
}
