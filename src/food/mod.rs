//! Food requests posted by NGOs and answered by restaurants.

pub mod handle;

use chrono::Utc;
use samaj_shared::{
    food::{
        handle::{CreateFoodRequestDescriptor, FoodDecision},
        FoodRequest, FoodRequestStatus,
    },
    Identity,
};

use crate::{
    store::{self, Document, Query, Store},
    Error,
};

impl Document for FoodRequest {
    const COLLECTION: &'static str = "food_requests";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

pub async fn create_request<S: Store>(
    store: &S,
    ngo: Identity,
    desc: CreateFoodRequestDescriptor,
) -> Result<u64, Error> {
    if desc.food_type.trim().is_empty() {
        return Err(Error::invalid("food type is required"));
    }
    if desc.quantity == 0 {
        return Err(Error::invalid("quantity must be positive"));
    }

    let request = FoodRequest {
        id: store::new_id(),
        ngo_id: ngo,
        food_type: desc.food_type.trim().to_owned(),
        quantity: desc.quantity,
        description: desc.description,
        status: FoodRequestStatus::Pending,
        restaurant_id: None,
        created_at: Utc::now(),
        updated_at: None,
    };
    store.put(&request).await?;
    tracing::info!(
        "NGO {ngo} requested {} of {}",
        request.quantity,
        request.food_type
    );
    Ok(request.id)
}

/// Pending requests, oldest first.
pub async fn list_pending<S: Store>(store: &S) -> Result<Vec<FoodRequest>, Error> {
    store
        .query(
            Query::new()
                .filter(|r: &FoodRequest| r.status == FoodRequestStatus::Pending)
                .order_by(|a: &FoodRequest, b: &FoodRequest| a.created_at.cmp(&b.created_at)),
        )
        .await
}

/// Accepts or rejects a pending request on behalf of a restaurant.
pub async fn decide<S: Store>(
    store: &S,
    request: u64,
    restaurant: Identity,
    decision: FoodDecision,
) -> Result<FoodRequest, Error> {
    let decided = store
        .update(request, |r: &mut FoodRequest| {
            if r.status != FoodRequestStatus::Pending {
                return Err(Error::FoodRequestDecided(r.status));
            }
            r.status = decision.into();
            r.restaurant_id = Some(restaurant);
            r.updated_at = Some(Utc::now());
            Ok(r.clone())
        })
        .await?
        .ok_or(Error::FoodRequestNotFound(request))?;
    tracing::info!("restaurant {restaurant} {decision:?} food request {request}");
    Ok(decided)
}
