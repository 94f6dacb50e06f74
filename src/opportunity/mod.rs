//! Volunteer opportunities and their capacity.

pub mod handle;

use chrono::Utc;
use samaj_shared::{
    account::Profile,
    opportunity::{
        handle::{CreateOpportunityDescriptor, OwnedOpportunity, VolunteerInfo},
        Opportunity, OpportunityStatus,
    },
    verification::NgoProfile,
    Identity,
};

use crate::{
    store::{self, Document, Query, Store},
    Error,
};

impl Document for Opportunity {
    const COLLECTION: &'static str = "opportunities";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

/// Creates an open opportunity owned by an NGO.
///
/// The organization name is taken from the NGO's verification record,
/// or from its profile if there is no record.
pub async fn create<S: Store>(
    store: &S,
    org_id: Identity,
    desc: CreateOpportunityDescriptor,
) -> Result<u64, Error> {
    for (value, field) in [
        (&desc.title, "title"),
        (&desc.category, "category"),
        (&desc.location, "location"),
    ] {
        if value.trim().is_empty() {
            return Err(Error::invalid(format!("{field} is required")));
        }
    }
    if desc.spots == 0 {
        return Err(Error::invalid("an opportunity needs at least one spot"));
    }

    let org_name = match store.get::<NgoProfile>(org_id).await? {
        Some(ngo) => ngo.org_name,
        None => store
            .get::<Profile>(org_id)
            .await?
            .map(|p| p.name)
            .ok_or(Error::ProfileNotFound(org_id))?,
    };

    let opportunity = Opportunity {
        id: store::new_id(),
        title: desc.title.trim().to_owned(),
        description: desc.description,
        category: desc.category.trim().to_owned(),
        location: desc.location.trim().to_owned(),
        date: desc.date,
        time: desc.time,
        spots: desc.spots,
        org_id,
        org_name,
        created_at: Utc::now(),
        status: OpportunityStatus::Open,
        signed_up_volunteers: Vec::new(),
    };
    store.put(&opportunity).await?;
    tracing::info!(
        "{} created opportunity {} with {} spots",
        opportunity.org_name,
        opportunity.id,
        opportunity.spots
    );
    Ok(opportunity.id)
}

/// Open opportunities, newest first.
pub async fn list_open<S: Store>(store: &S) -> Result<Vec<Opportunity>, Error> {
    store
        .query(
            Query::new()
                .filter(|o: &Opportunity| o.status == OpportunityStatus::Open)
                .order_by(|a: &Opportunity, b: &Opportunity| b.created_at.cmp(&a.created_at)),
        )
        .await
}

/// Opportunities of an NGO, newest first, with their rosters.
pub async fn list_owned<S: Store>(
    store: &S,
    org_id: Identity,
) -> Result<Vec<OwnedOpportunity>, Error> {
    let opportunities = store
        .query(
            Query::new()
                .filter(move |o: &Opportunity| o.org_id == org_id)
                .order_by(|a: &Opportunity, b: &Opportunity| b.created_at.cmp(&a.created_at)),
        )
        .await?;

    let mut owned = Vec::with_capacity(opportunities.len());
    for opportunity in opportunities {
        let mut volunteers = Vec::with_capacity(opportunity.occupancy());
        for &id in &opportunity.signed_up_volunteers {
            volunteers.push(volunteer_info(store, id).await?);
        }
        owned.push(OwnedOpportunity {
            opportunity,
            volunteers,
        });
    }
    Ok(owned)
}

async fn volunteer_info<S: Store>(store: &S, id: Identity) -> Result<VolunteerInfo, Error> {
    Ok(match store.get::<Profile>(id).await? {
        Some(profile) => VolunteerInfo {
            id,
            name: profile.name,
            email: Some(profile.email.to_string()),
        },
        None => VolunteerInfo {
            id,
            name: format!(
                "Unknown ({}...)",
                id.to_string().chars().take(5).collect::<String>()
            ),
            email: None,
        },
    })
}

/// Signs a volunteer up. The capacity check and the append happen in one atomic update.
///
/// # Errors
///
/// - [`Error::AlreadySignedUp`] if the volunteer is on the roster.
/// - [`Error::OpportunityClosed`] if the opportunity was closed.
/// - [`Error::CapacityExceeded`] if all spots are filled.
pub async fn sign_up<S: Store>(
    store: &S,
    opportunity: u64,
    volunteer: Identity,
) -> Result<OpportunityStatus, Error> {
    let status = store
        .update(opportunity, |o: &mut Opportunity| {
            if o.is_signed_up(volunteer) {
                return Err(Error::AlreadySignedUp);
            }
            if o.status == OpportunityStatus::Closed {
                return Err(Error::OpportunityClosed);
            }
            if o.occupancy() >= o.spots as usize {
                return Err(Error::CapacityExceeded);
            }
            o.signed_up_volunteers.push(volunteer);
            if o.occupancy() >= o.spots as usize {
                o.status = OpportunityStatus::Full;
            }
            Ok(o.status)
        })
        .await?
        .ok_or(Error::OpportunityNotFound(opportunity))?;
    tracing::info!("{volunteer} signed up for opportunity {opportunity}, now {status:?}");
    Ok(status)
}

/// Removes a volunteer from the roster and reopens the opportunity.
///
/// The opportunity is reopened even if it was closed or the volunteer
/// was not on the roster.
pub async fn cancel_sign_up<S: Store>(
    store: &S,
    opportunity: u64,
    volunteer: Identity,
) -> Result<(), Error> {
    store
        .update(opportunity, |o: &mut Opportunity| {
            o.signed_up_volunteers.retain(|&id| id != volunteer);
            o.status = OpportunityStatus::Open;
            Ok(())
        })
        .await?
        .ok_or(Error::OpportunityNotFound(opportunity))?;
    tracing::info!("{volunteer} cancelled sign-up for opportunity {opportunity}");
    Ok(())
}

/// Closes an opportunity of the given NGO.
pub async fn close<S: Store>(store: &S, opportunity: u64, org_id: Identity) -> Result<(), Error> {
    store
        .update(opportunity, |o: &mut Opportunity| {
            if o.org_id != org_id {
                return Err(Error::PermissionDenied);
            }
            o.status = OpportunityStatus::Closed;
            Ok(())
        })
        .await?
        .ok_or(Error::OpportunityNotFound(opportunity))?;
    tracing::info!("opportunity {opportunity} closed");
    Ok(())
}
