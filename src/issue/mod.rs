//! Issue reporting and the NGO issue feed.

pub mod handle;

use chrono::Utc;
use samaj_shared::{
    issue::{
        handle::{IssueFeed, ReportIssueDescriptor},
        Issue, IssueStatus,
    },
    verification::{NgoProfile, OrgKind, VerificationStatus},
    Identity,
};

use crate::{
    store::{self, Document, Query, Store, MAX_IN_VALUES},
    Error,
};

/// Maximum number of issues in a feed.
pub const FEED_LIMIT: usize = 30;

impl Document for Issue {
    const COLLECTION: &'static str = "issues";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

/// Reports a pending issue.
///
/// NGOs to notify are the approved ones whose focus areas contain the category.
pub async fn report<S: Store>(
    store: &S,
    reporter: Identity,
    desc: ReportIssueDescriptor,
) -> Result<Issue, Error> {
    for (value, field) in [
        (&desc.title, "title"),
        (&desc.description, "description"),
        (&desc.category, "category"),
        (&desc.location, "location"),
    ] {
        if value.trim().is_empty() {
            return Err(Error::invalid(format!("{field} is required")));
        }
    }

    let category = desc.category.trim().to_owned();
    let ngos_to_notify = {
        let category = category.clone();
        store
            .query(Query::new().filter(move |ngo: &NgoProfile| {
                ngo.status == VerificationStatus::Approved && ngo.focus_areas.contains(&category)
            }))
            .await?
            .into_iter()
            .map(|ngo| ngo.id)
            .collect()
    };

    let issue = Issue {
        id: store::new_id(),
        title: desc.title.trim().to_owned(),
        description: desc.description,
        category,
        location: desc.location.trim().to_owned(),
        image_url: desc.image_url.filter(|url| !url.is_empty()),
        reporter_id: reporter,
        timestamp: Utc::now(),
        status: IssueStatus::Pending,
        ngos_to_notify,
    };
    store.put(&issue).await?;
    tracing::info!(
        "{reporter} reported issue {} in {}, {} NGOs to notify",
        issue.id,
        issue.category,
        issue.ngos_to_notify.len()
    );
    Ok(issue)
}

/// Issues reported by a user, newest first.
pub async fn list_reported<S: Store>(store: &S, reporter: Identity) -> Result<Vec<Issue>, Error> {
    store
        .query(
            Query::new()
                .filter(move |i: &Issue| i.reporter_id == reporter)
                .order_by(|a: &Issue, b: &Issue| b.timestamp.cmp(&a.timestamp)),
        )
        .await
}

/// Active issues matching the focus areas of an NGO, newest first.
///
/// Only the first [`MAX_IN_VALUES`] focus areas take part in matching.
/// An NGO without focus areas gets an empty feed.
pub async fn feed<S: Store>(store: &S, ngo: Identity) -> Result<IssueFeed, Error> {
    let focus_areas = store
        .get::<NgoProfile>(ngo)
        .await?
        .ok_or(Error::VerificationNotFound(OrgKind::Ngo, ngo))?
        .focus_areas;
    if focus_areas.is_empty() {
        return Ok(IssueFeed {
            focus_areas,
            issues: Vec::new(),
        });
    }

    let areas = focus_areas.iter().take(MAX_IN_VALUES).cloned().collect();
    let issues = store
        .query(
            Query::new()
                .field_in(|i: &Issue| &i.category, areas)?
                .filter(|i: &Issue| i.status.is_active())
                .order_by(|a: &Issue, b: &Issue| b.timestamp.cmp(&a.timestamp))
                .limit(FEED_LIMIT),
        )
        .await?;
    Ok(IssueFeed {
        focus_areas,
        issues,
    })
}

/// Marking an issue resolved is accepted but changes nothing.
pub async fn mark_resolved<S: Store>(store: &S, issue: u64) -> Result<(), Error> {
    if store.get::<Issue>(issue).await?.is_none() {
        return Err(Error::IssueNotFound(issue));
    }
    tracing::debug!("issue {issue} marked resolved, status left unchanged");
    Ok(())
}
