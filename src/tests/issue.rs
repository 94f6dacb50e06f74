use super::*;

use samaj_shared::{
    issue::{
        handle::{IssueFeed, IssueTarget, ReportIssueDescriptor, ReportIssueResult},
        Issue, IssueStatus,
    },
    verification::{NgoProfile, VerificationStatus},
};

fn report_form(title: &str, category: &str) -> ReportIssueDescriptor {
    ReportIssueDescriptor {
        title: title.to_owned(),
        description: "Needs attention".to_owned(),
        category: category.to_owned(),
        location: "Sector 5".to_owned(),
        image_url: None,
    }
}

async fn report(harness: &Harness, auth: &Auth, title: &str, category: &str) -> ReportIssueResult {
    let (status, value) = harness
        .post("/api/issue/report", Some(auth), &report_form(title, category))
        .await;
    assert_eq!(status, StatusCode::OK, "{value}");
    serde_json::from_value(value).unwrap()
}

/// Test: reports are routed to approved NGOs with a matching focus area.
#[tokio::test]
async fn reports_notify_matching_ngos() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let green = harness
        .ngo("green@samaj.org", "Green Earth", &["Environment", "Health"])
        .await;
    let health = harness.ngo("health@samaj.org", "Care", &["Health"]).await;
    let waiting = harness
        .ngo("waiting@samaj.org", "Waiting", &["Environment"])
        .await;
    harness.approve(&admin, OrgKind::Ngo, green.id).await;
    harness.approve(&admin, OrgKind::Ngo, health.id).await;

    let reporter = harness.volunteer("asha@samaj.org").await;
    let result = report(&harness, &reporter, "Garbage dump", "Environment").await;
    assert_eq!(result.ngos_notified, 1);

    let issue = harness
        .store()
        .get::<Issue>(result.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(issue.status, IssueStatus::Pending);
    assert_eq!(issue.reporter_id, reporter.id);
    assert_eq!(issue.ngos_to_notify, vec![green.id]);
    assert!(!issue.ngos_to_notify.contains(&waiting.id));

    assert_eq!(
        report(&harness, &reporter, "Clinic closed", "Health")
            .await
            .ngos_notified,
        2
    );

    let (status, value) = harness
        .request("/api/issue/mine", Some(&reporter), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let mine: Vec<Issue> = serde_json::from_value(value).unwrap();
    let titles: Vec<_> = mine.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Clinic closed", "Garbage dump"]);
}

#[tokio::test]
async fn invalid_reports() {
    let harness = Harness::new();

    let (status, _) = harness
        .post("/api/issue/report", None, &report_form("Pothole", "Roads"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let reporter = harness.volunteer("asha@samaj.org").await;
    for desc in [report_form("", "Roads"), report_form("Pothole", " ")] {
        let (status, _) = harness
            .post("/api/issue/report", Some(&reporter), &desc)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

/// Test: the feed holds active issues of the NGO's focus areas, newest first.
#[tokio::test]
async fn ngo_feed() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let ngo = harness
        .ngo("green@samaj.org", "Green Earth", &["Environment"])
        .await;

    // Pending NGOs have no feed
    {
        let (status, _) = harness.request("/api/issue/feed", Some(&ngo), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
    harness.approve(&admin, OrgKind::Ngo, ngo.id).await;

    let reporter = harness.volunteer("asha@samaj.org").await;
    let old = report(&harness, &reporter, "Old dump", "Environment").await;
    report(&harness, &reporter, "Clinic closed", "Health").await;
    let fixed = report(&harness, &reporter, "Fixed dump", "Environment").await;
    let new = report(&harness, &reporter, "New dump", "Environment").await;

    harness
        .store()
        .update(fixed.id, |i: &mut Issue| {
            i.status = IssueStatus::Resolved;
            Ok(())
        })
        .await
        .unwrap();
    harness
        .store()
        .update(old.id, |i: &mut Issue| {
            i.status = IssueStatus::InProgress;
            Ok(())
        })
        .await
        .unwrap();

    let (status, value) = harness.request("/api/issue/feed", Some(&ngo), None).await;
    assert_eq!(status, StatusCode::OK, "{value}");
    let feed: IssueFeed = serde_json::from_value(value).unwrap();
    assert_eq!(feed.focus_areas, vec!["Environment".to_owned()]);
    let ids: Vec<_> = feed.issues.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);

    // Marking resolved changes nothing
    let (status, _) = harness
        .post(
            "/api/issue/mark-resolved",
            Some(&ngo),
            &IssueTarget { issue: new.id },
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        harness
            .store()
            .get::<Issue>(new.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        IssueStatus::Pending
    );

    let (status, _) = harness
        .post("/api/issue/mark-resolved", Some(&ngo), &IssueTarget { issue: 1 })
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feed_limits() {
    let store = MemStore::new();
    let id = 77;
    let mut record = NgoProfile {
        id,
        org_name: "Everything".to_owned(),
        description: String::new(),
        address: String::new(),
        contact_email: "all@samaj.org".to_owned(),
        contact_phone: None,
        website: None,
        focus_areas: Vec::new(),
        registration_number: None,
        document_url: None,
        status: VerificationStatus::Approved,
        submitted_at: chrono::Utc::now(),
    };
    store.put(&record).await.unwrap();

    let base = chrono::Utc::now();
    for n in 0..40u64 {
        store
            .put(&Issue {
                id: n + 1,
                title: format!("Issue {n}"),
                description: String::new(),
                category: format!("Area {}", n % 35),
                location: String::new(),
                image_url: None,
                reporter_id: 1,
                timestamp: base + chrono::Duration::seconds(n as i64),
                status: IssueStatus::Pending,
                ngos_to_notify: Vec::new(),
            })
            .await
            .unwrap();
    }

    // No focus areas, no issues
    let feed = crate::issue::feed(&store, id).await.unwrap();
    assert!(feed.issues.is_empty());

    // Only the first 30 focus areas take part
    record.focus_areas = (0..35).map(|n| format!("Area {n}")).collect();
    store.put(&record).await.unwrap();
    let feed = crate::issue::feed(&store, id).await.unwrap();
    assert_eq!(feed.issues.len(), crate::issue::FEED_LIMIT);
    assert!(feed
        .issues
        .windows(2)
        .all(|w| w[0].timestamp >= w[1].timestamp));
    assert!(feed.issues.iter().all(|i| {
        let area: u64 = i.category["Area ".len()..].parse().unwrap();
        area < 30
    }));
    assert_eq!(feed.issues[0].id, 40);

    assert!(matches!(
        crate::issue::feed(&store, 78).await,
        Err(Error::VerificationNotFound(OrgKind::Ngo, 78))
    ));
}
