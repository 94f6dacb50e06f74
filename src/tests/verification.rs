use super::*;

use samaj_shared::{
    account::{Profile, Role},
    verification::{
        handle::{
            ListVerificationsDescriptor, VerificationActionResult, VerificationList,
        },
        NgoProfile, VerificationStatus,
    },
};

async fn act(
    harness: &Harness,
    admin: &Auth,
    action: &str,
    kind: OrgKind,
    id: Identity,
) -> (StatusCode, serde_json::Value) {
    harness
        .post(
            &format!("/api/verification/{action}"),
            Some(admin),
            &VerificationTarget { kind, id },
        )
        .await
}

async fn list(harness: &Harness, admin: &Auth, which: &str, kind: OrgKind) -> VerificationList {
    let (status, value) = harness
        .post(
            &format!("/api/verification/{which}"),
            Some(admin),
            &ListVerificationsDescriptor { kind },
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{value}");
    serde_json::from_value(value).unwrap()
}

async fn role_of(harness: &Harness, id: Identity) -> Role {
    crate::session::resolve(harness.store(), Some(id)).await.role
}

/// Test: approve and revoke an NGO.
#[tokio::test]
async fn approve_then_revoke() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let ngo = harness
        .ngo("ngo@samaj.org", "Green Earth", &["Environment"])
        .await;

    let VerificationList::Ngo(pending) = list(&harness, &admin, "pending", OrgKind::Ngo).await
    else {
        panic!("expected NGO records")
    };
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ngo.id);

    let (status, value) = act(&harness, &admin, "approve", OrgKind::Ngo, ngo.id).await;
    assert_eq!(status, StatusCode::OK, "{value}");
    let result: VerificationActionResult = serde_json::from_value(value).unwrap();
    assert_eq!(result.status, VerificationStatus::Approved);
    assert_eq!(result.role, Role::Ngo);
    assert_eq!(role_of(&harness, ngo.id).await, Role::Ngo);

    assert!(list(&harness, &admin, "pending", OrgKind::Ngo)
        .await
        .is_empty());
    assert_eq!(
        list(&harness, &admin, "approved", OrgKind::Ngo).await.len(),
        1
    );

    // Approving twice
    {
        let (status, _) = act(&harness, &admin, "approve", OrgKind::Ngo, ngo.id).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    let (status, value) = act(&harness, &admin, "revoke", OrgKind::Ngo, ngo.id).await;
    assert_eq!(status, StatusCode::OK, "{value}");
    assert_eq!(role_of(&harness, ngo.id).await, Role::Unassigned);

    // Nothing leaves revoked
    for action in ["approve", "reject", "revoke"] {
        let (status, _) = act(&harness, &admin, action, OrgKind::Ngo, ngo.id).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
    assert!(list(&harness, &admin, "approved", OrgKind::Ngo)
        .await
        .is_empty());
}

#[tokio::test]
async fn reject_leaves_profile_alone() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let restaurant = harness.restaurant("food@samaj.org", "Spice Hub").await;

    let (status, _) = act(&harness, &admin, "revoke", OrgKind::Restaurant, restaurant.id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, value) = act(&harness, &admin, "reject", OrgKind::Restaurant, restaurant.id).await;
    assert_eq!(status, StatusCode::OK, "{value}");
    let result: VerificationActionResult = serde_json::from_value(value).unwrap();
    assert_eq!(result.status, VerificationStatus::Rejected);
    assert_eq!(result.role, Role::Unassigned);

    let (status, _) = act(&harness, &admin, "approve", OrgKind::Restaurant, restaurant.id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(role_of(&harness, restaurant.id).await, Role::Unassigned);

    // Records are per kind
    let (status, _) = act(&harness, &admin, "approve", OrgKind::Ngo, restaurant.id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_superadmins_verify() {
    let harness = Harness::new();
    let volunteer = harness.volunteer("asha@samaj.org").await;
    let ngo = harness
        .ngo("ngo@samaj.org", "Green Earth", &["Environment"])
        .await;

    for auth in [&volunteer, &ngo] {
        let (status, _) = harness
            .post(
                "/api/verification/pending",
                Some(auth),
                &ListVerificationsDescriptor { kind: OrgKind::Ngo },
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = act(&harness, auth, "approve", OrgKind::Ngo, ngo.id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = harness
        .post(
            "/api/verification/approve",
            None,
            &VerificationTarget {
                kind: OrgKind::Ngo,
                id: ngo.id,
            },
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(role_of(&harness, ngo.id).await, Role::Unassigned);
}

#[tokio::test]
async fn listings_are_ordered_by_name() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let mut ids = Vec::new();
    for (email, name) in [
        ("c@samaj.org", "Clean Rivers"),
        ("a@samaj.org", "Animal Aid"),
        ("b@samaj.org", "Books for All"),
    ] {
        ids.push(harness.ngo(email, name, &["Education"]).await.id);
    }

    let VerificationList::Ngo(pending) = list(&harness, &admin, "pending", OrgKind::Ngo).await
    else {
        panic!("expected NGO records")
    };
    let names: Vec<_> = pending.iter().map(|r| r.org_name.as_str()).collect();
    assert_eq!(names, ["Animal Aid", "Books for All", "Clean Rivers"]);

    harness.approve(&admin, OrgKind::Ngo, ids[0]).await;
    harness.approve(&admin, OrgKind::Ngo, ids[1]).await;

    let res = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/organizations")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let directory: Vec<NgoProfile> =
        serde_json::from_slice(&hyper::body::to_bytes(res.into_body()).await.unwrap()).unwrap();
    let names: Vec<_> = directory.iter().map(|r| r.org_name.as_str()).collect();
    assert_eq!(names, ["Books for All", "Clean Rivers"]);
}

/// Test: a failed profile write after approval is reported and repaired by reconciling.
#[tokio::test]
async fn two_phase_failure_is_reconciled() {
    let store = FaultyStore::failing_on::<Profile>();
    let id = crate::account::register(
        &store,
        ngo_form("ngo@samaj.org", "Green Earth", &["Environment"]),
    )
    .await
    .unwrap();

    store.set_failing(true);
    let res = crate::verification::approve(&store, OrgKind::Ngo, id).await;
    assert!(matches!(
        res,
        Err(Error::RoleSyncPending {
            status: VerificationStatus::Approved,
            ..
        })
    ));
    assert_eq!(
        crate::verification::status_of(&store, OrgKind::Ngo, id)
            .await
            .unwrap(),
        VerificationStatus::Approved
    );

    // The profile can't be read, so the session degrades to unassigned.
    let state = crate::session::resolve(&store, Some(id)).await;
    assert_eq!(state.identity, Some(id));
    assert_eq!(state.role, Role::Unassigned);

    store.set_failing(false);
    assert_eq!(
        crate::session::resolve(&store, Some(id)).await.role,
        Role::Unassigned
    );
    assert_eq!(
        crate::verification::reconcile(&store, OrgKind::Ngo, id)
            .await
            .unwrap(),
        Role::Ngo
    );
    assert_eq!(
        crate::verification::reconcile(&store, OrgKind::Ngo, id)
            .await
            .unwrap(),
        Role::Ngo
    );

    store.set_failing(true);
    assert!(matches!(
        crate::verification::revoke(&store, OrgKind::Ngo, id).await,
        Err(Error::RoleSyncPending {
            status: VerificationStatus::Revoked,
            ..
        })
    ));
    store.set_failing(false);
    assert_eq!(
        crate::session::resolve(&store, Some(id)).await.role,
        Role::Ngo
    );
    assert_eq!(
        crate::verification::reconcile(&store, OrgKind::Ngo, id)
            .await
            .unwrap(),
        Role::Unassigned
    );
}

#[tokio::test]
async fn reconcile_keeps_unrelated_roles() {
    let store = MemStore::new();
    let id = crate::account::register(&store, restaurant_form("chef@samaj.org", "Spice Hub"))
        .await
        .unwrap();
    crate::verification::reject(&store, OrgKind::Restaurant, id)
        .await
        .unwrap();

    store
        .update(id, |p: &mut Profile| {
            p.set_role(Role::Superadmin);
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(
        crate::verification::reconcile(&store, OrgKind::Restaurant, id)
            .await
            .unwrap(),
        Role::Superadmin
    );
}
