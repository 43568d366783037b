//! Tests for the user reconciliation service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    IdentityProviderError, MockIdentityProvider, MockUserRepository, ProviderAccount,
    UserPersistenceError,
};
use crate::domain::user_events::MockEventIdGenerator;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn events() -> ChangeEventBuilder {
    let utc_now = Utc
        .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp");
    let mut ids = MockEventIdGenerator::new();
    ids.expect_next_id().returning(Uuid::nil);
    ChangeEventBuilder::new(Arc::new(FixtureClock { utc_now }), Arc::new(ids))
}

#[fixture]
fn alice_id() -> UserId {
    UserId::new(1).expect("valid id")
}

fn alice(id: UserId) -> User {
    User::new(id, "alice", "a@x.com")
        .with_names("Alice", "Liddell")
        .with_time_zone_id("Europe/London")
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn repo_with_alice() -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|id| Ok(Some(alice(id))));
    repo
}

fn provider(
    account: Option<ProviderAccount>,
    followers: Vec<String>,
    repositories: Vec<String>,
) -> MockIdentityProvider {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_fetch_profile()
        .withf(|name| name == "alice")
        .times(1)
        .return_once(move |_| Ok(account));
    provider
        .expect_fetch_followers()
        .withf(|name| name == "alice")
        .times(1)
        .return_once(move |_| Ok(followers));
    provider
        .expect_fetch_repositories()
        .withf(|name| name == "alice")
        .times(1)
        .return_once(move |_| Ok(repositories));
    provider
}

fn service(
    repo: MockUserRepository,
    provider: MockIdentityProvider,
    events: ChangeEventBuilder,
) -> UserReconciliationService<MockUserRepository, MockIdentityProvider> {
    UserReconciliationService::new(Arc::new(repo), Arc::new(provider), events)
}

#[rstest]
#[tokio::test]
async fn inserts_new_followers_and_reports_them(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_list_relation()
        .withf(|_, kind| *kind == RelationKind::Followers)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    repo.expect_apply_reconciliation()
        .withf(|rec| {
            rec.followers == RelationPlan::Insert(names(&["bob", "carol"]))
                && rec.repositories == RelationPlan::Clear
                && rec.user.email() == "a@x.com"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let provider = provider(
        Some(ProviderAccount {
            login: Some("alice".into()),
            email: None,
        }),
        names(&["bob", "carol"]),
        Vec::new(),
    );

    let event = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect("reconcile succeeds");

    assert_eq!(event.payload.id, 1);
    assert_eq!(event.payload.followers, names(&["bob", "carol"]));
    assert!(event.payload.repos.is_empty());
    assert_eq!(event.meta.event_id, Uuid::nil().to_string());
    assert_eq!(event.meta.created_at, 1_771_929_000_000_000_000);
}

#[rstest]
#[tokio::test]
async fn repeated_observation_plans_no_inserts(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_list_relation()
        .times(2)
        .returning(|_, kind| match kind {
            RelationKind::Followers => Ok(vec![Some("bob".into()), Some("carol".into())]),
            RelationKind::Repositories => Ok(vec![Some("wonderland".into())]),
        });
    repo.expect_apply_reconciliation()
        .withf(|rec| rec.followers.is_noop() && rec.repositories.is_noop())
        .times(1)
        .return_once(|_| Ok(()));

    let provider = provider(None, names(&["bob", "carol"]), names(&["wonderland"]));
    let event = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect("reconcile succeeds");

    assert_eq!(event.payload.followers, names(&["bob", "carol"]));
    assert_eq!(event.payload.repos, names(&["wonderland"]));
}

#[rstest]
#[tokio::test]
async fn provider_scalars_overwrite_only_when_present(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_apply_reconciliation()
        .withf(|rec| rec.user.username() == "alice" && rec.user.email() == "alice@github.test")
        .times(1)
        .return_once(|_| Ok(()));

    let provider = provider(
        Some(ProviderAccount {
            login: Some(String::new()),
            email: Some("alice@github.test".into()),
        }),
        Vec::new(),
        Vec::new(),
    );
    let event = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect("reconcile succeeds");

    assert_eq!(event.payload.email, "alice@github.test");
    assert_eq!(event.payload.first_name, "Alice");
}

#[rstest]
#[tokio::test]
async fn retain_policy_leaves_relations_alone(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_list_relation().never();
    repo.expect_apply_reconciliation()
        .withf(|rec| {
            rec.followers == RelationPlan::Retain && rec.repositories == RelationPlan::Retain
        })
        .times(1)
        .return_once(|_| Ok(()));

    let provider = provider(None, Vec::new(), Vec::new());
    service(repo, provider, events)
        .with_policy(EmptyObservationPolicy::RetainExisting)
        .reconcile(alice_id)
        .await
        .expect("reconcile succeeds");
}

#[rstest]
#[tokio::test]
async fn missing_user_aborts_before_the_provider(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_apply_reconciliation().never();
    let mut provider = MockIdentityProvider::new();
    provider.expect_fetch_profile().never();

    let error = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect_err("user is missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn store_outage_on_load_is_unavailable(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let error = service(repo, MockIdentityProvider::new(), events)
        .reconcile(alice_id)
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn provider_transport_failure_writes_nothing(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_apply_reconciliation().never();
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_fetch_profile()
        .times(1)
        .return_once(|_| Ok(None));
    provider
        .expect_fetch_followers()
        .times(1)
        .return_once(|_| Err(IdentityProviderError::transport("connection reset")));
    provider.expect_fetch_repositories().never();

    let error = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect_err("provider down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn email_conflict_surfaces_as_conflict(events: ChangeEventBuilder, alice_id: UserId) {
    let mut repo = repo_with_alice();
    repo.expect_apply_reconciliation()
        .times(1)
        .return_once(|rec| Err(UserPersistenceError::email_conflict(rec.user.email())));

    let provider = provider(
        Some(ProviderAccount {
            login: None,
            email: Some("b@x.com".into()),
        }),
        Vec::new(),
        Vec::new(),
    );
    let error = service(repo, provider, events)
        .reconcile(alice_id)
        .await
        .expect_err("email taken");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert!(error.message().contains("b@x.com"));
}
