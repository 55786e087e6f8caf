use super::*;
use crate::error::IdentityError;
use crate::state::loading::LoaderVariant;
use crate::test_support::{FakeBackend, Reply, credentials, identity};
use crate::util::clock::ManualClock;
use crate::util::navigation::MemoryNavigator;
use crate::util::session_flag::MemorySessionStorage;

struct Harness {
    app: AppContext,
    backend: Rc<FakeBackend>,
    nav: Rc<MemoryNavigator>,
    clock: Rc<ManualClock>,
}

fn harness(start_path: &str) -> Harness {
    let backend = Rc::new(FakeBackend::default());
    let nav = Rc::new(MemoryNavigator::new(start_path));
    let clock = Rc::new(ManualClock::starting_at(10_000));
    let collaborators = Collaborators {
        backend: backend.clone(),
        navigator: nav.clone(),
        storage: Rc::new(MemorySessionStorage::default()),
        clock: clock.clone(),
    };
    Harness {
        app: AppContext::new(&StorefrontConfig::default(), collaborators),
        backend,
        nav,
        clock,
    }
}

// =============================================================================
// Mounting
// =============================================================================

#[tokio::test]
async fn mount_establishes_route_without_loading() {
    let h = harness("/collection/shirts");
    h.app.mount().await;
    assert!(!h.app.loading().is_loading);
    assert_eq!(h.app.next_deadline_ms(), None);
    assert!(h.app.session().snapshot().initialized);
}

// =============================================================================
// Session → notifications → navigation → loading
// =============================================================================

#[tokio::test]
async fn login_flows_into_notifications_and_loader() {
    let h = harness("/account/login");
    h.app.mount().await;
    h.backend.script_login(Reply::Now(Ok(identity("c1", Some("Sam")))));

    h.app.session().login(&credentials("sam@example.com")).await.expect("login");

    let notes = h.app.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Welcome back, Sam!");
    assert_eq!(notes[0].expires_at_ms, Some(13_000));
    assert_eq!(h.nav.current_path(), "/");

    let transition = h.app.sync_route();
    assert!(matches!(transition, RouteTransition::Started { variant: LoaderVariant::Classic, .. }));
    assert!(h.app.loading().is_loading);

    h.clock.advance(600);
    h.app.tick();
    assert!(!h.app.loading().is_loading);
    assert_eq!(h.app.notifications().len(), 1);

    h.clock.advance(2400);
    h.app.tick();
    assert!(h.app.notifications().is_empty());
}

#[tokio::test]
async fn failed_login_shows_single_error_and_stays_put() {
    let h = harness("/account/login");
    h.app.mount().await;
    h.backend.script_login(Reply::Now(Err(IdentityError::InvalidCredentials)));

    assert!(h.app.session().login(&credentials("sam@example.com")).await.is_err());

    let notes = h.app.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(h.app.sync_route(), RouteTransition::Unchanged);
}

#[tokio::test]
async fn navigation_to_collection_uses_fabric_loader() {
    let h = harness("/");
    h.app.mount().await;
    h.nav.visit("/collection/linen");
    assert!(matches!(
        h.app.sync_route(),
        RouteTransition::Started { variant: LoaderVariant::Fabric, .. }
    ));
    assert_eq!(h.app.loading().variant, LoaderVariant::Fabric);
    assert_eq!(h.app.next_deadline_ms(), Some(10_600));
}

#[tokio::test]
async fn query_change_restarts_loader_when_watched() {
    let h = harness("/collection");
    h.app.mount().await;
    h.nav.visit("/collection?sort=price");
    assert!(matches!(h.app.sync_route(), RouteTransition::Started { .. }));
    h.clock.advance(300);
    h.nav.visit("/checkout");
    assert!(matches!(
        h.app.sync_route(),
        RouteTransition::Restarted { variant: LoaderVariant::Minimal, .. }
    ));
    h.clock.advance(300);
    h.app.tick();
    assert!(h.app.loading().is_loading);
}

// =============================================================================
// Dismiss and teardown
// =============================================================================

#[tokio::test]
async fn manual_dismiss_keeps_other_notification_timer() {
    let h = harness("/");
    h.app.mount().await;
    let notifier = h.app.notifier();
    let welcome = notifier.notify("Welcome back, Sam!", NotificationKind::Success);
    let other = notifier.notify("Saved to wishlist", NotificationKind::Info);

    h.clock.advance(1000);
    h.app.tick();
    assert!(h.app.dismiss(&welcome));
    assert_eq!(h.app.notifications().len(), 1);
    assert!(!h.app.dismiss(&welcome));

    h.clock.advance(1999);
    h.app.tick();
    assert_eq!(h.app.notifications()[0].id, other);

    h.clock.advance(1);
    h.app.tick();
    assert!(h.app.notifications().is_empty());
}

#[tokio::test]
async fn teardown_cancels_loader_and_clears_notifications() {
    let h = harness("/");
    h.app.mount().await;
    h.app.notifier().notify("Hello", NotificationKind::Info);
    h.nav.visit("/cart");
    h.app.sync_route();

    h.app.teardown();

    assert!(!h.app.loading().is_loading);
    assert!(h.app.notifications().is_empty());
    assert_eq!(h.app.next_deadline_ms(), None);
}
