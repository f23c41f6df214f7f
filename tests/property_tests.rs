//! Property-based tests for the navigation resilience layer.
//!
//! Tests validate:
//! 1. The scroll store keeps exactly the most recently touched keys
//! 2. A saved offset reads back unchanged
//! 3. An explicit route offset beats any saved one
//! 4. Unsaved keys restore to the top
//! 5. At most one scroll listener is attached across any navigation sequence
//! 6. The placeholder is never blank, whatever fails
//! 7. Skeleton visibility is the OR of navigation and page signals

use navshell::announce::SharedLiveRegion;
use navshell::dom::{Document, DomNode, Element, ElementSpec, Overflow};
use navshell::model::{
    NavigationAction, NavigationState, RouteKey, RouteMeta, RouteTable, RouterEvent,
};
use navshell::scroll::{
    DomWalkLocator, FixedLocator, RestoreOutcome, ScrollCoordinator, ScrollPositionStore,
};
use navshell::shell::{AppShell, ShellConfig};
use navshell::skeleton::{
    BlockSkeleton, FallbackLedger, FlakySkeleton, ResilientRenderer, SkeletonRef,
    PLACEHOLDER_LABEL, PLACEHOLDER_ROLE,
};
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn key(i: usize) -> RouteKey {
    RouteKey::new(format!("/page/{i}")).expect("valid route key")
}

fn page() -> Document {
    Document::build(
        ElementSpec::new("body").child(
            ElementSpec::new("main")
                .id("content")
                .primary()
                .heights(20_000.0, 600.0)
                .overflow(Overflow::Auto),
        ),
    )
}

fn action(n: u8) -> NavigationAction {
    match n % 3 {
        0 => NavigationAction::Push,
        1 => NavigationAction::Replace,
        _ => NavigationAction::Pop,
    }
}

// ===== Property 1: Capacity =====

proptest! {
    #[test]
    fn store_keeps_most_recent_keys(capacity in 1usize..20, extra in 1usize..20) {
        let mut store = ScrollPositionStore::with_capacity(capacity);
        let total = capacity + extra;
        for i in 0..total {
            store.save(key(i), (i + 1) as f64);
        }

        prop_assert_eq!(store.len(), capacity);
        for i in 0..extra {
            prop_assert_eq!(store.get(&key(i)), 0.0, "key {} should be evicted", i);
        }
        for i in extra..total {
            prop_assert_eq!(store.get(&key(i)), (i + 1) as f64);
        }
    }

    #[test]
    fn resaving_a_key_protects_it_from_eviction(capacity in 2usize..12) {
        let mut store = ScrollPositionStore::with_capacity(capacity);
        for i in 0..capacity {
            store.save(key(i), 10.0);
        }
        store.save(key(0), 99.0);
        store.save(key(capacity), 10.0);

        prop_assert_eq!(store.get(&key(0)), 99.0);
        prop_assert_eq!(store.get(&key(1)), 0.0);
    }
}

// ===== Property 2: Idempotent restore =====

proptest! {
    #[test]
    fn saved_offset_reads_back_exactly(i in 0usize..1000, offset in 0.0f64..1.0e7) {
        let mut store = ScrollPositionStore::default();
        store.save(key(i), offset);
        prop_assert_eq!(store.get(&key(i)), offset);
    }

    #[test]
    fn last_write_wins(first in 0.0f64..1.0e6, second in 0.0f64..1.0e6) {
        let mut store = ScrollPositionStore::default();
        store.save(key(1), first);
        store.save(key(1), second);
        prop_assert_eq!(store.get(&key(1)), second);
    }
}

// ===== Properties 3 and 4: Explicit override, top on new =====

fn coordinator_for(doc: &Document) -> ScrollCoordinator<Element, FixedLocator<Element>> {
    let element = doc.get_element_by_id("content");
    ScrollCoordinator::new(
        ScrollPositionStore::default(),
        FixedLocator::new(element),
        Duration::from_millis(100),
    )
}

proptest! {
    #[test]
    fn explicit_offset_beats_saved_offset(saved in 0.0f64..15_000.0) {
        let doc = page();
        let mut coordinator = coordinator_for(&doc);
        let meta = RouteMeta {
            scroll_restoration: Some(500.0),
            ..RouteMeta::default()
        };

        let element = doc.get_element_by_id("content").expect("content");
        coordinator.attach(&doc.root(), key(7), &RouteMeta::default());
        element.scroll_to(saved).expect("scrollable");
        coordinator.detach();
        prop_assert_eq!(coordinator.store().get(&key(7)), saved);

        let outcome = coordinator.attach(&doc.root(), key(7), &meta);
        prop_assert_eq!(outcome, RestoreOutcome::Explicit(500.0));
        prop_assert_eq!(element.scroll_top().expect("scrollable"), 500.0);
    }

    #[test]
    fn unsaved_key_restores_to_top(i in 0usize..500, start in 0.0f64..15_000.0) {
        let doc = page();
        let element = doc.get_element_by_id("content").expect("content");
        element.scroll_to(start).expect("scrollable");
        let mut coordinator = coordinator_for(&doc);

        let outcome = coordinator.attach(&doc.root(), key(i), &RouteMeta::default());
        prop_assert_eq!(outcome, RestoreOutcome::Top);
        prop_assert_eq!(element.scroll_top().expect("scrollable"), 0.0);
    }
}

// ===== Property 5: Single listener =====

proptest! {
    #[test]
    fn at_most_one_listener_across_navigations(
        steps in prop::collection::vec((0usize..6, any::<u8>(), any::<bool>(), any::<bool>()), 1..40)
    ) {
        let routes = RouteTable::new().with(
            "/page/5",
            RouteMeta {
                skeleton: Some(SkeletonRef::new("five", BlockSkeleton::new(2))),
                ..RouteMeta::default()
            },
        );
        let mut shell: AppShell<Element> = AppShell::new(
            ShellConfig::default(),
            key(0),
            routes,
            DomWalkLocator,
            SharedLiveRegion::new(Duration::from_millis(1000)),
        );
        let t0 = Instant::now();
        let mut docs = Vec::new();

        for (n, (route, act, settle, mount)) in steps.into_iter().enumerate() {
            let now = t0 + Duration::from_millis(n as u64 * 150);
            shell.handle_router_event(
                RouterEvent::NavigationStarted { to: key(route), action: action(act) },
                now,
            );
            prop_assert_eq!(shell.listener_count(), 0);
            if mount {
                let doc = page();
                shell.content_mounted(&doc.root(), now);
                docs.push(doc);
            }
            if settle {
                shell.handle_router_event(RouterEvent::NavigationSettled { to: key(route) }, now);
            }
            shell.tick(now + Duration::from_millis(50));

            let attached: usize = docs.iter().map(Document::listener_count).sum();
            prop_assert!(attached <= 1, "{} listeners attached", attached);
            prop_assert!(shell.listener_count() <= 1);
        }
    }
}

// ===== Property 6: Skeleton never blank =====

fn check(renderer: &mut ResilientRenderer) -> Result<(), TestCaseError> {
    let placeholder = renderer.render();
    prop_assert_eq!(placeholder.role, PLACEHOLDER_ROLE);
    prop_assert_eq!(placeholder.label, PLACEHOLDER_LABEL);
    prop_assert!(placeholder.busy);
    prop_assert!(!placeholder.body.is_empty());
    Ok(())
}

proptest! {
    #[test]
    fn placeholder_always_accessible(
        failures in 0u32..12,
        max_retries in 0u32..6,
        reported in 0u32..8,
    ) {
        let flaky = FlakySkeleton::new("flaky", BlockSkeleton::new(3), failures);
        let mut renderer = ResilientRenderer::new(
            SkeletonRef::new("flaky", flaky),
            FallbackLedger::new(),
            max_retries,
        );

        check(&mut renderer)?;
        renderer.tick();
        check(&mut renderer)?;
        for _ in 0..reported {
            renderer.report_failure();
            check(&mut renderer)?;
        }
    }
}

// ===== Property 7: Visibility OR-composition =====

fn router_state(n: u8) -> NavigationState {
    match n % 3 {
        0 => NavigationState::Idle,
        1 => NavigationState::Loading,
        _ => NavigationState::Submitting,
    }
}

proptest! {
    #[test]
    fn shell_frame_follows_navigation_and_page_signals(
        declares: bool,
        state in any::<u8>().prop_map(router_state),
        settled: bool,
        page_loading: bool,
        other_page_loading: bool,
    ) {
        let routes = RouteTable::new().with(
            "/list",
            RouteMeta {
                skeleton: Some(SkeletonRef::new("list", BlockSkeleton::new(3))),
                ..RouteMeta::default()
            },
        );
        // No minimum hold, so hiding is observable at once.
        let config = ShellConfig {
            skeleton_min_display: Duration::ZERO,
            ..ShellConfig::default()
        };
        let mut shell: AppShell<Element> = AppShell::new(
            config,
            RouteKey::new("/home").expect("valid route key"),
            routes,
            DomWalkLocator,
            SharedLiveRegion::new(Duration::from_millis(1000)),
        );
        let dest = RouteKey::new(if declares { "/list" } else { "/plain" }).expect("valid route key");
        let other = RouteKey::new("/other").expect("valid route key");
        let now = Instant::now();

        shell.handle_router_event(
            RouterEvent::NavigationStarted { to: dest.clone(), action: NavigationAction::Push },
            now,
        );
        shell.handle_router_event(RouterEvent::StateChanged(state), now);
        if settled {
            shell.handle_router_event(RouterEvent::NavigationSettled { to: dest.clone() }, now);
        }
        shell.set_page_loading(other, other_page_loading, now);
        let frame = shell.set_page_loading(dest.clone(), page_loading, now);

        let in_flight = !settled || state.is_in_flight();
        let expected = declares && (in_flight || page_loading);
        prop_assert_eq!(frame.is_skeleton(), expected);
        prop_assert_eq!(shell.skeleton_visible(), expected);
        prop_assert_eq!(frame.key(), &dest);
    }
}
