//! Subscriber registry behavior.

mod support;

use std::sync::Arc;

use circolare::application::repos::SubscribersRepo;
use circolare::application::subscribers::{SubscribeError, SubscribeOutcome, SubscriberService};

use support::InMemoryStore;

fn service(store: &Arc<InMemoryStore>) -> SubscriberService {
    SubscriberService::new(store.clone() as Arc<dyn SubscribersRepo>)
}

#[tokio::test]
async fn duplicate_signup_is_soft() {
    let store = InMemoryStore::new();
    let subscribers = service(&store);

    let first = subscribers.subscribe("a@x.com").await.expect("first");
    assert!(matches!(first, SubscribeOutcome::Subscribed { .. }));

    let second = subscribers.subscribe("a@x.com").await.expect("second");
    assert_eq!(second, SubscribeOutcome::AlreadySubscribed);

    let all = subscribers.list_all().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "a@x.com");
}

#[tokio::test]
async fn invalid_addresses_are_rejected_before_insert() {
    let store = InMemoryStore::new();
    let subscribers = service(&store);

    for bad in ["", "   ", "not-an-email"] {
        let err = subscribers.subscribe(bad).await.unwrap_err();
        assert!(matches!(err, SubscribeError::InvalidEmail(_)));
    }
    assert!(subscribers.list_all().await.expect("list").is_empty());
}

#[tokio::test]
async fn surrounding_whitespace_is_trimmed() {
    let store = InMemoryStore::new();
    let subscribers = service(&store);

    subscribers.subscribe("  b@x.com  ").await.expect("subscribe");
    let all = subscribers.list_all().await.expect("list");
    assert_eq!(all[0].email, "b@x.com");
}
