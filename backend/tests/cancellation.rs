//! Cancellation of dispatched requests.

mod support;

use backend::application::{CustomerCreateCommand, CustomerFindAllQuery, DispatchError};
use result_pipeline::Cancelled;
use support::World;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn cancelled_token_prevents_the_handler_from_running() {
    let world = World::new();
    let token = CancellationToken::new();
    token.cancel();

    let result = world
        .requester
        .send(
            CustomerCreateCommand {
                first_name: "John".to_owned(),
                last_name: "Doe".to_owned(),
                email: "john.doe@example.com".to_owned(),
                birth_date: None,
                addresses: Vec::new(),
            },
            &token,
        )
        .await;

    assert_eq!(result.err(), Some(DispatchError::Cancelled(Cancelled)));
    assert_eq!(world.repository.reads(), 0);
    assert_eq!(world.repository.writes(), 0);
    assert!(world.notifier.published().await.is_empty());
}

#[tokio::test]
async fn live_token_lets_requests_complete() {
    let world = World::new();
    let created = world
        .create("John", "Doe", "john.doe@example.com")
        .await
        .into_value()
        .expect("created");

    let listed = world
        .requester
        .send(CustomerFindAllQuery::default(), &CancellationToken::new())
        .await
        .expect("not cancelled")
        .into_value()
        .expect("listed");

    assert_eq!(listed, [created]);
}
