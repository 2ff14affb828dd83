use axum_market_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::chat::IncomingMessage,
    services::chat_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// The chat log is append-only: history replays in order, and every append
// pushes the refreshed log to subscribers.
#[tokio::test]
async fn chat_log_appends_and_broadcasts() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    assert!(chat_service::message_log(&state).await?.is_empty());

    chat_service::append_message(
        &state,
        IncomingMessage {
            user: "ana".into(),
            message: "hola".into(),
        },
    )
    .await?;

    let mut rx = state.chat_tx.subscribe();
    chat_service::append_and_broadcast(
        &state,
        IncomingMessage {
            user: "bob".into(),
            message: "hey".into(),
        },
    )
    .await?;

    let event = rx.recv().await?;
    assert!(event.contains(r#""event":"messageLog""#));
    assert!(event.contains("hola"));
    assert!(event.contains("hey"));

    let log = chat_service::message_log(&state).await?;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].user, "ana");
    assert_eq!(log[1].user, "bob");
    assert_eq!(log[1].message, "hey");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, chat_messages, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState::new(pool, orm))
}
