use std::borrow::Cow;
use std::time::Duration;

use dotenvy::dotenv;
use teloxide::Bot;
use tracing::level_filters;
use tracing_subscriber::fmt::format::FmtSpan;

use flashcardbot::database::connection::Connection;
use flashcardbot::database::files::FileStorage;
use flashcardbot::database::ItemStore;
use flashcardbot::events::Fetcher;
use flashcardbot::processor::Processor;
use flashcardbot::telegram::TelegramClient;

const BATCH_SIZE: u8 = 100;
const IDLE_POLL_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or("error".into());
    tracing_subscriber::fmt()
        .with_max_level(level_filters::LevelFilter::from_level(
            log_level.parse().expect("LOG_LEVEL can't be parsed."),
        ))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_target(false)
        .init();

    let token = std::env::var("TELOXIDE_TOKEN").expect("TELOXIDE_TOKEN should be set.");
    let client = TelegramClient::new(Bot::new(token));
    tracing::info!("Starting flashcard bot...");

    match std::env::var("DATABASE_URL") {
        Ok(connection_string) => {
            let connection = Connection::connect(Cow::Owned(connection_string)).await;
            connection.run_migrations().await;
            run(client, connection).await;
        }
        Err(_) => {
            let base_path = std::env::var("STORAGE_PATH").unwrap_or("storage".into());
            tracing::info!("no DATABASE_URL set, keeping decks under '{}'", base_path);
            run(client, FileStorage::new(base_path)).await;
        }
    }
}

/// The single worker loop: fetch a batch, process it strictly in arrival
/// order, log infrastructure failures and keep polling.
async fn run<S: ItemStore>(client: TelegramClient, store: S) {
    let mut fetcher = Fetcher::new(client.clone(), BATCH_SIZE);
    let mut processor = Processor::new(client, store);

    loop {
        let events = match fetcher.fetch().await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("{e}");
                tokio::time::sleep(IDLE_POLL_DELAY).await;
                continue;
            }
        };

        if events.is_empty() {
            tokio::time::sleep(IDLE_POLL_DELAY).await;
            continue;
        }

        for event in &events {
            if let Err(e) = processor.process(event).await {
                tracing::error!("{e}");
            }
        }
    }
}
