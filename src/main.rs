use fridgebook::state::AppState;
use fridgebook::storage::Collection;
use time::OffsetDateTime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fridgebook=debug,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    let warning_days = app_state.config.expiry_warning_days;
    let mut kitchen = app_state.kitchen();
    let mut subs = kitchen.subscribe_all().await?;

    tracing::info!(policy = ?kitchen.import_policy(), "syncing collections");

    loop {
        let changed = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            changed = kitchen.next_change(&mut subs) => changed,
        };

        match changed {
            Some(Collection::FridgeItems) => {
                let now = OffsetDateTime::now_utc();
                for item in kitchen.expiring(warning_days, now) {
                    tracing::info!(
                        name = %item.fields.name,
                        days = item.days_until_expiry(now),
                        "expiring soon"
                    );
                }
            }
            Some(collection) => tracing::debug!(%collection, "collection synced"),
            None => {
                tracing::warn!("document store feed ended");
                break;
            }
        }
    }

    Ok(())
}
