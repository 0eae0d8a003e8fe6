use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dqd_monitor::bot::{
    BotApiClient, BotStreamClient, CandleFeed, LogLevel, Position, StreamMessage,
    new_bot_stream_client, to_candles,
};
use dqd_monitor::config::AppConfig;
use dqd_monitor::indicators::{StrategyConfig, last_signal, pnl_percent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dqd_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let api = BotApiClient::new(&config.api_url)?;
    let mut strategy = config.load_strategy().context("failed to load strategy config")?;

    info!(
        symbol = %config.symbol,
        timeframe = %config.timeframe,
        api = %config.api_url,
        "Starting monitor"
    );

    match api.get_config(&config.symbol).await {
        Ok(bot_config) => strategy = strategy.with_bot_config(&bot_config),
        Err(e) => warn!(error = %e, "Using local exit levels, bot config unavailable"),
    }

    let mut feed = CandleFeed::new(config.timeframe, config.candle_limit);
    let candles = api
        .get_candles(&config.symbol, config.timeframe, config.candle_limit, config.heikin_ashi)
        .await
        .context("failed to fetch initial candles")?;
    feed.merge(&to_candles(&candles)?);
    report_indicators(&feed, &strategy);

    match api.get_position(&config.symbol).await {
        Ok(Some(position)) => report_position(&position, &strategy),
        Ok(None) => debug!(symbol = %config.symbol, "No open position"),
        Err(e) => warn!(error = %e, "Position unavailable"),
    }

    let mut stream = new_bot_stream_client(config.ws_url.clone());
    let mut messages = stream
        .connect()
        .await
        .context("failed to connect to bot stream")?;

    let mut refresh = tokio::time::interval(config.candle_refresh);
    refresh.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            message = messages.recv() => {
                let Some(message) = message else {
                    warn!(
                        delay_secs = config.stream_reconnect_delay.as_secs(),
                        "Bot stream closed, reconnecting"
                    );
                    tokio::select! {
                        reconnected = reconnect(&mut stream, config.stream_reconnect_delay) => {
                            messages = reconnected;
                        }
                        _ = &mut shutdown => {
                            info!("Shutting down");
                            break;
                        }
                    }
                    continue;
                };
                handle_message(message, &config.symbol, &mut feed, &strategy);
            }
            _ = refresh.tick() => {
                let fetched = api
                    .get_candles(
                        &config.symbol,
                        config.timeframe,
                        config.candle_limit,
                        config.heikin_ashi,
                    )
                    .await;
                match fetched.map(|c| to_candles(&c)) {
                    Ok(Ok(candles)) => {
                        feed.merge(&candles);
                        report_indicators(&feed, &strategy);
                    }
                    Ok(Err(e)) | Err(e) => warn!(error = %e, "Candle refresh failed"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    stream.disconnect().await;
    Ok(())
}

/// Reopens the push feed, waiting `delay` before every attempt, until it succeeds.
async fn reconnect(stream: &mut BotStreamClient, delay: Duration) -> Receiver<StreamMessage> {
    loop {
        tokio::time::sleep(delay).await;
        match stream.reconnect().await {
            Ok(messages) => return messages,
            Err(e) => warn!(error = %e, "Bot stream reconnect failed"),
        }
    }
}

fn handle_message(
    message: StreamMessage,
    symbol: &str,
    feed: &mut CandleFeed,
    strategy: &StrategyConfig,
) {
    match message {
        StreamMessage::Price(ticker) if ticker.symbol == symbol => {
            let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
            feed.apply_price(now, ticker.price);
            report_indicators(feed, strategy);
        }
        StreamMessage::Position(position) if position.symbol == symbol => {
            report_position(&position, strategy);
        }
        StreamMessage::Log(entry) => match entry.level {
            LogLevel::Error => warn!(bot_log = %entry.message, "Bot error"),
            LogLevel::Warning => warn!(bot_log = %entry.message, "Bot warning"),
            LogLevel::Info | LogLevel::Success => info!(bot_log = %entry.message, "Bot log"),
        },
        other => debug!(kind = other.kind(), "Ignoring stream message"),
    }
}

fn report_indicators(feed: &CandleFeed, strategy: &StrategyConfig) {
    let enriched = feed.enriched(strategy);
    let Some(latest) = enriched.last() else {
        return;
    };

    info!(
        close = latest.candle.get_close(),
        trend = latest.trend_value,
        magnetic = latest.reference_line,
        signal = ?latest.signal,
        "Indicators updated"
    );

    if let Some(signaled) = last_signal(&enriched) {
        debug!(
            at = signaled.get_timestamp(),
            signal = ?signaled.signal,
            "Most recent crossover"
        );
    }
}

fn report_position(position: &Position, strategy: &StrategyConfig) {
    let levels = position.levels(strategy);
    let hit = levels.targets_hit(position.current_price, position.side);

    info!(
        side = %position.side,
        entry = position.entry_price,
        price = position.current_price,
        pnl_percent = pnl_percent(position.entry_price, position.current_price, position.side),
        tp1 = levels.tp1,
        tp2 = levels.tp2,
        tp3 = levels.tp3,
        tp4 = levels.tp4,
        sl = levels.sl,
        trailing = levels.trailing,
        targets_hit = hit.iter().filter(|&&h| h).count(),
        "Position levels"
    );

    if levels.stop_hit(position.current_price, position.side) {
        warn!(price = position.current_price, sl = levels.sl, "Price is beyond the stop loss");
    }
}
