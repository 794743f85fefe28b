pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod render;
pub mod resilience;

use std::time::Duration;

use anyhow::Result;
use app::session::SkySession;
use app::settings::{API_KEY_ENV, RuntimeSettings, load_runtime_settings};
use chrono::Utc;
use cli::{Cli, FormatArg};
use data::openweather::WeatherClient;
use data::repository::WeatherRepository;
use domain::celestial::Clock;
use tokio::time::{MissedTickBehavior, interval};

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let (settings, path) = load_runtime_settings(&cli, true);
    if let Some(path) = &path {
        log::debug!("settings path: {}", path.display());
    }

    let query = cli.weather_query(settings.default_city());
    let repository = build_repository(&cli, &settings);
    let mut session = SkySession::new(repository, query).with_manual_hour(cli.hour);
    let color = render::color_enabled(cli.effective_color_mode());

    session.refresh(true).await;

    if !cli.watch {
        return print_frame(&session, settings.format, color);
    }
    watch(&mut session, &settings, color).await
}

fn build_repository(cli: &Cli, settings: &RuntimeSettings) -> Option<WeatherRepository> {
    if cli.offline {
        log::info!("offline mode: using the stylised day cycle");
        return None;
    }
    let Some(api_key) = settings.resolve_api_key(std::env::var(API_KEY_ENV).ok()) else {
        log::warn!("no OpenWeather API key configured; falling back to the stylised day cycle");
        return None;
    };
    let client = match &cli.weather_url {
        Some(url) => WeatherClient::with_base_url(api_key, url.as_str()),
        None => WeatherClient::new(api_key),
    };
    Some(WeatherRepository::new(client, settings.cache_ttl_secs))
}

async fn watch<C: Clock>(
    session: &mut SkySession<C>,
    settings: &RuntimeSettings,
    color: bool,
) -> Result<()> {
    let mut tick = interval(Duration::from_secs(settings.tick_interval_secs));
    let mut refresh = interval(Duration::from_secs(settings.refresh_interval_secs));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Both intervals fire immediately; the startup refresh already ran.
    refresh.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                log::info!("interrupted, stopping");
                return Ok(());
            }
            _ = refresh.tick() => {
                session.refresh(true).await;
            }
            _ = tick.tick() => {
                print_frame(session, settings.format, color)?;
                if settings.format == FormatArg::Text {
                    println!();
                }
            }
        }
    }
}

fn print_frame<C: Clock>(session: &SkySession<C>, format: FormatArg, color: bool) -> Result<()> {
    let frame = session.frame(Utc::now());
    let output = render::render_frame(&frame, format, color)?;
    print!("{output}");
    if format == FormatArg::Json {
        println!();
    }
    Ok(())
}
