//! Terminal front end for the booking flow.
//!
//! Usage: `book <context.json> <YYYY-MM-DD> [service_id] [notes]`
//!
//! `context.json` holds what the previous screen would pass along:
//! `{"vehicle": {...}, "selected_service": {...}, "from_services": true}`.
//!
//! Exits with 2 when the form blocks the booking, 1 when the backend does.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use garage_booking::config::AppConfig;
use garage_booking::services::api::http::HttpServiceApi;
use garage_booking::services::booking_form::BookingForm;
use garage_booking::services::catalog::{load_catalog, LoadOutcome, NavigationContext};
use garage_booking::services::credentials::EnvCredentials;
use garage_booking::services::format::{format_price, format_time};
use garage_booking::services::navigation::ChannelNavigator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (context_path, date) = match args.as_slice() {
        [context, date, ..] => (context, date),
        _ => anyhow::bail!("usage: book <context.json> <YYYY-MM-DD> [service_id] [notes]"),
    };
    let service_id: Option<i64> = args
        .get(2)
        .map(|s| s.parse::<i64>())
        .transpose()
        .context("service_id must be a number")?;
    let notes = args.get(3).cloned().unwrap_or_default();

    let raw = std::fs::read_to_string(context_path)
        .with_context(|| format!("failed to read {context_path}"))?;
    let ctx: NavigationContext =
        serde_json::from_str(&raw).context("failed to parse navigation context")?;

    let config = AppConfig::from_env();
    let api = HttpServiceApi::new(config.api_base_url.clone());
    let credentials = EnvCredentials;
    let (navigator, mut routes) = ChannelNavigator::new();

    let session = match load_catalog(ctx, &api, &credentials).await {
        LoadOutcome::Ready(session) => session,
        LoadOutcome::Redirect(route) => {
            println!("Redirecting to {route}");
            std::process::exit(1);
        }
    };

    if let Some(err) = &session.load_error {
        println!("{err}");
    }
    for service in &session.services {
        println!(
            "[{}] {} ({}) {} · {}",
            service.service_id,
            service.name,
            service.category,
            format_price(service.base_price),
            format_time(service.estimated_time),
        );
    }

    let mut form = BookingForm::new(session).with_redirect_delay(config.redirect_delay);
    if let Some(id) = service_id {
        if let Err(e) = form.select_service_by_id(id) {
            println!("{e}");
            std::process::exit(1);
        }
    }
    form.set_scheduled_date(date.clone());
    form.set_notes(notes);

    if let Some(vehicle) = form.vehicle() {
        println!("Vehicle: {} [{}]", vehicle.display_name(), vehicle.registration_number);
    }
    println!(
        "Estimated cost: {}",
        format_price(form.draft().estimated_cost)
    );

    match form.submit(&api, &credentials, &navigator).await {
        Ok(()) => {
            println!("{}", form.success_message().unwrap_or_default());
            if let Some(route) = routes.recv().await {
                println!("Redirecting to {route}");
            }
            Ok(())
        }
        Err(e) => {
            println!("{e}");
            while let Ok(route) = routes.try_recv() {
                println!("Redirecting to {route}");
            }
            // 2: fix the input and rerun; 1: the backend refused or was unreachable.
            std::process::exit(if e.is_validation() { 2 } else { 1 });
        }
    }
}
