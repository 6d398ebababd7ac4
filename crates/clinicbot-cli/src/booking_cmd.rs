//! Direct booking commands — query the booking API without the LLM.
//!
//! Useful for checking connectivity and looking up the ids the agent
//! works with internally.

use anyhow::{Context, Result};
use chrono::{Local, Months};
use colored::Colorize;

use clinicbot_booking::{AvailabilityQuery, BookingClient};
use clinicbot_core::config::load_config;

/// `clinicbot services` — list the clinic's services.
pub async fn services() -> Result<()> {
    let client = make_client();
    let services = client.services().await.context("failed to fetch services")?;

    println!();
    println!("{}", "Services".cyan().bold());
    if services.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for service in &services {
        println!("  {:>6}  {}", service.id.to_string().dimmed(), service.name);
    }
    println!();
    Ok(())
}

/// `clinicbot providers <SERVICE>` — list the providers for a service.
pub async fn providers(service: i64) -> Result<()> {
    let client = make_client();
    let providers = client
        .providers(service)
        .await
        .context("failed to fetch providers")?;

    println!();
    println!("{} {}", "Providers for service".cyan().bold(), service);
    if providers.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for provider in &providers {
        println!("  {:>6}  {}", provider.id.to_string().dimmed(), provider.name);
    }
    println!();
    Ok(())
}

/// `clinicbot availability` — query free slots.
pub async fn availability(
    date_init: Option<String>,
    date_end: Option<String>,
    services: Vec<i64>,
    providers: Vec<i64>,
) -> Result<()> {
    let client = make_client();

    let query = AvailabilityQuery {
        date_init: date_init.unwrap_or_else(default_date_init),
        date_end: date_end.unwrap_or_else(default_date_end),
        services,
        providers,
    };

    let slots = client
        .availability(&query)
        .await
        .context("failed to fetch availability")?;

    println!();
    println!(
        "{} {} → {}",
        "Availability".cyan().bold(),
        query.date_init.dimmed(),
        query.date_end.dimmed()
    );
    if slots.is_empty() {
        println!("  {}", "(no free slots)".dimmed());
    }
    for slot in &slots {
        println!(
            "  {}  {}–{}  service {} / provider {}  ({} min)",
            slot.day.bold(),
            slot.start_time,
            slot.end_time,
            slot.service_id,
            slot.provider_id,
            slot.duration
        );
    }
    println!();
    Ok(())
}

/// Build a booking client from the loaded config.
fn make_client() -> BookingClient {
    let config = load_config(None);
    BookingClient::new(&config.booking)
}

/// Default range start: now, in the booking API's timestamp format.
fn default_date_init() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Default range end: three months from now.
fn default_date_end() -> String {
    let now = Local::now();
    now.checked_add_months(Months::new(3))
        .unwrap_or(now)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dates_have_api_format() {
        let init = default_date_init();
        let end = default_date_end();
        assert_eq!(init.len(), 20);
        assert_eq!(end.len(), 20);
        assert!(init.ends_with('Z'));
        assert!(end.ends_with('Z'));
    }

    #[test]
    fn default_end_is_after_init() {
        // Lexicographic comparison works for this timestamp format
        assert!(default_date_end() > default_date_init());
    }
}
