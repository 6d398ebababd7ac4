//! `clinicbot status` — show configuration and provider status.

use anyhow::Result;
use colored::Colorize;

use clinicbot_core::config::{get_config_path, load_config, AvailabilityStrategy};

/// Provider names shown in the status listing.
const PROVIDER_NAMES: &[(&str, &str)] = &[
    ("openai", "OpenAI"),
    ("openrouter", "OpenRouter"),
    ("groq", "Groq"),
];

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🩺 Clinicbot Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Model
    println!(
        "  {:<18} {} ({})",
        "Model:".bold(),
        config.agent.model,
        config.agent.provider.clone().dimmed()
    );

    // Temperature & tokens
    println!(
        "  {:<18} {} | max_tokens: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.agent.temperature).dimmed(),
        format!("{}", config.agent.max_tokens).dimmed(),
    );

    // Booking API
    println!();
    println!("  {}", "Booking API:".bold());
    println!("    {:<18} {}", "Base URL:", config.booking.api_base);
    println!("    {:<18} {}", "Store:", config.booking.store);
    println!(
        "    {:<18} {}s",
        "Timeout:", config.booking.timeout_secs
    );
    let strategy = match config.booking.availability_strategy {
        AvailabilityStrategy::Batch => "batch",
        AvailabilityStrategy::PerPair => "perPair",
    };
    println!("    {:<18} {}", "Strategy:", strategy);

    // Providers
    println!();
    println!("  {}", "LLM Providers:".bold());
    for (name, display) in PROVIDER_NAMES {
        let status = match config.providers.get_by_name(name) {
            Some(p) if p.is_configured() => format!("{} (key set)", "✓".green()),
            _ => format!("{}", "· not configured".dimmed()),
        };
        println!("    {:<20} {}", display, status);
    }

    println!();

    Ok(())
}
