//! `clinicbot onboard` — initialize the configuration file.
//!
//! Creates `~/.clinicbot/config.json` with defaults so the user can
//! fill in an LLM API key.

use anyhow::Result;
use colored::Colorize;

use clinicbot_core::config::{get_config_path, load_config, save_config};
use clinicbot_core::utils::get_data_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🩺 Clinicbot — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    // 1. Create config if it doesn't exist
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Create the history directory used by the REPL
    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)?;

    println!();
    println!(
        "  Set an API key (e.g. {}) and run {}.",
        "CLINICBOT_PROVIDERS__OPENROUTER__API_KEY".bold(),
        "`clinicbot chat`".bold()
    );
    println!();

    Ok(())
}
