use anyhow::Result;
use owo_colors::OwoColorize;
use youthplan_core::config::{API_KEY_ENV, PlannerConfig};

pub fn run() -> Result<()> {
    let config_path = PlannerConfig::config_path()?;
    let config = PlannerConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", config.data_path().display());

    let api_key = if std::env::var(API_KEY_ENV).is_ok_and(|key| !key.trim().is_empty()) {
        "set".green().to_string()
    } else {
        "not set (AI features disabled)".yellow().to_string()
    };

    println!();
    println!("{}", "Completion".bold());
    println!("  Model:        {}", config.model);
    println!("  API base:     {}", config.api_base);
    println!("  Temperature:  {}", config.temperature);
    println!("  {}:  {}", API_KEY_ENV, api_key);

    Ok(())
}
