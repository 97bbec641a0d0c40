//! `carebridge status`: Show effective configuration.

use carebridge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let config_path = AppConfig::config_path();

    println!("CareBridge Status");
    println!("=================");
    println!("  Config file:  {}", config_path.display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Listen:       {}:{}", config.gateway.host, config.gateway.port);
    println!("  Timeout:      {}s", config.gateway.request_timeout_secs);
    println!(
        "  Origins:      {}",
        if config.gateway.allowed_origins.is_empty() {
            "(same-origin only)".to_string()
        } else {
            config.gateway.allowed_origins.join(", ")
        }
    );
    println!("  Language:     {} (default)", config.persona.default_language);
    println!(
        "  Catalog:      {}",
        config.persona.catalog_path.as_deref().unwrap_or("built-in")
    );
    println!("  Summary:      {}", config.summary.strategy.as_str());
    println!("  API key:      {}", if config.api_key.is_some() { "set" } else { "not set" });

    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file, using defaults (run `carebridge onboard` to create one)");
    }

    Ok(())
}
