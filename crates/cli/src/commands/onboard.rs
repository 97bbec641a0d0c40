//! `carebridge onboard`: First-time setup.

use carebridge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("CareBridge: First-Time Setup");
    println!("=============================\n");

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Make sure Ollama is running and `ollama pull phi3:mini` has completed");
    println!("      (or point default_provider at an OpenAI-compatible endpoint)");
    println!("   2. Run: carebridge doctor");
    println!("   3. Run: carebridge serve\n");

    Ok(())
}
