//! `carebridge doctor`: Diagnose configuration and backend health.

use carebridge_config::AppConfig;
use carebridge_core::Provider;
use carebridge_persona::PersonaCatalog;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("CareBridge Doctor: System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file at {}, using defaults", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  1 issue found. Fix the config before running other checks.");
            return Ok(());
        }
    };

    match PersonaCatalog::from_config(&config.persona) {
        Ok(catalog) => {
            let languages: Vec<&str> = catalog.languages().map(|l| l.as_str()).collect();
            let conditions: Vec<&str> = catalog.conditions().map(|c| c.as_str()).collect();
            println!(
                "  ✅ Persona catalog complete: {} personas (languages: {}; conditions: {})",
                catalog.len(),
                languages.join(", "),
                conditions.join(", ")
            );
        }
        Err(e) => {
            println!("  ❌ Persona catalog invalid: {e}");
            issues += 1;
        }
    }

    let router = carebridge_providers::router::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => println!(
                "  ✅ Provider '{}' reachable (schema output: {})",
                provider.name(),
                if provider.supports_output_schema() { "yes" } else { "no" }
            ),
            Ok(false) => {
                println!("  ⚠️  Provider '{}' responded but reported unhealthy", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        None => {
            println!("  ❌ No provider configured for '{}'", config.default_provider);
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
