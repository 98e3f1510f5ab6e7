use crate::conf::{ConfigError, load_config};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!(
                "✔ monitor: {} every {}s, {}s window, alert above {} hits/min",
                cfg.monitor.log_path.display(),
                cfg.monitor.refresh_period,
                cfg.monitor.monitor_duration,
                cfg.monitor.alert_threshold
            );
            println!(
                "✔ generator: {} at {} lines/min",
                cfg.generator.log_path.display(),
                cfg.generator.rate
            );
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    match err {
        ConfigError::Invalid { violations } => {
            eprintln!(
                "configuration validation failed ({} errors)\n",
                violations.len()
            );
            for v in violations {
                if plain {
                    eprintln!("  error: {v}");
                } else {
                    eprintln!("  {}: {v}", "error".red().bold());
                }
            }
        }
        other => {
            if plain {
                eprintln!("{other}");
            } else {
                eprintln!("{}: {other}", "error".red().bold());
            }
        }
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Create a config file with:\n\
             \n\
             logwatch config init",
        ),

        ConfigError::Parse { .. } => Some(
            "Settings live in optional `monitor` and `generator` blocks.\n\
             \n\
             Example:\n\
             \n\
             monitor {\n\
             \x20 log_path        = \"access.log\"\n\
             \x20 alert_threshold = 10\n\
             }",
        ),

        ConfigError::Invalid { .. } => Some(
            "Periods, durations, thresholds and rates must be positive numbers.",
        ),
    }
}
