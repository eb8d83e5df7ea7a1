use clap::Subcommand;

use crate::cli::ui::{highlight, info, success, to_json};
use crate::error::AppError;
use crate::settings::{get_settings, update_settings, SETTING_KEYS};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current settings
    Show,
    /// Show data file paths
    Path,
    /// Change a setting
    Set {
        /// One of: dataDir, historyLimit, autoSaveHistory, batchConcurrency
        key: String,
        /// New value (empty string clears dataDir)
        value: String,
    },
}

pub fn execute(cmd: ConfigCommand) -> Result<(), AppError> {
    match cmd {
        ConfigCommand::Show => show_settings(),
        ConfigCommand::Path => show_path(),
        ConfigCommand::Set { key, value } => set_setting(&key, &value),
    }
}

fn show_settings() -> Result<(), AppError> {
    let settings = get_settings();
    println!("{}", highlight("Current Settings"));
    println!("{}", "=".repeat(50));
    let json = to_json(&settings).map_err(|e| AppError::JsonSerialize { source: e })?;
    println!("{}", json);
    Ok(())
}

fn show_path() -> Result<(), AppError> {
    println!("{}", highlight("Data Paths"));
    println!("{}", "=".repeat(50));
    println!("Settings:  {}", crate::config::get_settings_path().display());
    println!("Data dir:  {}", crate::config::get_app_config_dir().display());
    println!("Roots:     {}", describe(&crate::config::get_roots_path()));
    println!("History:   {}", describe(&crate::config::get_history_path()));
    Ok(())
}

fn describe(path: &std::path::Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) => format!("{} ({} bytes)", path.display(), meta.len()),
        Err(_) => format!("{} (not created yet)", path.display()),
    }
}

fn set_setting(key: &str, value: &str) -> Result<(), AppError> {
    if !SETTING_KEYS.contains(&key) {
        return Err(AppError::InvalidInput(format!(
            "Unknown setting '{key}'. Available: {}",
            SETTING_KEYS.join(", ")
        )));
    }

    let mut settings = get_settings();
    settings.set_value(key, value)?;
    update_settings(settings)?;

    println!("{}", success(&format!("✓ {key} updated")));
    if key == "dataDir" {
        println!(
            "{}",
            info("Existing roots and history stay in the previous directory.")
        );
    }
    Ok(())
}
