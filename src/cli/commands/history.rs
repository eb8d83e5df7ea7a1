use clap::Subcommand;

use crate::cli::ui::{create_table, highlight, info, success, to_json, truncate};
use crate::error::AppError;
use crate::settings::get_settings;
use crate::store::AppState;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved translations, most recent first
    List {
        /// Maximum number of entries to show (defaults to the historyLimit setting)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all saved translations
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn execute(cmd: HistoryCommand) -> Result<(), AppError> {
    match cmd {
        HistoryCommand::List { limit, json } => list_history(limit, json),
        HistoryCommand::Clear { yes } => clear_history(yes),
    }
}

fn list_history(limit: Option<usize>, json: bool) -> Result<(), AppError> {
    let limit = limit.unwrap_or_else(|| get_settings().history_limit);
    let state = AppState::open()?;
    let entries = state.history.list(Some(limit))?;

    if json {
        let json = to_json(&entries).map_err(|e| AppError::JsonSerialize { source: e })?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", info("No translation history."));
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "中文", "English", "Created"]);
    for entry in &entries {
        table.add_row(vec![
            entry.id.to_string(),
            truncate(&entry.chinese_text, 40),
            truncate(&entry.english_text, 60),
            entry
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ]);
    }

    println!("{}", highlight("Translation History"));
    println!("{}", table);
    let total = state.history.len()?;
    if total > entries.len() {
        println!(
            "{}",
            info(&format!("Showing {} of {} entries", entries.len(), total))
        );
    }
    Ok(())
}

fn clear_history(yes: bool) -> Result<(), AppError> {
    let state = AppState::open()?;

    if !yes && !state.history.is_empty()? {
        let confirm = inquire::Confirm::new("Delete all translation history?")
            .with_default(false)
            .prompt()
            .map_err(|e| AppError::Message(format!("Prompt failed: {}", e)))?;
        if !confirm {
            println!("{}", info("Cancelled."));
            return Ok(());
        }
    }

    let removed = state.history.clear()?;
    println!("{}", success(&format!("✓ Cleared {removed} history entries")));
    Ok(())
}
