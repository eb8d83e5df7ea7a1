use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::ui::{create_table, highlight, info, success, to_json, truncate, warning};
use crate::error::AppError;
use crate::root::ImportAction;
use crate::services::ImportExportService;
use crate::store::AppState;

#[derive(Subcommand)]
pub enum RootsCommand {
    /// List all roots
    List {
        /// Only show roots whose Chinese or English contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a root, or overwrite the English of an existing one
    Add {
        /// Chinese root, e.g. 交易
        chinese: String,
        /// English token, e.g. transaction
        english: String,
    },
    /// Delete a root
    Delete {
        /// Chinese root to delete
        chinese: String,
    },
    /// Delete all roots
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Import roots from a CSV file (first line is a header)
    Import {
        /// CSV file path
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export roots as CSV
    Export {
        /// Output file path (stdout when omitted)
        file: Option<PathBuf>,
    },
}

pub fn execute(cmd: RootsCommand) -> Result<(), AppError> {
    match cmd {
        RootsCommand::List { search, json } => list_roots(search.as_deref(), json),
        RootsCommand::Add { chinese, english } => add_root(&chinese, &english),
        RootsCommand::Delete { chinese } => delete_root(&chinese),
        RootsCommand::Clear { yes } => clear_roots(yes),
        RootsCommand::Import { file, yes } => import_roots(&file, yes),
        RootsCommand::Export { file } => export_roots(file.as_deref()),
    }
}

/// 按中文或英文子串过滤词根
pub fn filter_roots<'a>(
    roots: impl Iterator<Item = (&'a str, &'a str)>,
    term: Option<&str>,
) -> Vec<(&'a str, &'a str)> {
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    roots
        .filter(|(chinese, english)| match term {
            Some(t) => chinese.contains(t) || english.contains(t),
            None => true,
        })
        .collect()
}

fn list_roots(search: Option<&str>, json: bool) -> Result<(), AppError> {
    let state = AppState::open()?;
    let snapshot = state.roots.snapshot()?;
    let rows = filter_roots(snapshot.iter(), search);

    if json {
        let map: indexmap::IndexMap<&str, &str> = rows.into_iter().collect();
        let json = to_json(&map).map_err(|e| AppError::JsonSerialize { source: e })?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        if snapshot.is_empty() {
            println!("{}", info("No roots found."));
            println!("Use 'rootify roots add <中文> <english>' or 'rootify roots import <file>'.");
        } else {
            println!("{}", info("No roots match the search."));
        }
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["中文", "English"]);
    for (chinese, english) in &rows {
        table.add_row(vec![truncate(chinese, 40), truncate(english, 60)]);
    }

    println!("{}", table);
    println!("{}", info(&format!("{} root(s)", rows.len())));
    Ok(())
}

fn add_root(chinese: &str, english: &str) -> Result<(), AppError> {
    let state = AppState::open()?;
    let existed = state.roots.snapshot()?.contains(chinese.trim());

    if !state.roots.add(chinese, english)? {
        return Err(AppError::InvalidInput(
            "Both the Chinese root and its English token must be non-empty".to_string(),
        ));
    }

    let verb = if existed { "Updated" } else { "Added" };
    println!(
        "{}",
        success(&format!("✓ {} root {} → {}", verb, chinese.trim(), english.trim()))
    );
    Ok(())
}

fn delete_root(chinese: &str) -> Result<(), AppError> {
    let state = AppState::open()?;
    if state.roots.delete(chinese)? {
        println!("{}", success(&format!("✓ Deleted root {}", chinese.trim())));
    } else {
        println!("{}", warning(&format!("Root '{}' not found", chinese.trim())));
    }
    Ok(())
}

fn clear_roots(yes: bool) -> Result<(), AppError> {
    let state = AppState::open()?;
    let count = state.roots.len()?;
    if count == 0 {
        println!("{}", info("Dictionary is already empty."));
        return Ok(());
    }

    if !yes && !confirm(&format!("Delete all {count} roots? This cannot be undone."))? {
        println!("{}", info("Cancelled."));
        return Ok(());
    }

    let removed = state.roots.clear()?;
    println!("{}", success(&format!("✓ Cleared {removed} roots")));
    Ok(())
}

fn import_roots(file: &Path, yes: bool) -> Result<(), AppError> {
    if !file.exists() {
        return Err(AppError::Message(format!("File '{}' not found", file.display())));
    }
    let content = fs::read_to_string(file).map_err(|e| AppError::io(file, e))?;

    let state = AppState::open()?;
    let preview = ImportExportService::parse_preview(&content, &*state.roots.snapshot()?)?;

    let mut table = create_table();
    table.set_header(vec!["中文", "English", "Action"]);
    for item in &preview {
        let action = match item.action {
            ImportAction::Add => success("new"),
            ImportAction::Update => warning("update"),
        };
        table.add_row(vec![
            truncate(&item.chinese, 40),
            truncate(&item.english, 60),
            action,
        ]);
    }
    let adds = preview
        .iter()
        .filter(|i| i.action == ImportAction::Add)
        .count();

    println!("{}", highlight("Import preview"));
    println!("{}", table);
    println!(
        "{}",
        info(&format!(
            "{} rows: {} new, {} updates",
            preview.len(),
            adds,
            preview.len() - adds
        ))
    );

    if !yes && !confirm("Import these roots?")? {
        println!("{}", info("Cancelled."));
        return Ok(());
    }

    let summary = ImportExportService::commit(&state.roots, &preview)?;
    println!(
        "{}",
        success(&format!(
            "✓ Imported {} roots ({} added, {} updated)",
            summary.total(),
            summary.added,
            summary.updated
        ))
    );
    Ok(())
}

fn export_roots(file: Option<&Path>) -> Result<(), AppError> {
    let state = AppState::open()?;
    let Some(content) = ImportExportService::export(&state.roots)? else {
        println!("{}", info("No roots to export."));
        return Ok(());
    };

    match file {
        Some(path) => {
            if path.exists()
                && !confirm(&format!("File '{}' already exists. Overwrite?", path.display()))?
            {
                println!("{}", info("Cancelled."));
                return Ok(());
            }
            crate::config::write_text_file(path, &content)?;
            println!(
                "{}",
                success(&format!("✓ Roots exported to {}", path.display()))
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn confirm(message: &str) -> Result<bool, AppError> {
    inquire::Confirm::new(message)
        .with_default(false)
        .prompt()
        .map_err(|e| AppError::Message(format!("Prompt failed: {}", e)))
}
