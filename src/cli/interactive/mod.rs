mod utils;

use inquire::Select;

use crate::cli::commands::roots::filter_roots;
use crate::cli::commands::translate::record_history;
use crate::cli::ui::{apply_inquire_theme, create_table, error, highlight, info, success, warning};
use crate::error::AppError;
use crate::services::{TranslatedLine, TranslationService};
use crate::settings::get_settings;
use crate::store::AppState;

use utils::{prompt_confirm, prompt_text};

pub fn run() -> Result<(), AppError> {
    apply_inquire_theme();
    let state = AppState::open()?;

    println!("\n{}", highlight("rootify · 中文字段名翻译"));
    println!(
        "{}",
        info(&format!("{} roots loaded", state.roots.len()?))
    );

    loop {
        let Some(choice) = show_main_menu()? else {
            break;
        };
        let outcome = match choice {
            MainMenuChoice::Translate => translate_loop(&state),
            MainMenuChoice::SearchRoots => search_roots(&state),
            MainMenuChoice::AddRoot => add_root(&state, None).map(|_| ()),
            MainMenuChoice::RecentHistory => show_recent_history(&state),
            MainMenuChoice::Exit => break,
        };
        if let Err(e) = outcome {
            println!("\n{}", error(&format!("Error: {}", e)));
        }
    }

    println!("\n{}", success("Bye."));
    state.close()
}

#[derive(Debug, Clone, Copy)]
enum MainMenuChoice {
    Translate,
    SearchRoots,
    AddRoot,
    RecentHistory,
    Exit,
}

impl std::fmt::Display for MainMenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Translate => "🔤 Translate text",
            Self::SearchRoots => "🔍 Search roots",
            Self::AddRoot => "➕ Add a root",
            Self::RecentHistory => "🕘 Recent history",
            Self::Exit => "🚪 Exit",
        };
        write!(f, "{}", label)
    }
}

fn show_main_menu() -> Result<Option<MainMenuChoice>, AppError> {
    let choices = vec![
        MainMenuChoice::Translate,
        MainMenuChoice::SearchRoots,
        MainMenuChoice::AddRoot,
        MainMenuChoice::RecentHistory,
        MainMenuChoice::Exit,
    ];
    utils::optional(Select::new("What would you like to do?", choices).prompt())
}

fn translate_loop(state: &AppState) -> Result<(), AppError> {
    let auto_save = get_settings().auto_save_history;

    while let Some(text) = prompt_text("Text (empty to go back):", None)? {
        let text = text.trim().to_string();
        if text.is_empty() {
            break;
        }

        let mut line = translate_once(state, &text)?;
        if !line.result.complete {
            let first_unknown = line.result.unknown_spans().next().map(str::to_string);
            if prompt_confirm("Add a root for the unknown part now?", false)?.unwrap_or(false)
                && add_root(state, first_unknown.as_deref())?
            {
                line = translate_once(state, &text)?;
            }
        }

        if auto_save {
            record_history(state, std::slice::from_ref(&line));
        }
    }
    Ok(())
}

fn translate_once(state: &AppState, text: &str) -> Result<TranslatedLine, AppError> {
    let result = TranslationService::resolve_text(&state.roots, text)?;

    let mut table = create_table();
    table.set_header(vec!["中文", "English"]);
    for seg in &result.segments {
        let english = if seg.matched {
            seg.english.clone()
        } else {
            warning("?")
        };
        table.add_row(vec![seg.chinese.clone(), english]);
    }
    println!("{}", table);

    if result.complete {
        println!("{} {}", success("✓"), highlight(&result.joined_english));
    } else {
        println!("{} {}", warning("…"), result.joined_english);
    }

    Ok(TranslatedLine {
        index: 0,
        text: text.to_string(),
        result,
    })
}

/// 交互式添加词根，返回是否真正写入
fn add_root(state: &AppState, suggested: Option<&str>) -> Result<bool, AppError> {
    let Some(chinese) = prompt_text("Chinese root:", suggested)? else {
        return Ok(false);
    };
    let Some(english) = prompt_text("English token:", None)? else {
        return Ok(false);
    };

    if state.roots.add(&chinese, &english)? {
        println!(
            "{}",
            success(&format!("✓ {} → {}", chinese.trim(), english.trim()))
        );
        Ok(true)
    } else {
        println!("{}", warning("Both sides are required; nothing saved."));
        Ok(false)
    }
}

fn search_roots(state: &AppState) -> Result<(), AppError> {
    let Some(term) = prompt_text("Search (empty lists all):", None)? else {
        return Ok(());
    };
    let snapshot = state.roots.snapshot()?;
    let rows = filter_roots(snapshot.iter(), Some(&term));
    if rows.is_empty() {
        println!("{}", info("No roots found."));
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["中文", "English"]);
    for (chinese, english) in &rows {
        table.add_row(vec![chinese.to_string(), english.to_string()]);
    }
    println!("{}", table);
    println!("{}", info(&format!("{} root(s)", rows.len())));
    Ok(())
}

fn show_recent_history(state: &AppState) -> Result<(), AppError> {
    let entries = state.history.list(Some(10))?;
    if entries.is_empty() {
        println!("{}", info("No translation history."));
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["中文", "English"]);
    for entry in entries {
        table.add_row(vec![entry.chinese_text, entry.english_text]);
    }
    println!("{}", table);
    Ok(())
}
