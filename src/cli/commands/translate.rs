use clap::Args;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use crate::cli::ui::{create_table, error, highlight, info, success, to_json, warning};
use crate::error::AppError;
use crate::services::translation::split_lines;
use crate::services::{TranslatedLine, TranslationService};
use crate::settings::get_settings;
use crate::store::AppState;

#[derive(Args)]
pub struct TranslateArgs {
    /// Text to translate; each argument and each line is translated separately
    pub text: Vec<String>,

    /// Read input lines from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Do not record complete translations in history
    #[arg(long)]
    pub no_history: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: TranslateArgs) -> Result<(), AppError> {
    let input = read_input(&args)?;
    let lines = split_lines(&input);
    if lines.is_empty() {
        println!("{}", info("Nothing to translate."));
        return Ok(());
    }

    let settings = get_settings();
    let state = AppState::open()?;
    let save_history = settings.auto_save_history && !args.no_history;
    run_batch(
        &state,
        lines,
        settings.batch_concurrency,
        save_history,
        |results| print_results(results, args.json),
    )?;
    Ok(())
}

/// Translate `lines`, hand the results to `emit`, then queue history.
///
/// History is written only after `emit` returns, and a failed write is
/// logged without touching the returned results.
pub fn run_batch<F>(
    state: &AppState,
    lines: Vec<String>,
    concurrency: usize,
    save_history: bool,
    emit: F,
) -> Result<Vec<TranslatedLine>, AppError>
where
    F: FnOnce(&[TranslatedLine]) -> Result<(), AppError>,
{
    let results = TranslationService::translate_lines(&state.roots, lines, concurrency)?;
    emit(&results)?;
    if save_history {
        record_history(state, &results);
    }
    Ok(results)
}

fn print_results(results: &[TranslatedLine], json: bool) -> Result<(), AppError> {
    if json {
        let json = to_json(&results).map_err(|e| AppError::JsonSerialize { source: e })?;
        println!("{}", json);
        return Ok(());
    }

    if let [line] = results {
        println!("{}", line.result.joined_english);
        if !line.result.complete {
            print_unknown_hint(line);
        }
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["#", "中文", "English", ""]);
    for line in results {
        let status = if line.result.complete {
            success("✓")
        } else {
            warning("?")
        };
        table.add_row(vec![
            (line.index + 1).to_string(),
            line.text.clone(),
            line.result.joined_english.clone(),
            status,
        ]);
    }
    println!("{}", table);

    let incomplete = results.iter().filter(|l| !l.result.complete).count();
    if incomplete > 0 {
        println!(
            "{}",
            warning(&format!(
                "{incomplete} line(s) contain characters without a root; add them with 'rootify roots add'."
            ))
        );
    }
    Ok(())
}

fn read_input(args: &TranslateArgs) -> Result<String, AppError> {
    if let Some(path) = &args.file {
        return fs::read_to_string(path).map_err(|e| AppError::io(path, e));
    }
    if !args.text.is_empty() {
        return Ok(args.text.join("\n"));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(AppError::InvalidInput(
            "Provide text, --file, or pipe lines on stdin".to_string(),
        ));
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .map_err(|e| AppError::Message(format!("Failed to read stdin: {e}")))?;
    Ok(buf)
}

/// 完整的翻译写入历史；写入失败只记录日志
pub(crate) fn record_history(state: &AppState, results: &[TranslatedLine]) {
    let recorder = match state.history_recorder() {
        Ok(recorder) => recorder,
        Err(e) => {
            log::warn!("History recorder unavailable: {e}");
            return;
        }
    };
    let saved = results
        .iter()
        .filter(|line| recorder.record_if_complete(&line.text, &line.result))
        .count();
    recorder.shutdown();
    log::debug!("queued {saved} history records");
}

fn print_unknown_hint(line: &TranslatedLine) {
    let unknown: Vec<&str> = line.result.unknown_spans().collect();
    eprintln!(
        "{}",
        warning(&format!("No root for: {}", unknown.join(" ")))
    );
}

pub fn segment(text: &str) -> Result<(), AppError> {
    let state = AppState::open()?;
    let segments = TranslationService::segment_text(&state.roots, text)?;

    if segments.is_empty() {
        println!("{}", info("Nothing to segment."));
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["中文", "English", ""]);
    for seg in &segments {
        let marker = if seg.matched {
            String::new()
        } else {
            error("unknown")
        };
        table.add_row(vec![seg.chinese.clone(), seg.english.clone(), marker]);
    }
    println!("{}", table);
    Ok(())
}

pub fn check(text: &str) -> Result<(), AppError> {
    let state = AppState::open()?;

    if TranslationService::is_translation_complete(&state.roots, text)? {
        let english = TranslationService::translate_text(&state.roots, text)?;
        println!("{}", success(&format!("✓ Complete: {}", english)));
        return Ok(());
    }

    let result = TranslationService::resolve_text(&state.roots, text)?;
    let unknown: Vec<&str> = result.unknown_spans().collect();
    println!(
        "{}",
        warning(&format!("Incomplete: {}", result.joined_english))
    );
    println!("{} {}", highlight("Missing roots for:"), unknown.join(" "));
    Ok(())
}
