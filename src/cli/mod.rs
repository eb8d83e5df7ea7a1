use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod commands;
pub mod interactive;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "rootify",
    version,
    about = "Translate Chinese field names into English using a root dictionary",
    long_about = "Maintain a dictionary of Chinese roots and their English tokens, then translate field names such as 交易日期 into transaction_date.\n\nRun without arguments to enter interactive mode."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage roots (list, add, delete, clear, import, export)
    #[command(subcommand)]
    Roots(commands::roots::RootsCommand),

    /// Show how text splits into known roots and unknown characters
    Segment {
        /// Text to segment
        text: String,
    },

    /// Translate text (one field name per line)
    Translate(commands::translate::TranslateArgs),

    /// Check whether every character of the text is covered by a root
    Check {
        /// Text to check
        text: String,
    },

    /// Manage translation history (list, clear)
    #[command(subcommand)]
    History(commands::history::HistoryCommand),

    /// Manage settings (show, path, set)
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Enter interactive mode
    #[command(alias = "ui")]
    Interactive,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
