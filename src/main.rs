use clap::Parser;
use rootify_lib::cli::{Cli, Commands};
use rootify_lib::AppError;
use std::process;

fn main() {
    let cli = Cli::parse();

    // 默认只显示错误日志，避免干扰命令输出
    let log_level = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        // Default to interactive mode if no command is provided
        None | Some(Commands::Interactive) => rootify_lib::cli::interactive::run(),
        Some(Commands::Roots(cmd)) => rootify_lib::cli::commands::roots::execute(cmd),
        Some(Commands::Segment { text }) => rootify_lib::cli::commands::translate::segment(&text),
        Some(Commands::Translate(args)) => rootify_lib::cli::commands::translate::execute(args),
        Some(Commands::Check { text }) => rootify_lib::cli::commands::translate::check(&text),
        Some(Commands::History(cmd)) => rootify_lib::cli::commands::history::execute(cmd),
        Some(Commands::Config(cmd)) => rootify_lib::cli::commands::config::execute(cmd),
        Some(Commands::Completions { shell }) => {
            rootify_lib::cli::generate_completions(shell);
            Ok(())
        }
    }
}
