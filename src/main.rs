use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;

use hook_timer::cli::args::{Cli, Commands};
use hook_timer::cli::commands::{self, Context};
use hook_timer::config::{Config, Paths};
use hook_timer::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load()?,
    }
    .with_server(cli.server.clone());

    // The TUI owns the terminal, so it logs to a file.
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if interactive {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        logging::init(LogTarget::File(&paths.log_file), cli.verbose)?;
    } else {
        logging::init(LogTarget::Stderr, cli.verbose)?;
    }

    let ctx = Context::new(config, cli.output)?;

    let output = match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            hook_timer::tui::run(&ctx)?;
            String::new()
        }
        Commands::Start(args) => commands::start(&ctx, args)?,
        Commands::Pause => commands::pause(&ctx)?,
        Commands::Cancel => commands::cancel(&ctx)?,
        Commands::Status => commands::status(&ctx)?,
        Commands::Complete(args) => commands::complete(&ctx, args)?,
        Commands::Read(args) => commands::read(&ctx, args)?,
        Commands::Books => commands::books(&ctx)?,
        Commands::Distractions(args) => commands::distractions(&ctx, &args)?,
        Commands::Prompt(args) => commands::prompt(&ctx, &args)?,
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
    };

    let output = output.trim_end();
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
