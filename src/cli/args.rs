use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::focus::parse_minutes;
use crate::features::shell::PromptFormat;

#[derive(Parser, Debug)]
#[command(name = "hook")]
#[command(about = "Focus timer client for the Hook session tracker")]
#[command(long_about = "hook - Focus timer client for the Hook session tracker

Runs a countdown that stays in sync with your Hook server, reminds you of
the sites you promised to avoid, and links sessions to the books you are
reading in Nook.

QUICK START:
  hook                            Open the interactive timer
  hook start \"Write report\"       Start a 25-minute work session
  hook read b1 -d 30              Read book b1 for 30 minutes
  hook complete --rating 4        Finish and collect points

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  hook <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Hook server URL (overrides server.base_url)
    #[arg(long, env = "HOOK_SERVER", global = true)]
    pub server: Option<String>,

    /// Config file to use instead of ~/.hook/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive timer (default)
    ///
    /// Keys are listed in the footer. The timer resumes any session that
    /// is already active on the server.
    Tui,

    /// Start a focus session
    ///
    /// # Examples
    ///
    ///   hook start "Write report"
    ///   hook start "Stretch" -d 5 --type break
    ///   hook start "Reading: Dune" --book b1
    #[command(alias = "s")]
    Start(StartArgs),

    /// Toggle pause on the active session
    #[command(alias = "p")]
    Pause,

    /// Cancel the active session without scoring it
    Cancel,

    /// Show the active session
    #[command(alias = "st")]
    Status,

    /// Finish the active session and submit feedback
    ///
    /// # Examples
    ///
    ///   hook complete --rating 4
    ///   hook complete --mood 🤩 --rating 5 --pages-read 30
    Complete(CompleteArgs),

    /// Start a reading session for a book
    ///
    /// # Examples
    ///
    ///   hook read b1
    ///   hook read b1 -d 45m
    Read(ReadArgs),

    /// List books available for reading sessions
    Books,

    /// Show or replace the distraction list
    ///
    /// # Examples
    ///
    ///   hook distractions
    ///   hook distractions --set "news.site, social.site"
    Distractions(DistractionArgs),

    /// Print a prompt segment for the active timer
    ///
    /// Prints nothing when no session is active or the server is down.
    ///
    /// # Examples
    ///
    ///   PS1='$(hook prompt --format emoji) $ '
    Prompt(PromptArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   hook completions zsh > ~/.zsh/completions/_hook
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        install: bool,
    },
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// What you are working on
    pub task: String,

    /// Session length (e.g., 25, 25m, 1h30m)
    #[arg(short, long, value_parser = parse_minutes_arg)]
    pub duration: Option<u32>,

    /// Session type
    #[arg(long = "type", short = 't', default_value = "work", value_parser = ["work", "break"])]
    pub kind: String,

    /// Session category (default from config)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Link the session to a book (by id)
    #[arg(long, short = 'b')]
    pub book: Option<String>,
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Mood emoji
    #[arg(long, short = 'm', default_value = "😊")]
    pub mood: String,

    /// Productivity rating from 1 to 5
    #[arg(long, short = 'r', default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: u8,

    /// Pages read during a reading session
    #[arg(long)]
    pub pages_read: Option<u32>,

    /// Page you stopped on
    #[arg(long)]
    pub current_page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Book id (see `hook books`)
    pub book_id: String,

    /// Session length (e.g., 25, 25m, 1h)
    #[arg(short, long, value_parser = parse_minutes_arg)]
    pub duration: Option<u32>,
}

#[derive(Args, Debug)]
pub struct DistractionArgs {
    /// Comma-separated domains replacing the saved list
    #[arg(long)]
    pub set: Option<String>,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Segment format
    #[arg(long, short = 'f', value_enum, default_value = "plain")]
    pub format: PromptFormat,
}

fn parse_minutes_arg(s: &str) -> Result<u32, String> {
    parse_minutes(s).ok_or_else(|| format!("invalid duration '{s}' (try 25, 25m or 1h30m)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_tui() {
        let cli = Cli::try_parse_from(["hook"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output, OutputFormat::Pretty);
    }

    #[test]
    fn test_start_args() {
        let cli = Cli::try_parse_from(["hook", "start", "Write draft", "-d", "1"]).unwrap();
        match cli.command {
            Some(Commands::Start(args)) => {
                assert_eq!(args.task, "Write draft");
                assert_eq!(args.duration, Some(1));
                assert_eq!(args.kind, "work");
                assert!(args.book.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_start_duration_units() {
        let cli = Cli::try_parse_from(["hook", "s", "Deep work", "-d", "1h30m", "--type", "break"]).unwrap();
        match cli.command {
            Some(Commands::Start(args)) => {
                assert_eq!(args.duration, Some(90));
                assert_eq!(args.kind, "break");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_start_rejects_bad_duration_and_type() {
        assert!(Cli::try_parse_from(["hook", "start", "X", "-d", "soon"]).is_err());
        assert!(Cli::try_parse_from(["hook", "start", "X", "-d", "0"]).is_err());
        assert!(Cli::try_parse_from(["hook", "start", "X", "--type", "nap"]).is_err());
    }

    #[test]
    fn test_complete_rating_range() {
        let cli = Cli::try_parse_from(["hook", "complete", "-r", "5", "--pages-read", "12"]).unwrap();
        match cli.command {
            Some(Commands::Complete(args)) => {
                assert_eq!(args.rating, 5);
                assert_eq!(args.mood, "😊");
                assert_eq!(args.pages_read, Some(12));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["hook", "complete", "-r", "6"]).is_err());
        assert!(Cli::try_parse_from(["hook", "complete", "-r", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hook", "status", "-o", "json", "--server", "http://hook.test", "-v",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.server.as_deref(), Some("http://hook.test"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_distractions_set() {
        let cli = Cli::try_parse_from(["hook", "distractions", "--set", "a.com, b.com"]).unwrap();
        match cli.command {
            Some(Commands::Distractions(args)) => assert_eq!(args.set.as_deref(), Some("a.com, b.com")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_prompt_and_completions() {
        let cli = Cli::try_parse_from(["hook", "prompt", "-f", "emoji"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Prompt(PromptArgs { format: PromptFormat::Emoji }))
        ));

        let cli = Cli::try_parse_from(["hook", "completions", "fish"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions { shell: Shell::Fish, install: false })));
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
