//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish and PowerShell.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::HookError;

/// Name the completion scripts are registered under.
pub const BIN_NAME: &str = "hook";

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns `HookError::Validation` if the generated script is not UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, HookError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).map_err(|e| HookError::Validation(format!("UTF-8 error: {e}")))
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(hook completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
hook completions zsh > ~/.zsh/completions/_hook
# Then add to ~/.zshrc (before compinit):
fpath=(~/.zsh/completions $fpath)
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
hook completions fish > ~/.config/fish/completions/hook.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
hook completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish lib directory:
hook completions elvish > ~/.elvish/lib/hook.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_bash_completions() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("hook"));
        assert!(script.contains("complete"));
        assert!(script.contains("distractions"));
    }

    #[test]
    fn test_generate_fish_completions() {
        let script = generate_completions(Shell::Fish).unwrap();
        assert!(script.contains("complete -c hook"));
    }

    #[test]
    fn test_completion_instructions_name_the_binary() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(completion_install_instructions(shell).contains("hook completions"));
        }
    }
}
