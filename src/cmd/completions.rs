//! Completions command implementation
//!
//! Handles the `pytest-digest completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate shell completion scripts for `cmd`
///
/// Users can redirect the output to their shell's completion directory.
///
/// ```bash
/// pytest-digest completions bash > /etc/bash_completion.d/pytest-digest
/// pytest-digest completions zsh > ~/.zfunc/_pytest-digest
/// pytest-digest completions fish > ~/.config/fish/completions/pytest-digest.fish
/// ```
pub fn cmd_completions(shell: Shell, cmd: &mut Command) {
    write_completions(shell, cmd, &mut std::io::stdout());
}

fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}
