// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the acmp CLI.
//!
//! ```bash
//! # Bash
//! acmp completions bash > ~/.local/share/bash-completion/completions/acmp
//!
//! # Zsh
//! acmp completions zsh > ~/.zfunc/_acmp
//!
//! # Fish
//! acmp completions fish > ~/.config/fish/completions/acmp.fish
//!
//! # PowerShell
//! acmp completions powershell >> $PROFILE.CurrentUserAllHosts
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completions and write to stdout.
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "acmp", &mut io::stdout());
}

/// Arguments for the completions command.
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
