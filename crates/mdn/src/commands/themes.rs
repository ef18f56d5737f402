//! `mdn themes` command implementation.

use mdn_markdown::{DEFAULT_THEME, Highlighter};

use super::write_output;
use crate::error::CliError;

/// Execute the themes command.
pub(crate) fn execute() -> Result<(), CliError> {
    write_output(None, &theme_list())
}

/// One theme per line, the default one marked.
fn theme_list() -> String {
    Highlighter::theme_names()
        .into_iter()
        .map(|name| {
            if name == DEFAULT_THEME {
                format!("{name} (default)\n")
            } else {
                format!("{name}\n")
            }
        })
        .collect()
}
