//! Status lines on stderr. Command results go to stdout.

use std::path::Path;

use console::{Style, Term};

use crate::error::CliError;

/// Reports what a command did, or why it failed.
pub(crate) struct Output {
    term: Term,
    done: Style,
    notice: Style,
    failure: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            notice: Style::new().yellow(),
            failure: Style::new().red().bold(),
        }
    }

    /// HTML written to a file by `render`.
    pub(crate) fn rendered(&self, path: &Path, email: bool, bytes: usize) {
        self.line(&self.done, &rendered_message(path, email, bytes));
    }

    /// Document without a frontmatter block; an empty one is printed instead.
    pub(crate) fn no_frontmatter(&self, input: &Path) {
        let msg = format!("{}: no frontmatter, printing empty metadata", input_name(input));
        self.line(&self.notice, &msg);
    }

    /// Command failure, printed before exiting.
    pub(crate) fn failed(&self, err: &CliError) {
        self.line(&self.failure, &format!("Error: {err}"));
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}

fn rendered_message(path: &Path, email: bool, bytes: usize) -> String {
    let mode = if email { "email" } else { "page" };
    format!("Wrote {mode} HTML to {} ({bytes} bytes)", path.display())
}

fn input_name(input: &Path) -> String {
    if input == Path::new("-") {
        "stdin".to_owned()
    } else {
        input.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_message() {
        assert_eq!(
            rendered_message(Path::new("out/post.html"), true, 120),
            "Wrote email HTML to out/post.html (120 bytes)"
        );
    }

    #[test]
    fn test_input_name() {
        assert_eq!(input_name(Path::new("-")), "stdin");
        assert_eq!(input_name(Path::new("post.md")), "post.md");
    }
}
