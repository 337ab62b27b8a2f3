//! Installation summary box
//!
//! Rendering is pure: callers get the lines back and decide where to print
//! them. Rows wider than the box are truncated with `...`; this only
//! affects what is shown, never the commands that run.

use crate::plan::{InstallationPlan, PlannedCommand};
use console::{pad_str, Alignment};

/// Inner width of the summary box, excluding the border characters
pub const BOX_WIDTH: usize = 73;

const ELLIPSIS: &str = "...";

/// What to include in the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Show the commands that would run
    pub dry_run: bool,
    /// Hide post-install commands (`--skip-post-install`)
    pub skip_post_install: bool,
}

fn border(left: char, right: char) -> String {
    format!("{}{}{}", left, "─".repeat(BOX_WIDTH), right)
}

fn row(content: &str) -> String {
    format!(
        "│{}│",
        pad_str(content, BOX_WIDTH, Alignment::Left, Some(ELLIPSIS))
    )
}

fn blank() -> String {
    row("")
}

/// Render the summary box for a plan
pub fn render_summary(
    plan: &InstallationPlan,
    commands: &[PlannedCommand],
    options: SummaryOptions,
) -> Vec<String> {
    let title = if options.dry_run {
        "Installation Summary (DRY RUN)"
    } else {
        "Installation Summary"
    };

    let mut lines = vec![
        border('┌', '┐'),
        row(&format!(" {}", title)),
        border('├', '┤'),
    ];

    lines.push(row(&format!(" Composer packages ({}):", plan.composer_count())));
    if plan.composer_count() == 0 {
        lines.push(row("   (none selected)"));
    } else {
        for name in &plan.runtime {
            lines.push(row(&format!("  • {}", name)));
        }
        for name in &plan.dev {
            lines.push(row(&format!("  • {} (dev)", name)));
        }
    }

    lines.push(blank());
    lines.push(row(&format!(" NPM packages ({}):", plan.npm.len())));
    if plan.npm.is_empty() {
        lines.push(row("   (none selected)"));
    } else {
        for name in &plan.npm {
            lines.push(row(&format!("  • {}", name)));
        }
    }

    if !plan.post_install.is_empty() && !options.skip_post_install {
        lines.push(blank());
        lines.push(row(" Post-install commands:"));
        for post in &plan.post_install {
            lines.push(row(&format!("  • {} ({})", post.command, post.package)));
        }
    }

    if options.dry_run {
        lines.push(blank());
        lines.push(row(" Commands that would run:"));
        for (i, planned) in commands.iter().enumerate() {
            lines.push(row(&format!("   {}. {}", i + 1, planned.command)));
        }
    }

    lines.push(border('└', '┘'));
    lines
}
