use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::summary::{BranchHealth, BuildSummary};

// Styling helpers

fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

fn cyan(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}

fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

fn bright(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright()
}

fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

// Banner

pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📊 circlestats"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CircleCI Build Failure Reporting")
    );
}

// Progress tracking

/// Progress bar over the per-build detail fetches, drawn on stderr so stdout
/// stays clean for the JSON report.
pub fn detail_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan}] {pos}/{len}")
            .unwrap(),
    );
    pb.set_message("Fetching failure details");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    pb
}

// Summary rendering

pub fn print_summary(project: &str, summary: &BuildSummary) {
    println!("{}", render_summary(project, summary));
}

fn render_summary(project: &str, summary: &BuildSummary) -> String {
    let mut output = String::new();

    // Overview section
    output.push_str(&format!(
        "{} {}\n",
        bright("📊"),
        bright("Build Status").underlined()
    ));
    output.push_str(&format!("  {} {}\n", dim("Project:"), cyan(project)));

    let total: usize = summary.branches.values().map(|branch| branch.total).sum();
    output.push_str(&format!(
        "  {} {}\n",
        dim("Builds analyzed:"),
        bright_yellow(total)
    ));

    for (status, count) in &summary.statuses {
        output.push_str(&format!(
            "  {} {}\n",
            dim(format!("{status}:")),
            bright_yellow(count)
        ));
    }
    output.push('\n');

    if summary.branches.is_empty() {
        output.push_str(&format!("{}\n", bright_yellow("No builds found.")));
        return output;
    }

    // Branch table
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Branch").fg(TableColor::Cyan),
            Cell::new("Total").fg(TableColor::Cyan),
            Cell::new("Success").fg(TableColor::Cyan),
            Cell::new("Failed").fg(TableColor::Cyan),
            Cell::new("Fixed").fg(TableColor::Cyan),
            Cell::new("Health").fg(TableColor::Cyan),
        ]);

    for (branch, tally) in &summary.branches {
        let health = tally.health();
        let health_text = format!("{} {}", health.symbol(), health.label());
        let health_cell = match health {
            BranchHealth::Healthy => Cell::new(health_text).fg(TableColor::Green),
            BranchHealth::MostlyHealthy | BranchHealth::Mixed => {
                Cell::new(health_text).fg(TableColor::Yellow)
            }
            BranchHealth::MostlyFailing | BranchHealth::Failing => {
                Cell::new(health_text).fg(TableColor::Red)
            }
        };

        table.add_row(vec![
            Cell::new(branch),
            Cell::new(tally.total),
            Cell::new(tally.status_count("success")),
            Cell::new(tally.status_count("failed")),
            Cell::new(tally.status_count("fixed")),
            health_cell,
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output.push_str(&format!("  {}\n", dim(BranchHealth::legend())));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use crate::types::Build;

    fn create_build(build_num: u64, status: &str, branch: &str) -> Build {
        Build {
            build_num,
            status: status.to_string(),
            retries: None,
            branch: branch.to_string(),
        }
    }

    #[test]
    fn test_render_summary_without_builds() {
        let output = render_summary("org/repo", &summarize(&[]));

        assert!(output.contains("org/repo"));
        assert!(output.contains("Builds analyzed:"));
        assert!(output.contains("No builds found"));
        assert!(!output.contains("Branch"));
    }

    #[test]
    fn test_render_summary_has_one_row_per_branch() {
        let builds = vec![
            create_build(4, "success", "main"),
            create_build(3, "failed", "main"),
            create_build(2, "success", "dev"),
        ];

        let output = render_summary("org/repo", &summarize(&builds));

        assert!(output.contains("Branch"));
        assert!(output.contains("Health"));
        assert_eq!(output.matches("main").count(), 1);
        assert_eq!(output.matches("dev").count(), 1);
    }

    #[test]
    fn test_render_summary_shows_health_symbols() {
        let builds = vec![
            // main: 1 failed of 2 -> mixed
            create_build(4, "success", "main"),
            create_build(3, "failed", "main"),
            // dev: all green -> healthy
            create_build(2, "success", "dev"),
        ];

        let output = render_summary("org/repo", &summarize(&builds));

        assert!(output.contains("🟠 mixed"));
        assert!(output.contains("🟢 healthy"));
    }

    #[test]
    fn test_render_summary_includes_status_tally_and_legend() {
        let builds = vec![
            create_build(4, "success", "main"),
            create_build(3, "success", "main"),
            create_build(2, "failed", "main"),
            create_build(1, "fixed", "main"),
        ];

        let output = render_summary("org/repo", &summarize(&builds));

        assert!(output.contains("success:"));
        assert!(output.contains("failed:"));
        assert!(output.contains("fixed:"));

        // The legend names every bucket even when no branch is in it.
        assert!(output.contains("⛔ failing"));
        assert!(output.contains("🔴 mostly failing"));
    }
}
