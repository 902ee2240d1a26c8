//! Plain text rendering of command results.

use crate::error::CommandError;
use crate::generator::AddRedirectReport;
use console::{measure_text_width, pad_str, Alignment, Style};
use redirgen_core::{Outcome, Redirect};

pub const ADD_TITLE: &str = "Add redirect to the redirects table";
pub const LIST_TITLE: &str = "Redirects";

#[derive(Debug, Clone, Copy)]
enum Level {
    Ok,
    Note,
    Warning,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Note => "NOTE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Ok => Style::new().green().bold(),
            Level::Note => Style::new().cyan(),
            Level::Warning => Style::new().yellow().bold(),
            Level::Error => Style::new().red().bold(),
        }
    }
}

fn block(level: Level, message: &str) -> String {
    let text = format!("[{}] {}", level.label(), message);
    format!("{}\n", level.style().apply_to(text))
}

/// A title followed by an underline of the same width.
pub fn title(text: &str) -> String {
    let underline = "=".repeat(measure_text_width(text));
    format!(
        "{}\n{}\n",
        Style::new().bold().apply_to(text),
        Style::new().bold().apply_to(underline)
    )
}

pub fn dry_run_warning() -> String {
    block(Level::Warning, "Dry run enabled!")
}

pub fn error_block(message: &str) -> String {
    block(Level::Error, message)
}

pub fn render_error(error: &CommandError) -> String {
    error_block(&format!(
        "Following error occurred: {} ({})",
        error,
        error.code()
    ))
}

/// The outcome headline followed by a summary table of the redirect.
pub fn render_add_report(report: &AddRedirectReport) -> String {
    let source = &report.request.source;
    let link = &report.resolved.canonical_link;

    let (level, message) = match &report.outcome {
        Outcome::WouldCreate => (
            Level::Ok,
            "The following redirect would have been added:".to_string(),
        ),
        Outcome::WouldOverwrite { existing } => (
            Level::Warning,
            format!(
                "The following redirect would overwrite ID {}, currently targeting \"{}\":",
                existing.id, existing.target
            ),
        ),
        Outcome::Created(row) => (
            Level::Ok,
            format!("Redirect has been added! (ID {})", row.id),
        ),
        Outcome::Overwritten { previous, current } => (
            Level::Ok,
            format!(
                "Redirect has been overwritten! Redirect for \"{source}\" overwrites ID {}. \
                 Existing target was \"{}\", new target is now \"{}\".",
                previous.id, previous.target, current.target
            ),
        ),
        Outcome::AlreadyPresent { existing } => (
            Level::Note,
            format!(
                "Redirect for \"{source}\" exists already with ID {}, \
                 but has the same target as the new redirect.",
                existing.id
            ),
        ),
        Outcome::Conflict { existing } => (
            Level::Error,
            format!(
                "Redirect for \"{source}\" exists already with ID {}! \
                 Existing target is \"{}\", new target would be \"{link}\".",
                existing.id, existing.target
            ),
        ),
    };

    let language = &report.resolved.language;
    let table = Table::<2>::new(None).rows([
        [
            "Status Code".to_string(),
            report.request.configuration.target_status_code.to_string(),
        ],
        ["Source".to_string(), source.clone()],
        ["Target".to_string(), report.request.target.clone()],
        [
            "Target Page".to_string(),
            report.resolved.page_id.to_string(),
        ],
        [
            "Target Language".to_string(),
            format!("{} (ID {})", language.code, language.id),
        ],
        ["Target Link".to_string(), link.clone()],
    ]);

    format!("{}\n{}", block(level, &message), table.render())
}

/// All redirects as a table, or a note when there are none.
pub fn render_redirects(redirects: &[Redirect]) -> String {
    if redirects.is_empty() {
        return block(Level::Note, "No redirects found.");
    }

    Table::new(Some(["ID", "Source", "Target", "Status"]))
        .rows(redirects.iter().map(|row| {
            [
                row.id.to_string(),
                row.source(),
                row.target.clone(),
                row.status_code.to_string(),
            ]
        }))
        .render()
}

/// A bordered table with a fixed number of columns.
struct Table<const N: usize> {
    header: Option<[String; N]>,
    rows: Vec<[String; N]>,
}

impl<const N: usize> Table<N> {
    fn new(header: Option<[&str; N]>) -> Self {
        Self {
            header: header.map(|cells| cells.map(str::to_string)),
            rows: Vec::new(),
        }
    }

    fn rows(mut self, rows: impl IntoIterator<Item = [String; N]>) -> Self {
        self.rows.extend(rows);
        self
    }

    fn render(&self) -> String {
        let mut widths = [0usize; N];
        for row in self.header.iter().chain(&self.rows) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure_text_width(cell));
            }
        }

        let separator = widths
            .iter()
            .fold(String::from("+"), |mut line, width| {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
                line
            });

        let mut lines = vec![separator.clone()];
        if let Some(header) = &self.header {
            lines.push(Self::line(header, &widths));
            lines.push(separator.clone());
        }
        lines.extend(self.rows.iter().map(|row| Self::line(row, &widths)));
        lines.push(separator);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn line(cells: &[String; N], widths: &[usize; N]) -> String {
        cells
            .iter()
            .zip(widths)
            .fold(String::from("|"), |mut line, (cell, width)| {
                line.push(' ');
                line.push_str(&pad_str(cell, *width, Alignment::Left, None));
                line.push_str(" |");
                line
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::AddRedirect;
    use console::strip_ansi_codes;
    use jiff::Timestamp;
    use redirgen_core::{
        Configuration, Language, RedirectFlags, ResolveError, ResolvedLink, StatusCode,
        CREATION_TYPE,
    };

    fn row(id: u64, target: &str) -> Redirect {
        Redirect {
            id,
            source_host: "*".to_string(),
            source_path: "/old".to_string(),
            target: target.to_string(),
            status_code: StatusCode::MovedPermanently,
            flags: RedirectFlags::default(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            creation_type: CREATION_TYPE,
        }
    }

    fn report(outcome: Outcome) -> AddRedirectReport {
        AddRedirectReport {
            request: AddRedirect {
                source: "/old".to_string(),
                target: "42".to_string(),
                configuration: Configuration::build(301, false).unwrap(),
                dry_run: false,
            },
            resolved: ResolvedLink {
                canonical_link: "https://example.com/new".to_string(),
                page_id: 42,
                language: Language {
                    id: 0,
                    code: "en".to_string(),
                    title: "English".to_string(),
                },
            },
            outcome,
        }
    }

    fn plain(text: String) -> String {
        strip_ansi_codes(&text).into_owned()
    }

    #[test]
    fn created_report_lists_summary() {
        let out = plain(render_add_report(&report(Outcome::Created(row(
            1,
            "https://example.com/new",
        )))));

        assert!(out.starts_with("[OK] Redirect has been added! (ID 1)"));
        assert!(out.contains("| Status Code     | 301                     |"));
        assert!(out.contains("| Source          | /old                    |"));
        assert!(out.contains("| Target          | 42                      |"));
        assert!(out.contains("| Target Page     | 42                      |"));
        assert!(out.contains("| Target Language | en (ID 0)               |"));
        assert!(out.contains("| Target Link     | https://example.com/new |"));
    }

    #[test]
    fn conflict_is_an_error_headline() {
        let out = plain(render_add_report(&report(Outcome::Conflict {
            existing: row(7, "https://example.com/elsewhere"),
        })));

        assert!(out.starts_with("[ERROR] Redirect for \"/old\" exists already with ID 7!"));
        assert!(out.contains("Existing target is \"https://example.com/elsewhere\""));
        assert!(out.contains("new target would be \"https://example.com/new\""));
    }

    #[test]
    fn overwrite_is_a_success_headline() {
        let out = plain(render_add_report(&report(Outcome::Overwritten {
            previous: row(7, "https://example.com/elsewhere"),
            current: row(7, "https://example.com/new"),
        })));

        assert!(out.starts_with("[OK] Redirect has been overwritten!"));
        assert!(out.contains("overwrites ID 7"));
        assert!(out.contains("Existing target was \"https://example.com/elsewhere\""));
    }

    #[test]
    fn already_present_is_a_note() {
        let out = plain(render_add_report(&report(Outcome::AlreadyPresent {
            existing: row(3, "https://example.com/new"),
        })));

        assert!(out.starts_with("[NOTE] Redirect for \"/old\" exists already with ID 3"));
    }

    #[test]
    fn dry_run_outcomes_are_labelled() {
        let out = plain(render_add_report(&report(Outcome::WouldCreate)));
        assert!(out.starts_with("[OK] The following redirect would have been added:"));

        let out = plain(render_add_report(&report(Outcome::WouldOverwrite {
            existing: row(5, "https://example.com/elsewhere"),
        })));
        assert!(out.starts_with("[WARNING] The following redirect would overwrite ID 5"));

        assert_eq!(plain(dry_run_warning()), "[WARNING] Dry run enabled!\n");
    }

    #[test]
    fn error_with_code() {
        let err: CommandError = ResolveError::UnresolvableTarget("99".to_string()).into();
        assert_eq!(
            plain(render_error(&err)),
            "[ERROR] Following error occurred: target \"99\" cannot be resolved to a page (unresolvable-target)\n"
        );
    }

    #[test]
    fn redirect_listing() {
        let mut host_row = row(2, "https://example.com/bb");
        host_row.source_host = "example.com".to_string();
        let out = plain(render_redirects(&[row(1, "https://example.com/a"), host_row]));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "+----+-----------------+------------------------+--------+",
                "| ID | Source          | Target                 | Status |",
                "+----+-----------------+------------------------+--------+",
                "| 1  | /old            | https://example.com/a  | 301    |",
                "| 2  | example.com/old | https://example.com/bb | 301    |",
                "+----+-----------------+------------------------+--------+",
            ]
        );
        assert!(out.ends_with("+\n"));
    }

    #[test]
    fn empty_listing() {
        assert_eq!(plain(render_redirects(&[])), "[NOTE] No redirects found.\n");
    }

    #[test]
    fn title_is_underlined() {
        assert_eq!(plain(title("Redirects")), "Redirects\n=========\n");
    }
}
