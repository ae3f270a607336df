//! Terminal output: status lines, tables, and machine formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, Color, Table,
};
use dotport_core::TableRecord;
use dotport_sdk::{Align, Breakpoint, ColumnSpec, RenderHelpers};
use serde::Serialize;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table (default)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML documents
    Yaml,
    /// One JSON object per line
    Compact,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Writes command results in the selected format. Status lines and
/// spinners appear only in table mode so piped output stays parseable.
pub struct OutputWriter {
    format: OutputFormat,
    no_color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, no_color }
    }

    /// Render a list of items: a table in table mode, serialized as-is in
    /// the machine formats.
    pub fn write_list<T: Serialize + TableDisplay>(
        &self,
        items: &[T],
        headers: &[&str],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{}", "No items found.".dimmed());
                    return Ok(());
                }

                let mut table = self.new_table();
                table.set_header(self.header_cells(headers));
                for item in items {
                    table.add_row(item.to_row());
                }
                println!("{table}");
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items)?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(items)?);
            }
            OutputFormat::Compact => {
                for item in items {
                    item.display_compact();
                }
            }
        }
        Ok(())
    }

    /// Build a table of dataset rows from the columns visible at `tier`.
    /// Cell text comes from each column's render function.
    pub fn records_table<T: TableRecord>(
        &self,
        columns: &[ColumnSpec<T>],
        rows: &[T],
        helpers: &RenderHelpers,
        tier: Breakpoint,
    ) -> Table {
        let visible: Vec<&ColumnSpec<T>> = columns
            .iter()
            .filter(|column| column.breakpoint <= tier)
            .collect();

        let mut table = self.new_table();
        let headers: Vec<&str> = visible.iter().map(|column| column.header.as_str()).collect();
        table.set_header(self.header_cells(&headers));

        for row in rows {
            let cells: Vec<Cell> = visible
                .iter()
                .map(|column| {
                    Cell::new((column.render)(row, helpers))
                        .set_alignment(cell_alignment(column.align))
                })
                .collect();
            table.add_row(cells);
        }

        table
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        table
    }

    // comfy-table colors bypass the `colored` override, so --no-color has
    // to be applied here by hand.
    fn header_cells(&self, headers: &[&str]) -> Vec<Cell> {
        headers
            .iter()
            .map(|h| {
                if self.no_color {
                    Cell::new(h)
                } else {
                    Cell::new(h).fg(Color::Cyan)
                }
            })
            .collect()
    }

    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        } else {
            println!("{}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "⚠".yellow(), message);
        } else {
            println!("Warning: {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        } else {
            println!("{}", message);
        }
    }

    /// Spinner shown while a request is in flight. `None` outside table
    /// mode; the message prints once instead.
    pub fn spinner(&self, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format == OutputFormat::Table {
            let pb = indicatif::ProgressBar::new_spinner();
            pb.set_style(
                indicatif::ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            println!("{}", message);
            None
        }
    }
}

/// Row rendering for [`OutputWriter::write_list`].
pub trait TableDisplay {
    fn to_row(&self) -> Vec<Cell>;

    /// One line per item for the compact format.
    fn display_compact(&self);
}

/// Widest column tier the current terminal can show. Uses the same cutoffs
/// at every call so a table and its pagination footer agree.
pub fn width_tier() -> Breakpoint {
    let (_, width) = console::Term::stdout().size();
    match width {
        0..=89 => Breakpoint::Always,
        90..=119 => Breakpoint::Medium,
        120..=159 => Breakpoint::Large,
        _ => Breakpoint::ExtraLarge,
    }
}

fn cell_alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

/// Labelled value line for record and config detail views.
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}
