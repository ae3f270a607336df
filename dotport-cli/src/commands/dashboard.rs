//! Dashboard command: record counts per dataset category.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use dotport_core::{format_number, CategorySummary};
use serde::Serialize;

use crate::context::Context;
use crate::output::{OutputFormat, TableDisplay};

/// Show the per-category record counts the portal landing page reports.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Loading dashboard...");
    let snapshot = client.category_summaries().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let categories: Vec<CategoryDisplay> =
        snapshot.records.iter().cloned().map(Into::into).collect();
    ctx.output
        .write_list(&categories, &["Category", "Description", "Records"])?;

    if ctx.output_format == OutputFormat::Table && !categories.is_empty() {
        let total: i64 = categories.iter().map(|category| category.records).sum();
        ctx.output.info(&format!(
            "{} records across all datasets",
            format_number(total as f64)
        ));
    }

    Ok(())
}

/// Displayable category rollup for output
#[derive(Debug, Serialize)]
struct CategoryDisplay {
    category: String,
    description: Option<String>,
    records: i64,
}

impl From<CategorySummary> for CategoryDisplay {
    fn from(summary: CategorySummary) -> Self {
        Self {
            category: summary.category_name,
            description: summary.description,
            records: summary.record_count,
        }
    }
}

impl TableDisplay for CategoryDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.category),
            Cell::new(self.description.as_deref().unwrap_or("-")),
            Cell::new(format_number(self.records as f64)).set_alignment(CellAlignment::Right),
        ]
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.category, self.records);
    }
}
