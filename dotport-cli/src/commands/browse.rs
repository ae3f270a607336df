//! Interactive dataset browser: paging, inspecting, and editing in one loop.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use dotport_core::{format_number, page_links, PageLink, StateDirectory, TableRecord};
use dotport_sdk::{Breakpoint, PortalClient, RecordTable, RenderHelpers, Snapshot, TableSchema};

use crate::context::Context;
use crate::datasets::{with_dataset, DatasetKind};
use crate::output::width_tier;

use super::records::{load_states, print_record_details, run_form};

/// Arguments for `dotport browse`
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Dataset to browse (prompted for when omitted)
    #[arg(value_enum)]
    pub dataset: Option<DatasetKind>,
}

/// One choice in the action menu shown under each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    NextPage,
    PrevPage,
    GoToPage,
    ViewRecord,
    CreateRecord,
    EditRecord,
    DeleteRecord,
    ChangePageSize,
    Refresh,
    Quit,
}

impl BrowseAction {
    fn label(self) -> &'static str {
        match self {
            BrowseAction::NextPage => "Next page",
            BrowseAction::PrevPage => "Previous page",
            BrowseAction::GoToPage => "Go to page",
            BrowseAction::ViewRecord => "View a record",
            BrowseAction::CreateRecord => "Add a record",
            BrowseAction::EditRecord => "Edit a record",
            BrowseAction::DeleteRecord => "Delete a record",
            BrowseAction::ChangePageSize => "Change page size",
            BrowseAction::Refresh => "Refresh",
            BrowseAction::Quit => "Quit",
        }
    }
}

/// Browse a dataset until the user quits.
pub async fn run(ctx: &Context, args: BrowseArgs) -> Result<()> {
    let dataset = match args.dataset {
        Some(kind) => kind,
        None => {
            let titles: Vec<&str> = DatasetKind::ALL.iter().map(|kind| kind.title()).collect();
            let choice = dialoguer::Select::new()
                .with_prompt("Dataset")
                .items(&titles)
                .default(0)
                .interact()
                .context("Failed to read selection")?;
            DatasetKind::ALL[choice]
        }
    };

    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(dataset, &states, |schema| {
        browse_dataset(ctx, &client, schema, &states).await
    })
}

async fn browse_dataset<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
    states: &StateDirectory,
) -> Result<()> {
    let mut table = client.table(schema);
    table.page_mut().set_page_size(ctx.page_size());
    let helpers = RenderHelpers::new(states.clone());

    loop {
        let spinner = ctx.output.spinner(&table.schema().loading_message);
        let snapshot = table.snapshot().await;

        if let Some(s) = spinner {
            s.finish_and_clear();
        }
        let snapshot = snapshot?;

        // A mutation can shrink the dataset under the current page.
        let pages = table.page().total_pages(snapshot.len()).max(1);
        if table.page().page() > pages {
            table.page_mut().set_page(pages);
        }

        render_page(ctx, &table, &snapshot, &helpers);

        let actions = available_actions(&table, &snapshot);
        let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();
        let choice = dialoguer::Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()
            .context("Failed to read selection")?;

        match actions[choice] {
            BrowseAction::NextPage => table.page_mut().next_page(),
            BrowseAction::PrevPage => table.page_mut().prev_page(),
            BrowseAction::GoToPage => {
                let pages = table.page().total_pages(snapshot.len()).max(1);
                let page: usize = dialoguer::Input::new()
                    .with_prompt(format!("Page (1-{})", pages))
                    .default(table.page().page())
                    .interact_text()
                    .context("Failed to read page number")?;
                table.page_mut().set_page(page.min(pages));
            }
            BrowseAction::ViewRecord => {
                if let Some(record) = pick_record(&table, &snapshot, &helpers, "View which record?")? {
                    print_record_details(table.schema(), record)?;
                }
            }
            BrowseAction::CreateRecord => {
                let mut session = table.open_create();
                println!("\n{}", table.schema().create_label.as_str().bold());
                match run_form(ctx, &table, &mut session).await {
                    Ok(()) => ctx.output.success("Record created"),
                    Err(err) => ctx.output.warning(&format!("{:#}", err)),
                }
            }
            BrowseAction::EditRecord => {
                if let Some(record) = pick_record(&table, &snapshot, &helpers, "Edit which record?")? {
                    let mut session = table.open_edit(record)?;
                    println!(
                        "\n{}",
                        format!("Edit record {} in {}", record.id(), table.schema().title).bold()
                    );
                    match run_form(ctx, &table, &mut session).await {
                        Ok(()) => ctx.output.success("Record updated"),
                        Err(err) => ctx.output.warning(&format!("{:#}", err)),
                    }
                }
            }
            BrowseAction::DeleteRecord => {
                if let Some(record) = pick_record(&table, &snapshot, &helpers, "Delete which record?")? {
                    delete_picked(ctx, &table, record).await?;
                }
            }
            BrowseAction::ChangePageSize => {
                let size: usize = dialoguer::Input::new()
                    .with_prompt("Rows per page")
                    .default(table.page().page_size())
                    .interact_text()
                    .context("Failed to read page size")?;
                table.page_mut().set_page_size(size);
            }
            BrowseAction::Refresh => {
                table.store().invalidate(&table.schema().dataset_key);
            }
            BrowseAction::Quit => return Ok(()),
        }
    }
}

fn render_page<T: TableRecord>(
    ctx: &Context,
    table: &RecordTable<T>,
    snapshot: &Snapshot<T>,
    helpers: &RenderHelpers,
) {
    println!("\n{}", table.schema().title.as_str().bold().underline());

    if snapshot.is_empty() {
        println!("{}", table.schema().empty_message.as_str().dimmed());
        return;
    }

    let rows = table.page_rows(snapshot);
    let rendered = ctx
        .output
        .records_table(&table.schema().columns, rows, helpers, width_tier());
    println!("{rendered}");

    let total = snapshot.total.unwrap_or(snapshot.len() as u64) as usize;
    let (start, end) = table.page().display_range(total);
    println!(
        "Showing {} to {} of {} records    {}",
        start,
        end,
        format_number(total as f64),
        format_page_strip(table.page().page(), table.page().total_pages(snapshot.len()))
    );
}

fn available_actions<T: TableRecord>(
    table: &RecordTable<T>,
    snapshot: &Snapshot<T>,
) -> Vec<BrowseAction> {
    let pages = table.page().total_pages(snapshot.len());
    let page = table.page().page();

    let mut actions = Vec::new();
    if page < pages {
        actions.push(BrowseAction::NextPage);
    }
    if page > 1 {
        actions.push(BrowseAction::PrevPage);
    }
    if pages > 1 {
        actions.push(BrowseAction::GoToPage);
    }
    if !snapshot.is_empty() {
        actions.push(BrowseAction::ViewRecord);
    }
    actions.push(BrowseAction::CreateRecord);
    if !snapshot.is_empty() {
        actions.push(BrowseAction::EditRecord);
        actions.push(BrowseAction::DeleteRecord);
    }
    actions.push(BrowseAction::ChangePageSize);
    actions.push(BrowseAction::Refresh);
    actions.push(BrowseAction::Quit);
    actions
}

/// Choose one record from the current page, or `None` to back out.
fn pick_record<'a, T: TableRecord>(
    table: &RecordTable<T>,
    snapshot: &'a Snapshot<T>,
    helpers: &RenderHelpers,
    prompt: &str,
) -> Result<Option<&'a T>> {
    let rows = table.page_rows(snapshot);
    if rows.is_empty() {
        return Ok(None);
    }

    let mut items: Vec<String> = rows
        .iter()
        .map(|row| summary_line(table, row, helpers))
        .collect();
    items.push("(back)".to_string());

    let choice = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    if choice == rows.len() {
        return Ok(None);
    }
    Ok(Some(&rows[choice]))
}

/// One-line description of a row: id plus the columns every width shows.
fn summary_line<T: TableRecord>(
    table: &RecordTable<T>,
    row: &T,
    helpers: &RenderHelpers,
) -> String {
    let cells: Vec<String> = table
        .schema()
        .columns
        .iter()
        .filter(|column| column.breakpoint == Breakpoint::Always)
        .take(3)
        .map(|column| (column.render)(row, helpers))
        .collect();
    format!("#{} {}", row.id(), cells.join(" | "))
}

async fn delete_picked<T: TableRecord>(
    ctx: &Context,
    table: &RecordTable<T>,
    record: &T,
) -> Result<()> {
    let confirm = dialoguer::Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete record {}? This cannot be undone.",
            record.id()
        ))
        .default(false)
        .interact()
        .context("Failed to get confirmation")?;

    if !confirm {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let mut session = table.open_delete(record);
    let spinner = ctx.output.spinner("Deleting record...");
    let outcome = table.submit(&mut session).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match outcome {
        Ok(_) => ctx.output.success("Record deleted"),
        Err(err) => ctx.output.error(&format!("Delete failed: {}", err)),
    }
    Ok(())
}

/// `1 ... 4 [5] 6 ... 12` strip in the portal's seven-slot shape.
fn format_page_strip(current: usize, total: usize) -> String {
    let mut parts = Vec::new();
    for link in page_links(current, total) {
        match link {
            PageLink::Page(page) if page == current => parts.push(format!("[{}]", page)),
            PageLink::Page(page) => parts.push(page.to_string()),
            PageLink::Gap => parts.push("...".to_string()),
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_page_strip_marks_current() {
        assert_eq!(format_page_strip(2, 3), "1 [2] 3");
        assert_eq!(format_page_strip(5, 10), "1 ... 4 [5] 6 ... 10");
        assert_eq!(format_page_strip(1, 1), "[1]");
    }
}
