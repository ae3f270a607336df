//! Dataset record commands: list, view, create, edit, and delete.
//!
//! Every command is generic over the record type and monomorphized through
//! [`with_dataset!`]; the schema drives which columns print, which fields
//! are prompted for, and how input is validated before anything is sent.

use anyhow::{bail, Context as _, Result};
use clap::Args;
use colored::Colorize;
use dotport_core::{
    format_date_value, format_number, FieldDef, FieldType, FieldValue, ModalSession,
    StateDirectory, TableRecord,
};
use dotport_sdk::{PortalClient, RecordTable, RenderHelpers, Snapshot, SubmitOutcome, TableSchema};

use crate::context::Context;
use crate::datasets::{with_dataset, DatasetKind};
use crate::output::{print_field, print_section, width_tier, OutputFormat};

/// Arguments for `dotport list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Dataset to list
    #[arg(value_enum)]
    pub dataset: DatasetKind,

    /// Page to show
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Arguments for `dotport view`
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Dataset the record belongs to
    #[arg(value_enum)]
    pub dataset: DatasetKind,

    /// Record id
    pub id: i64,
}

/// Arguments for `dotport create`
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Dataset to add a record to
    #[arg(value_enum)]
    pub dataset: DatasetKind,
}

/// Arguments for `dotport edit`
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Dataset the record belongs to
    #[arg(value_enum)]
    pub dataset: DatasetKind,

    /// Record id
    pub id: i64,
}

/// Arguments for `dotport delete`
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Dataset the record belongs to
    #[arg(value_enum)]
    pub dataset: DatasetKind,

    /// Record id
    pub id: i64,

    /// Delete without confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// List a page of dataset records.
pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(args.dataset, &states, |schema| {
        list_dataset(ctx, &client, schema, &states, args.page, args.page_size).await
    })
}

/// Show one record in full.
pub async fn view(ctx: &Context, args: ViewArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(args.dataset, &states, |schema| {
        view_record(ctx, &client, schema, args.id).await
    })
}

/// Create a record through the dataset's form.
pub async fn create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(args.dataset, &states, |schema| {
        create_record(ctx, &client, schema).await
    })
}

/// Edit a record through the dataset's form.
pub async fn edit(ctx: &Context, args: EditArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(args.dataset, &states, |schema| {
        edit_record(ctx, &client, schema, args.id).await
    })
}

/// Delete a record, asking for confirmation unless `--force` is given.
pub async fn delete(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let states = load_states(ctx, &client).await?;

    with_dataset!(args.dataset, &states, |schema| {
        delete_record(ctx, &client, schema, args.id, args.force).await
    })
}

async fn list_dataset<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
    states: &StateDirectory,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let mut table = client.table(schema);

    // Page size first: changing it resets to page one.
    table
        .page_mut()
        .set_page_size(page_size.unwrap_or_else(|| ctx.page_size()));
    table.page_mut().set_page(page);

    let spinner = ctx.output.spinner(&table.schema().loading_message);
    let snapshot = table.snapshot().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table.page_rows(&snapshot))?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(table.page_rows(&snapshot))?);
            return Ok(());
        }
        OutputFormat::Compact => {
            for row in table.page_rows(&snapshot) {
                println!("{}", serde_json::to_string(row)?);
            }
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    if snapshot.is_empty() {
        println!("{}", table.schema().empty_message.as_str().dimmed());
        return Ok(());
    }

    let total = snapshot.total.unwrap_or(snapshot.len() as u64) as usize;
    let rows = table.page_rows(&snapshot);
    if rows.is_empty() {
        ctx.output.info(&format!(
            "Page {} is out of range; the dataset has {} page(s)",
            table.page().page(),
            table.page().total_pages(snapshot.len())
        ));
        return Ok(());
    }

    let helpers = RenderHelpers::new(states.clone());
    let rendered = ctx
        .output
        .records_table(&table.schema().columns, rows, &helpers, width_tier());
    println!("{rendered}");

    let (start, end) = table.page().display_range(total);
    println!(
        "\nShowing {} to {} of {} records",
        start,
        end,
        format_number(total as f64)
    );

    Ok(())
}

async fn view_record<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
    id: i64,
) -> Result<()> {
    let table = client.table(schema);

    let spinner = ctx.output.spinner(&table.schema().loading_message);
    let snapshot = table.snapshot().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let record = find_record(&snapshot, id, table.schema())?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(record)?);
            return Ok(());
        }
        OutputFormat::Compact => {
            println!("{}", serde_json::to_string(record)?);
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    print_record_details(table.schema(), record)
}

async fn create_record<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
) -> Result<()> {
    let table = client.table(schema);
    let mut session = table.open_create();

    println!("\n{}", table.schema().create_label.as_str().bold());
    run_form(ctx, &table, &mut session).await?;

    ctx.output
        .success(&format!("Created a record in {}", table.schema().title));
    Ok(())
}

async fn edit_record<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
    id: i64,
) -> Result<()> {
    let table = client.table(schema);

    let spinner = ctx.output.spinner(&table.schema().loading_message);
    let snapshot = table.snapshot().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let record = find_record(&snapshot, id, table.schema())?;
    let mut session = table.open_edit(record)?;

    println!(
        "\n{}",
        format!("Edit record {} in {}", id, table.schema().title).bold()
    );
    run_form(ctx, &table, &mut session).await?;

    ctx.output
        .success(&format!("Updated record {} in {}", id, table.schema().title));
    Ok(())
}

async fn delete_record<T: TableRecord>(
    ctx: &Context,
    client: &PortalClient,
    schema: TableSchema<T>,
    id: i64,
    force: bool,
) -> Result<()> {
    let table = client.table(schema);

    let spinner = ctx.output.spinner(&table.schema().loading_message);
    let snapshot = table.snapshot().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let record = find_record(&snapshot, id, table.schema())?;

    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete record {} from {}? This cannot be undone.",
                id,
                table.schema().title
            ))
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let mut session = table.open_delete(record);
    let spinner = ctx.output.spinner("Deleting record...");
    let outcome = table.submit(&mut session).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    outcome?;

    ctx.output
        .success(&format!("Deleted record {} from {}", id, table.schema().title));
    Ok(())
}

// ===== Shared Helpers =====

pub(super) async fn load_states(ctx: &Context, client: &PortalClient) -> Result<StateDirectory> {
    let spinner = ctx.output.spinner("Loading reference data...");
    let states = client.states().await?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    Ok(states)
}

fn find_record<'a, T: TableRecord>(
    snapshot: &'a Snapshot<T>,
    id: i64,
    schema: &TableSchema<T>,
) -> Result<&'a T> {
    snapshot
        .records
        .iter()
        .find(|record| record.id() == id)
        .with_context(|| format!("No record with id {} in {}", id, schema.title))
}

/// Print one record as labelled fields in schema order.
pub(super) fn print_record_details<T: TableRecord>(
    schema: &TableSchema<T>,
    record: &T,
) -> Result<()> {
    let values = record.to_field_values()?;

    print_section(&schema.title);
    print_field("Id", &record.id().to_string());
    for field in &schema.fields {
        let value = values.get(&field.name).cloned().unwrap_or(FieldValue::Null);
        print_field(&field.label, &display_value(field, &value));
    }

    Ok(())
}

/// Prompt for every editable field, submit, and keep re-prompting while
/// validation or the data service rejects the form.
pub(super) async fn run_form<T: TableRecord>(
    ctx: &Context,
    table: &RecordTable<T>,
    session: &mut ModalSession,
) -> Result<()> {
    let fields = table.schema().fields.clone();

    for field in fields.iter().filter(|field| !field.read_only) {
        prompt_field(session, field)?;
    }

    loop {
        let spinner = ctx.output.spinner("Saving...");
        let result = table.submit(session).await;

        if let Some(s) = spinner {
            s.finish_and_clear();
        }

        match result {
            Ok(SubmitOutcome::Completed) => return Ok(()),
            Ok(SubmitOutcome::Rejected) => {
                ctx.output.warning("The form has validation errors:");
                for (name, message) in session.errors() {
                    let label = fields
                        .iter()
                        .find(|field| &field.name == name)
                        .map(|field| field.label.as_str())
                        .unwrap_or(name.as_str());
                    if message.starts_with(label) {
                        ctx.output.error(message);
                    } else {
                        ctx.output.error(&format!("{}: {}", label, message));
                    }
                }

                let invalid: Vec<FieldDef> = fields
                    .iter()
                    .filter(|field| !field.read_only && session.error(&field.name).is_some())
                    .cloned()
                    .collect();
                if invalid.is_empty() {
                    bail!("Validation failed on fields the form cannot edit");
                }
                for field in &invalid {
                    prompt_field(session, field)?;
                }
            }
            Err(err) => {
                // The session re-arms on failure, so the form survives a retry.
                ctx.output.error(&format!("Save failed: {}", err));
                let retry = dialoguer::Confirm::new()
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()
                    .context("Failed to get confirmation")?;

                if !retry {
                    bail!("Record was not saved");
                }
            }
        }
    }
}

/// Prompt for one field and store the raw answer in the session. Values
/// are stored permissively; the validator reports anything unusable at
/// the next submit.
fn prompt_field(session: &mut ModalSession, field: &FieldDef) -> Result<()> {
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };

    match field.field_type {
        FieldType::Boolean => {
            let current = session
                .field(&field.name)
                .and_then(FieldValue::as_bool)
                .unwrap_or(false);
            let answer = dialoguer::Confirm::new()
                .with_prompt(label)
                .default(current)
                .interact()
                .context("Failed to read field")?;
            session.set_field(&field.name, answer);
        }
        FieldType::Select => {
            let mut items: Vec<String> = Vec::new();
            if !field.required {
                items.push("(none)".to_string());
            }
            items.extend(field.options.iter().map(|option| option.label.clone()));

            let current = session.field(&field.name).cloned().unwrap_or(FieldValue::Null);
            let offset = usize::from(!field.required);
            let default = field
                .options
                .iter()
                .position(|option| option.value == current)
                .map(|index| index + offset)
                .unwrap_or(0);

            let choice = dialoguer::Select::new()
                .with_prompt(label)
                .items(&items)
                .default(default)
                .interact()
                .context("Failed to read selection")?;

            if !field.required && choice == 0 {
                session.set_field(&field.name, FieldValue::Null);
            } else {
                let option = &field.options[choice - offset];
                session.set_field(&field.name, option.value.clone());
            }
        }
        _ => {
            let current = match session.field(&field.name) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => String::new(),
            };
            let answer: String = dialoguer::Input::new()
                .with_prompt(label)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()
                .context("Failed to read field")?;
            session.set_field(&field.name, parse_input(field, answer.trim()));
        }
    }

    Ok(())
}

/// Raw prompt text to a field value. Numbers that do not parse stay text
/// so validation can name the problem instead of silently dropping input.
fn parse_input(field: &FieldDef, raw: &str) -> FieldValue {
    if raw.is_empty() {
        return FieldValue::Null;
    }

    match field.field_type {
        FieldType::Number => match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => FieldValue::Number(number),
            _ => FieldValue::Text(raw.to_string()),
        },
        _ => FieldValue::Text(raw.to_string()),
    }
}

/// Human text for a field value: option labels for selects, short dates,
/// `Yes`/`No` for booleans.
fn display_value(field: &FieldDef, value: &FieldValue) -> String {
    if value.is_empty() {
        return "-".to_string();
    }

    match field.field_type {
        FieldType::Select => field
            .option_label(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        FieldType::Date => format_date_value(&value.to_string()),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotport_core::SelectOption;

    #[test]
    fn test_parse_input_keeps_bad_numbers_as_text() {
        let speed = FieldDef::number("TrainSpeed", "Train Speed (mph)");
        assert_eq!(parse_input(&speed, "45"), FieldValue::Number(45.0));
        assert_eq!(parse_input(&speed, "fast"), FieldValue::Text("fast".into()));
        assert_eq!(parse_input(&speed, "inf"), FieldValue::Text("inf".into()));
        assert_eq!(parse_input(&speed, ""), FieldValue::Null);

        let name = FieldDef::text("CaseNumber", "Case Number");
        assert_eq!(parse_input(&name, "A-100"), FieldValue::Text("A-100".into()));
    }

    #[test]
    fn test_display_value_prefers_option_labels() {
        let state = FieldDef::select(
            "StateId",
            "State",
            vec![SelectOption::new(6i64, "California")],
        );
        assert_eq!(display_value(&state, &FieldValue::Number(6.0)), "California");
        assert_eq!(display_value(&state, &FieldValue::Number(99.0)), "99");
        assert_eq!(display_value(&state, &FieldValue::Null), "-");
    }

    #[test]
    fn test_display_value_formats_dates() {
        let date = FieldDef::date("CrashDate", "Crash Date");
        assert_eq!(
            display_value(&date, &FieldValue::Text("2024-03-18".into())),
            "Mar 18, 2024"
        );
        assert_eq!(
            display_value(&date, &FieldValue::Text("pending".into())),
            "pending"
        );
    }
}
