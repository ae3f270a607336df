//! Schema-driven record tables.
//!
//! A [`TableSchema`] describes one dataset declaratively: which entity to
//! read, how to render its columns, and which form fields its records
//! expose. A [`RecordTable`] pairs a schema with the HTTP client and the
//! shared snapshot store and drives the whole read/page/mutate cycle, so
//! adding a dataset is a schema definition rather than new plumbing.

use std::sync::Arc;

use dotport_core::{
    format_currency, format_date_value, format_number, values_to_object, FieldDef, ModalSession,
    PageState, StateDirectory, SubmitRequest, TableRecord, DEFAULT_PAGE_SIZE,
};
use tracing::debug;

use crate::client::HttpClient;
use crate::error::PortalResult;
use crate::query::ReadQuery;
use crate::records::RecordsClient;
use crate::store::{Snapshot, SnapshotStore, CATEGORY_SUMMARY_KEY};

/// Rows fetched per dataset read when the schema does not override it.
pub const DEFAULT_FETCH_CAP: u32 = 500;

// ===== Rendering =====

/// Formatting context handed to every column render function.
///
/// Carries the state directory so cells can resolve `StateId` values to
/// postal codes without each record type owning a lookup.
#[derive(Debug, Clone, Default)]
pub struct RenderHelpers {
    states: StateDirectory,
}

impl RenderHelpers {
    /// Helpers backed by the given state directory.
    pub fn new(states: StateDirectory) -> Self {
        Self { states }
    }

    /// The state directory itself.
    pub fn states(&self) -> &StateDirectory {
        &self.states
    }

    /// Postal code for a state id, `"??"` when unknown.
    pub fn state_code(&self, id: i64) -> &str {
        self.states.code(id)
    }

    /// Thousands-grouped number, `"-"` when absent.
    pub fn number(&self, value: Option<f64>) -> String {
        match value {
            Some(value) => format_number(value),
            None => "-".to_string(),
        }
    }

    /// Abbreviated dollar amount, `"-"` when absent.
    pub fn currency(&self, value: Option<f64>) -> String {
        match value {
            Some(value) => format_currency(value),
            None => "-".to_string(),
        }
    }

    /// Short human date from a wire date string, `"-"` when absent.
    pub fn date(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format_date_value(value),
            None => "-".to_string(),
        }
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left-aligned (the default)
    #[default]
    Left,
    /// Centered
    Center,
    /// Right-aligned, used for numeric columns
    Right,
}

/// Narrowest display width at which a column is shown.
///
/// Ordered from always-visible to widest-only, so a column is included
/// when its breakpoint is `<=` the current width tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Breakpoint {
    /// Shown at every width (the default)
    #[default]
    Always,
    /// Hidden on narrow displays
    Medium,
    /// Shown on large displays and up
    Large,
    /// Shown only on very wide displays
    ExtraLarge,
}

/// Renders one record's cell for a column.
///
/// A plain function pointer rather than a boxed closure: render logic
/// never captures state beyond the [`RenderHelpers`] it is handed, and
/// this keeps [`ColumnSpec`] `Copy`-friendly and trivially cloneable.
pub type RenderFn<T> = fn(&T, &RenderHelpers) -> String;

/// One column of a record table.
#[derive(Debug, Clone)]
pub struct ColumnSpec<T> {
    /// Column header text
    pub header: String,
    /// Cell alignment
    pub align: Align,
    /// Narrowest width tier at which this column appears
    pub breakpoint: Breakpoint,
    /// Cell renderer
    pub render: RenderFn<T>,
}

impl<T> ColumnSpec<T> {
    /// A left-aligned, always-visible column.
    pub fn new(header: impl Into<String>, render: RenderFn<T>) -> Self {
        Self {
            header: header.into(),
            align: Align::Left,
            breakpoint: Breakpoint::Always,
            render,
        }
    }

    /// Set the cell alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Hide the column below the given width tier.
    pub fn breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }
}

// ===== Schema =====

/// Declarative description of one dataset's table.
#[derive(Debug, Clone)]
pub struct TableSchema<T> {
    /// Snapshot store key for this dataset
    pub dataset_key: String,
    /// Service entity name, e.g. `RailroadAccident`
    pub entity: String,
    /// Human title shown above the table
    pub title: String,
    /// Label of the create action
    pub create_label: String,
    /// Message shown when the dataset has no rows
    pub empty_message: String,
    /// Message shown while the first fetch is in flight
    pub loading_message: String,
    /// Maximum rows fetched per read
    pub fetch_cap: u32,
    /// Service-side sort expression, e.g. `AccidentDate desc`
    pub order_by: Option<String>,
    /// Display columns, in order
    pub columns: Vec<ColumnSpec<T>>,
    /// Form fields, in order, driving both the modal form and validation
    pub fields: Vec<FieldDef>,
}

impl<T> TableSchema<T> {
    /// A schema with default labels and no columns or fields yet.
    pub fn new(
        dataset_key: impl Into<String>,
        entity: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            dataset_key: dataset_key.into(),
            entity: entity.into(),
            title: title.into(),
            create_label: "Add Record".to_string(),
            empty_message: "No records found".to_string(),
            loading_message: "Loading...".to_string(),
            fetch_cap: DEFAULT_FETCH_CAP,
            order_by: None,
            columns: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Set the create action label.
    pub fn with_create_label(mut self, label: impl Into<String>) -> Self {
        self.create_label = label.into();
        self
    }

    /// Set the empty-dataset message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Set the loading message.
    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Override the per-read row cap.
    pub fn with_fetch_cap(mut self, cap: u32) -> Self {
        self.fetch_cap = cap;
        self
    }

    /// Set the service-side sort expression.
    pub fn with_order_by(mut self, expression: impl Into<String>) -> Self {
        self.order_by = Some(expression.into());
        self
    }

    /// Set the display columns.
    pub fn with_columns(mut self, columns: Vec<ColumnSpec<T>>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the form fields.
    pub fn with_fields(mut self, fields: Vec<FieldDef>) -> Self {
        self.fields = fields;
        self
    }
}

// ===== Table engine =====

/// Result of driving a modal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The write was sent and acknowledged; cached snapshots were
    /// invalidated.
    Completed,
    /// Nothing was sent. Validation errors, if any, are on the session.
    Rejected,
}

/// The engine for one dataset: cached reads, client-side paging, and
/// modal submissions.
#[derive(Debug, Clone)]
pub struct RecordTable<T: TableRecord> {
    schema: TableSchema<T>,
    records: RecordsClient<T>,
    store: Arc<SnapshotStore>,
    page: PageState,
}

impl<T: TableRecord> RecordTable<T> {
    /// Build a table from its schema, sharing the client and snapshot
    /// store with every other table.
    pub fn new(schema: TableSchema<T>, client: Arc<HttpClient>, store: Arc<SnapshotStore>) -> Self {
        let records = RecordsClient::new(client, schema.entity.clone());
        Self {
            schema,
            records,
            store,
            page: PageState::new(DEFAULT_PAGE_SIZE),
        }
    }

    /// The schema this table was built from.
    pub fn schema(&self) -> &TableSchema<T> {
        &self.schema
    }

    /// Current pagination state.
    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Mutable pagination state, for page navigation.
    pub fn page_mut(&mut self) -> &mut PageState {
        &mut self.page
    }

    /// The shared snapshot store.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The dataset snapshot, served from cache when fresh and fetched
    /// otherwise.
    pub async fn snapshot(&self) -> PortalResult<Snapshot<T>> {
        if let Some(snapshot) = self.store.get::<T>(&self.schema.dataset_key) {
            debug!("Serving {} from cache", self.schema.dataset_key);
            return Ok(snapshot);
        }
        self.refresh().await
    }

    /// Fetch the dataset unconditionally and cache the result.
    ///
    /// One bounded read per refresh: up to `fetch_cap` rows, sorted
    /// server-side when the schema names an order, with the matching
    /// total riding along in the envelope.
    pub async fn refresh(&self) -> PortalResult<Snapshot<T>> {
        let mut query = ReadQuery::new().with_top(self.schema.fetch_cap);
        if let Some(order_by) = &self.schema.order_by {
            query = query.with_order_by(order_by.clone());
        }

        let envelope = self.records.list(&query).await?;
        let snapshot = Snapshot::new(envelope.value, envelope.count);
        debug!(
            "Fetched {} rows for {}",
            snapshot.len(),
            self.schema.dataset_key
        );
        self.store.insert(&self.schema.dataset_key, snapshot.clone());
        Ok(snapshot)
    }

    /// The slice of a snapshot visible on the current page.
    pub fn page_rows<'a>(&self, snapshot: &'a Snapshot<T>) -> &'a [T] {
        self.page.slice(&snapshot.records)
    }

    /// Open an empty create form.
    pub fn open_create(&self) -> ModalSession {
        ModalSession::create()
    }

    /// Open a read-only view of a record.
    pub fn open_view(&self, record: &T) -> PortalResult<ModalSession> {
        Ok(ModalSession::view(record.id(), record.to_field_values()?))
    }

    /// Open an edit form seeded with a record's current values.
    pub fn open_edit(&self, record: &T) -> PortalResult<ModalSession> {
        Ok(ModalSession::edit(record.id(), record.to_field_values()?))
    }

    /// Open a delete confirmation for a record.
    pub fn open_delete(&self, record: &T) -> ModalSession {
        ModalSession::delete(record.id())
    }

    /// Drive a modal submission to the service.
    ///
    /// Validation happens on the session first; a rejected form sends
    /// nothing and leaves its errors in place. A write that reaches the
    /// service and succeeds invalidates this dataset's snapshot and the
    /// category rollup. A write that fails re-arms the session so the
    /// same submission can be retried, and returns the error.
    pub async fn submit(&self, session: &mut ModalSession) -> PortalResult<SubmitOutcome> {
        let request = match session.try_submit(&self.schema.fields) {
            Some(request) => request,
            None => return Ok(SubmitOutcome::Rejected),
        };

        match self.execute(request).await {
            Ok(()) => {
                self.store.invalidate(&self.schema.dataset_key);
                self.store.invalidate(CATEGORY_SUMMARY_KEY);
                Ok(SubmitOutcome::Completed)
            }
            Err(err) => {
                session.submission_failed();
                Err(err)
            }
        }
    }

    async fn execute(&self, request: SubmitRequest) -> PortalResult<()> {
        match request {
            SubmitRequest::Save { id: None, payload } => {
                self.records.create(&values_to_object(&payload)).await?;
            }
            SubmitRequest::Save {
                id: Some(id),
                payload,
            } => {
                self.records.update(id, &values_to_object(&payload)).await?;
            }
            SubmitRequest::Delete { id } => {
                self.records.delete(id).await?;
            }
        }
        Ok(())
    }
}
