//! Table synchronizer
//!
//! Orchestrates the column resolver, the filter cache and a [`Gateway`] to
//! keep one grid in step with the remote collection:
//!
//! - **fetch** replaces the whole collection, never merges
//! - **edit** (existing or new row) sends the full record and upserts the
//!   server's answer by data key
//! - **delete** needs a [`DeleteConfirmation`] before the call is issued
//!
//! Gateway failures leave local state untouched, queue an error
//! notification and are returned to the caller.

use crate::config::GridConfig;
use crate::error::GridError;
use crate::notification::Notification;
use crate::reconcile::{self, Upsert};
use crate::state::{validate_transition, SyncState};
use crate::view::{Pagination, SortState, TableView};
use grid_column::{CellValue, ColumnResolver, ResolvedColumn, Viewport};
use grid_filter::{FilterPredicate, FilterState, MatchMode};
use grid_gateway::{Gateway, GatewayError};
use grid_spec::{value_text, ModelSpec, RowRecord};
use serde::Serialize;
use serde_json::Value;
use std::time::SystemTime;

/// Upper bound on undrained notifications
pub const MAX_QUEUED_NOTIFICATIONS: usize = 32;

/// Edit issued to the gateway but not yet reconciled
#[derive(Debug, Clone)]
pub struct PendingEdit {
    model: ModelSpec,
    key: Option<Value>,
    record: RowRecord,
}

impl PendingEdit {
    /// Record being sent
    #[inline]
    #[must_use]
    pub fn record(&self) -> &RowRecord {
        &self.record
    }

    /// Data-key value at issue time, `None` for a new record
    #[inline]
    #[must_use]
    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Send the record; the response still has to be reconciled
    pub async fn send<G: Gateway + ?Sized>(self, gateway: &G) -> EditResponse {
        let result = gateway
            .update(&self.model, self.key.clone(), &self.record)
            .await;
        EditResponse {
            model: self.model,
            request: self.record,
            result,
        }
    }
}

/// Gateway answer to a [`PendingEdit`]
#[derive(Debug)]
pub struct EditResponse {
    model: ModelSpec,
    request: RowRecord,
    result: Result<RowRecord, GatewayError>,
}

impl EditResponse {
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Record that was sent
    #[inline]
    #[must_use]
    pub fn request(&self) -> &RowRecord {
        &self.request
    }
}

/// Proof that the user was asked before a delete
#[derive(Debug, Clone)]
pub struct DeleteConfirmation {
    model: ModelSpec,
    key: Value,
    label: String,
    message: String,
}

impl DeleteConfirmation {
    #[inline]
    #[must_use]
    pub fn key(&self) -> &Value {
        &self.key
    }

    /// Display name of the record
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Prompt shown to the user
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One formatted cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub field: String,
    pub value: CellValue,
}

/// One formatted row of the current page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub key: Option<Value>,
    pub cells: Vec<RenderedCell>,
}

/// Keeps a grid synchronized with a remote collection
pub struct TableSynchronizer<G> {
    gateway: G,
    config: GridConfig,
    resolver: ColumnResolver,
    model: ModelSpec,
    columns: Vec<ResolvedColumn>,
    viewport: Viewport,
    view: TableView,
    state: SyncState,
    notifications: Vec<Notification>,
}

impl<G: Gateway> TableSynchronizer<G> {
    /// Validate `config`, then create as [`Self::new`]
    ///
    /// # Errors
    /// `InvalidConfig` when the configuration is inconsistent.
    pub fn try_new(model: ModelSpec, gateway: G, config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self::new(model, gateway, config))
    }

    /// Create an idle synchronizer; nothing is fetched until [`Self::start`]
    #[must_use]
    pub fn new(model: ModelSpec, gateway: G, config: GridConfig) -> Self {
        let resolver = ColumnResolver::new(config.resolver_config());
        let viewport = Viewport::new(config.viewport_width);
        let columns = resolver.resolve(&model, viewport);
        let pagination = Pagination::new(config.rows_per_page, config.page_size_options.clone());
        let view = TableView::new(&model, pagination);
        Self {
            gateway,
            config,
            resolver,
            model,
            columns,
            viewport,
            view,
            state: SyncState::Idle,
            notifications: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    #[inline]
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Full collection in server order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[RowRecord] {
        self.view.rows()
    }

    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, field: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.field == field)
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn transition(&mut self, to: SyncState) -> Result<(), GridError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = %self.state, %to, resource = self.model.resource(), "grid state");
        self.state = to;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), GridError> {
        match self.state {
            SyncState::Ready => Ok(()),
            other => Err(GridError::NotReady(other)),
        }
    }

    fn require_column(&self, field: &str) -> Result<&ResolvedColumn, GridError> {
        self.column(field)
            .ok_or_else(|| GridError::UnknownField(field.to_string()))
    }

    /// Queue a notification, dropping expired ones and the oldest beyond
    /// [`MAX_QUEUED_NOTIFICATIONS`]
    fn notify(&mut self, notification: Notification) {
        let now = SystemTime::now();
        self.notifications.retain(|n| !n.is_expired(now));
        self.notifications.push(notification);
        let excess = self.notifications.len().saturating_sub(MAX_QUEUED_NOTIFICATIONS);
        self.notifications.drain(..excess);
    }

    /// Begin loading once the gateway has its credentials
    ///
    /// Returns `false` and stays idle while the gateway is unavailable, or
    /// when the synchronizer has already started.
    ///
    /// # Errors
    /// As [`Self::load`].
    pub async fn start(&mut self) -> Result<bool, GridError> {
        if self.state != SyncState::Idle {
            return Ok(false);
        }
        if !self.gateway.is_available() {
            tracing::debug!(resource = self.model.resource(), "waiting for credentials");
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    /// Fetch the collection, replacing the current rows
    ///
    /// The grid ends `Ready` either way. On failure the previous rows are
    /// kept (none on the first load).
    ///
    /// # Errors
    /// `Gateway` when the list call fails.
    pub async fn load(&mut self) -> Result<usize, GridError> {
        let initial = self.state == SyncState::Idle;
        self.transition(SyncState::Loading)?;
        self.view.set_loading(true);
        let result = self.gateway.list(&self.model).await;
        self.view.set_loading(false);
        self.transition(SyncState::Ready)?;

        match result {
            Ok(rows) => {
                let duplicates = reconcile::duplicate_keys(&rows, &self.model);
                if !duplicates.is_empty() {
                    tracing::warn!(
                        resource = self.model.resource(),
                        keys = ?duplicates,
                        "duplicate data-key values; reconciliation will only touch the first match"
                    );
                }
                let count = rows.len();
                self.view.replace_rows(rows);
                tracing::info!("Loaded {} {} records", count, self.model.resource());
                Ok(count)
            }
            Err(e) => {
                if initial {
                    tracing::error!("Initial load of {} failed: {}", self.model.resource(), e);
                } else {
                    tracing::warn!("Loading {} failed: {}", self.model.resource(), e);
                }
                let life = self.config.notification_life();
                self.notify(Notification::failed("Load Failed", &e, life));
                Err(e.into())
            }
        }
    }

    /// Fetch again
    ///
    /// # Errors
    /// As [`Self::load`].
    pub async fn refresh(&mut self) -> Result<usize, GridError> {
        self.load().await
    }

    /// Bind a different model
    ///
    /// Passing the bound model again is a no-op returning `false`. Otherwise
    /// columns are re-resolved, filters rebuilt and, unless still idle, the
    /// collection re-fetched.
    ///
    /// # Errors
    /// As [`Self::load`].
    pub async fn set_model(&mut self, model: ModelSpec) -> Result<bool, GridError> {
        if model.same_as(&self.model) {
            return Ok(false);
        }
        tracing::info!("Switching grid from {} to {}", self.model.resource(), model.resource());
        self.columns = self.resolver.resolve(&model, self.viewport);
        self.view.reset(&model);
        self.model = model;
        if self.state != SyncState::Idle {
            self.load().await?;
        }
        Ok(true)
    }

    /// Viewport resized: recompute column freezing
    pub fn resize(&mut self, width: u32) {
        self.viewport = Viewport::new(width);
        self.resolver.refreeze(&mut self.columns, self.viewport);
    }

    /// Parse input with the column's widget and store it as the draft
    ///
    /// # Errors
    /// `UnknownField`, `Column` for unparsable input, `Filter` for a mode
    /// the kind does not offer.
    pub fn set_filter_draft(
        &self,
        field: &str,
        mode: Option<MatchMode>,
        input: &str,
    ) -> Result<(), GridError> {
        let predicate = self.require_column(field)?.parse_filter(mode, input)?;
        self.set_filter_predicate(field, predicate)
    }

    /// Store a prepared predicate as the draft
    ///
    /// # Errors
    /// `Filter` for unknown fields or modes the kind does not offer.
    pub fn set_filter_predicate(&self, field: &str, predicate: FilterPredicate) -> Result<(), GridError> {
        self.view.filters().set_draft(field, predicate)?;
        Ok(())
    }

    /// Commit a field's draft; the visible rows change
    ///
    /// # Errors
    /// `Filter` for unknown fields.
    pub fn apply_filter(&mut self, field: &str) -> Result<FilterState, GridError> {
        let state = self.view.filters().apply(field)?;
        self.view.pagination_mut().reset();
        Ok(state)
    }

    /// Reset a field's draft and applied filter
    ///
    /// # Errors
    /// `Filter` for unknown fields.
    pub fn clear_filter(&mut self, field: &str) -> Result<FilterState, GridError> {
        let state = self.view.filters().clear(field)?;
        self.view.pagination_mut().reset();
        Ok(state)
    }

    /// Global search text, applied immediately
    pub fn set_global_filter(&mut self, text: impl Into<String>) -> FilterState {
        let state = self.view.filters().set_global(text);
        self.view.pagination_mut().reset();
        state
    }

    /// Snapshot of the applied filters
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        self.view.filters().applied()
    }

    /// Cycle sort on a column
    ///
    /// # Errors
    /// `UnknownField` if the model has no such column.
    pub fn sort_by(&mut self, field: &str) -> Result<Option<&SortState>, GridError> {
        self.require_column(field)?;
        self.view.toggle_sort(field);
        Ok(self.view.sort())
    }

    /// Move to a page, clamped to the last page
    pub fn set_page(&mut self, page: usize) {
        let total = self.visible_rows().len();
        self.view.pagination_mut().set_page(page, total);
    }

    /// Change rows per page
    ///
    /// # Errors
    /// `InvalidPageSize` when the size is not offered.
    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<(), GridError> {
        self.view.pagination_mut().set_rows_per_page(rows)
    }

    /// Rows passing the applied filters, in sort order
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&RowRecord> {
        self.view.visible_rows(&self.columns)
    }

    /// Visible rows of the current page
    #[must_use]
    pub fn page_rows(&self) -> Vec<&RowRecord> {
        self.view.page_rows(&self.columns)
    }

    /// Formatted cells of every non-hidden column for the current page
    #[must_use]
    pub fn rendered_rows(&self) -> Vec<RenderedRow> {
        self.page_rows()
            .into_iter()
            .map(|row| RenderedRow {
                key: row.key(&self.model).cloned(),
                cells: self
                    .columns
                    .iter()
                    .filter(|c| !c.hidden)
                    .map(|c| RenderedCell {
                        field: c.field.clone(),
                        value: c.format(row),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Open the add form; opening it again changes nothing
    pub fn show_add_form(&mut self) {
        self.view.set_add_form_visible(true);
    }

    pub fn hide_add_form(&mut self) {
        self.view.set_add_form_visible(false);
    }

    #[inline]
    #[must_use]
    pub fn is_add_form_visible(&self) -> bool {
        self.view.is_add_form_visible()
    }

    /// Blank record for the add form: every field `null`
    #[must_use]
    pub fn new_record_template(&self) -> RowRecord {
        self.model
            .field_names()
            .fold(RowRecord::new(), |record, field| record.with(field, Value::Null))
    }

    /// Copy of a row with one cell replaced by parsed editor input
    ///
    /// # Errors
    /// `UnknownField`, `ReadOnlyField`, `UnknownKey`, or `Column` when the
    /// editor rejects the input.
    pub fn edited_row(&self, key: &Value, field: &str, input: &str) -> Result<RowRecord, GridError> {
        let editor = self
            .require_column(field)?
            .editor
            .ok_or_else(|| GridError::ReadOnlyField(field.to_string()))?;
        let value = editor.parse(input)?;
        let index = reconcile::find_by_key(self.rows(), &self.model, key)
            .ok_or_else(|| GridError::UnknownKey(value_text(key)))?;
        let mut row = self.rows()[index].clone();
        row.set(field, value);
        Ok(row)
    }

    /// Prepare an edit of an existing row or an add of a new one
    ///
    /// # Errors
    /// `NotReady` before the first fetch has resolved.
    pub fn begin_edit(&self, record: RowRecord) -> Result<PendingEdit, GridError> {
        self.ensure_ready()?;
        let key = record.key(&self.model).cloned();
        tracing::debug!(
            resource = self.model.resource(),
            key = ?key.as_ref().map(value_text),
            "edit issued"
        );
        Ok(PendingEdit {
            model: self.model.clone(),
            key,
            record,
        })
    }

    /// Fold a gateway answer into the collection
    ///
    /// Upserts by data key: an existing row is replaced in place, an unknown
    /// key is appended. Responses are applied in the order they are passed
    /// here, so racing edits land in arrival order.
    ///
    /// # Errors
    /// - `Gateway` when the call failed (nothing changes)
    /// - `StaleModel` when the model changed while the call was in flight
    pub fn reconcile_edit(&mut self, response: EditResponse) -> Result<RowRecord, GridError> {
        let life = self.config.notification_life();
        if !response.model.same_as(&self.model) {
            tracing::warn!(
                "Discarding {} edit response; grid now shows {}",
                response.model.resource(),
                self.model.resource()
            );
            return Err(GridError::StaleModel("edit response"));
        }

        match response.result {
            Ok(stored) => {
                let label = stored.label(&self.model);
                let outcome = reconcile::upsert(self.view.rows_mut(), &self.model, stored.clone());
                if matches!(outcome, Upsert::Appended(_)) {
                    self.view.set_add_form_visible(false);
                }
                tracing::info!("{} {} reconciled ({:?})", self.model.resource(), label, outcome);
                self.notify(Notification::updated(&label, life));
                Ok(stored)
            }
            Err(e) => {
                let label = response.request.label(&self.model);
                tracing::warn!("Update of {} {} failed: {}", self.model.resource(), label, e);
                self.notify(Notification::failed("Update Failed", &e, life));
                Err(e.into())
            }
        }
    }

    /// Send a record and reconcile the answer
    ///
    /// # Errors
    /// As [`Self::begin_edit`] and [`Self::reconcile_edit`].
    pub async fn complete_edit(&mut self, record: RowRecord) -> Result<RowRecord, GridError> {
        let pending = self.begin_edit(record)?;
        let response = pending.send(&self.gateway).await;
        self.reconcile_edit(response)
    }

    /// Ask before deleting: builds the confirmation prompt
    ///
    /// # Errors
    /// `NotReady` before the first fetch, `UnknownKey` when no row matches.
    pub fn request_delete(&self, key: &Value) -> Result<DeleteConfirmation, GridError> {
        self.ensure_ready()?;
        let index = reconcile::find_by_key(self.rows(), &self.model, key)
            .ok_or_else(|| GridError::UnknownKey(value_text(key)))?;
        let label = self.rows()[index].label(&self.model);
        Ok(DeleteConfirmation {
            model: self.model.clone(),
            key: key.clone(),
            message: format!("Are you sure you want to delete {label}?"),
            label,
        })
    }

    /// Issue the confirmed delete and remove the row
    ///
    /// Returns the removed row, or `None` if it vanished locally in the
    /// meantime.
    ///
    /// # Errors
    /// - `Gateway` when the call failed (nothing changes)
    /// - `StaleModel` when the confirmation was issued for another model
    pub async fn confirm_delete(
        &mut self,
        confirmation: DeleteConfirmation,
    ) -> Result<Option<RowRecord>, GridError> {
        if !confirmation.model.same_as(&self.model) {
            return Err(GridError::StaleModel("delete confirmation"));
        }
        let life = self.config.notification_life();

        match self.gateway.delete(&self.model, &confirmation.key).await {
            Ok(()) => {
                let removed = reconcile::remove(self.view.rows_mut(), &self.model, &confirmation.key);
                tracing::info!("{} {} deleted", self.model.resource(), confirmation.label);
                self.notify(Notification::deleted(&confirmation.label, life));
                Ok(removed)
            }
            Err(e) => {
                tracing::warn!(
                    "Delete of {} {} failed: {}",
                    self.model.resource(),
                    confirmation.label,
                    e
                );
                self.notify(Notification::failed("Delete Failed", &e, life));
                Err(e.into())
            }
        }
    }

    /// Queued notifications, oldest first
    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take all queued notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
