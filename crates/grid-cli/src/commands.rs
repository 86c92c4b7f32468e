//! Subcommand implementations
//!
//! Every command writes its report to the given writer so the binary can
//! print to stdout and tests can capture the output.

use anyhow::{anyhow, bail, Context, Result};
use grid_column::{CellEditor, ColumnResolver, FilterWidget, ResolvedColumn, Viewport};
use grid_core::{GridConfig, SortOrder, TableSynchronizer};
use grid_gateway::{AuthProvider, Gateway, HttpGateway, MemoryGateway, NoAuth, StaticToken};
use grid_spec::{catalog, ModelSpec, RowRecord};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Environment variable holding the API bearer token
pub(crate) const TOKEN_VAR: &str = "GRID_API_TOKEN";

pub(crate) type SharedGateway = Arc<dyn Gateway>;
type Grid = TableSynchronizer<SharedGateway>;

/// Load a spec file, or fall back to a built-in resource name
pub(crate) fn resolve_spec(source: &str) -> Result<ModelSpec> {
    let path = Path::new(source);
    if path.exists() {
        return grid_spec::load_spec(path).with_context(|| format!("loading spec {source}"));
    }
    catalog::by_resource(source)?
        .ok_or_else(|| anyhow!("'{source}' is neither a spec file nor a built-in resource"))
}

pub(crate) fn open_gateway(
    config: &GridConfig,
    token: Option<String>,
    demo: bool,
) -> Result<SharedGateway> {
    if demo {
        tracing::info!("Using in-memory demo data");
        return Ok(Arc::new(MemoryGateway::demo()));
    }
    let auth: Arc<dyn AuthProvider> = match token
        .map(StaticToken::new)
        .or_else(|| StaticToken::from_env(TOKEN_VAR))
    {
        Some(token) => Arc::new(token),
        None => Arc::new(NoAuth),
    };
    Ok(Arc::new(HttpGateway::new(config.gateway.clone(), auth)?))
}

async fn ready_grid(model: ModelSpec, gateway: SharedGateway, config: GridConfig) -> Result<Grid> {
    let mut grid = TableSynchronizer::try_new(model, gateway, config)?;
    if !grid.start().await? {
        bail!("no API token; pass --token or set {TOKEN_VAR}");
    }
    Ok(grid)
}

fn flush_notifications(grid: &mut Grid, out: &mut dyn Write) -> Result<()> {
    for note in grid.drain_notifications() {
        writeln!(out, "[{:?}] {}: {}", note.severity, note.summary, note.detail)?;
    }
    Ok(())
}

/// `Field=value` filter argument
pub(crate) fn parse_filter_arg(arg: &str) -> Result<(String, String)> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("filter '{arg}' must look like Field=value"))?;
    let field = field.trim();
    if field.is_empty() {
        bail!("filter '{arg}' names no field");
    }
    Ok((field.to_string(), value.to_string()))
}

/// Key given on the command line: JSON when it parses, otherwise a string
pub(crate) fn parse_key(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn widget_name(widget: &FilterWidget) -> &'static str {
    match widget {
        FilterWidget::ExactMatch => "exact",
        FilterWidget::NumericRange => "numeric range",
        FilterWidget::DateRange => "date range",
        FilterWidget::TriState => "any/yes/no",
        FilterWidget::Inclusion { .. } => "one of",
        FilterWidget::Substring => "contains",
    }
}

fn editor_name(editor: Option<&CellEditor>) -> &'static str {
    match editor {
        None => "read-only",
        Some(CellEditor::Identity) => "identity",
        Some(CellEditor::Text) => "text",
        Some(CellEditor::Number { .. }) => "number",
        Some(CellEditor::Date) => "date",
        Some(CellEditor::Checkbox) => "checkbox",
        Some(CellEditor::Passthrough(_)) => "display only",
    }
}

/// Print the resolved column layout of a spec
pub(crate) fn validate(model: &ModelSpec, config: &GridConfig, out: &mut dyn Write) -> Result<()> {
    let columns = ColumnResolver::new(config.resolver_config())
        .resolve(model, Viewport::new(config.viewport_width));

    writeln!(out, "{}: {} fields", model.resource(), model.len())?;
    writeln!(out, "  data key:     {}", model.data_key())?;
    writeln!(out, "  display name: {}", model.display_name().unwrap_or("-"))?;
    writeln!(out, "  global filter: {}", model.global_filter_fields().join(", "))?;
    for column in &columns {
        writeln!(
            out,
            "  {:<16} {:<20} {:<12} {:<14} {:<12}{}{}",
            column.field,
            column.header,
            column.kind.to_string(),
            widget_name(&column.filter),
            editor_name(column.editor.as_ref()),
            if column.frozen { " frozen" } else { "" },
            if column.hidden { " hidden" } else { "" },
        )?;
    }
    Ok(())
}

/// Options of the `list` command
#[derive(Debug, Clone, Default)]
pub(crate) struct ListArgs {
    pub(crate) filters: Vec<(String, String)>,
    pub(crate) global: Option<String>,
    pub(crate) sort: Option<String>,
    pub(crate) descending: bool,
    pub(crate) page: usize,
    pub(crate) rows: Option<usize>,
    pub(crate) json: bool,
}

fn sort_grid(grid: &mut Grid, field: &str, descending: bool) -> Result<()> {
    let wanted = if descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    // asc -> desc -> none cycle
    for _ in 0..3 {
        if grid
            .view()
            .sort()
            .is_some_and(|s| s.field == field && s.order == wanted)
        {
            return Ok(());
        }
        grid.sort_by(field)?;
    }
    Ok(())
}

fn visible_columns(columns: &[ResolvedColumn]) -> Vec<&ResolvedColumn> {
    columns.iter().filter(|c| !c.hidden).collect()
}

/// Fetch, filter, sort and print one page
pub(crate) async fn list(
    model: ModelSpec,
    gateway: SharedGateway,
    config: GridConfig,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut grid = ready_grid(model, gateway, config).await?;

    for (field, input) in &args.filters {
        grid.set_filter_draft(field, None, input)
            .with_context(|| format!("filter on {field}"))?;
        grid.apply_filter(field)?;
    }
    if let Some(text) = &args.global {
        grid.set_global_filter(text.as_str());
    }
    if let Some(field) = &args.sort {
        sort_grid(&mut grid, field, args.descending)?;
    }
    if let Some(rows) = args.rows {
        grid.set_rows_per_page(rows)?;
    }
    grid.set_page(args.page.saturating_sub(1));

    if args.json {
        let rows: Vec<&RowRecord> = grid.page_rows();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    let headers: Vec<&str> = visible_columns(grid.columns())
        .iter()
        .map(|c| c.header.as_str())
        .collect();
    writeln!(out, "{}", headers.join(" | "))?;
    for row in grid.rendered_rows() {
        let cells: Vec<String> = row.cells.iter().map(|c| c.value.to_string()).collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }

    let total = grid.visible_rows().len();
    let pagination = grid.view().pagination();
    writeln!(
        out,
        "page {} of {} ({} of {} rows)",
        pagination.page() + 1,
        pagination.page_count(total),
        total,
        grid.rows().len()
    )?;
    flush_notifications(&mut grid, out)
}

/// Create or replace a record given as a JSON object
pub(crate) async fn upsert(
    model: ModelSpec,
    gateway: SharedGateway,
    config: GridConfig,
    json: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let value: Value = serde_json::from_str(json).context("record is not valid JSON")?;
    let record = RowRecord::from_value(value).ok_or_else(|| anyhow!("record must be a JSON object"))?;

    let mut grid = ready_grid(model, gateway, config).await?;
    let result = grid.complete_edit(record).await;
    flush_notifications(&mut grid, out)?;
    let stored = result?;
    writeln!(out, "{}", serde_json::to_string_pretty(&stored)?)?;
    Ok(())
}

/// Edit one cell of an existing row through the column's editor
pub(crate) async fn edit(
    model: ModelSpec,
    gateway: SharedGateway,
    config: GridConfig,
    key: &Value,
    field: &str,
    input: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let mut grid = ready_grid(model, gateway, config).await?;
    let record = grid.edited_row(key, field, input)?;
    let result = grid.complete_edit(record).await;
    flush_notifications(&mut grid, out)?;
    let stored = result?;
    writeln!(out, "{}", serde_json::to_string_pretty(&stored)?)?;
    Ok(())
}

/// Delete a row; without `confirmed` only the prompt is printed
pub(crate) async fn delete(
    model: ModelSpec,
    gateway: SharedGateway,
    config: GridConfig,
    key: &Value,
    confirmed: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut grid = ready_grid(model, gateway, config).await?;
    let confirmation = grid.request_delete(key)?;
    writeln!(out, "{}", confirmation.message())?;
    if !confirmed {
        writeln!(out, "Not deleted; re-run with --yes to confirm.")?;
        return Ok(());
    }
    let result = grid.confirm_delete(confirmation).await;
    flush_notifications(&mut grid, out)?;
    result?;
    Ok(())
}
