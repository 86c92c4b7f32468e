//! Column resolution
//!
//! [`ColumnResolver::resolve`] is a pure function of the model and the
//! current viewport: the same inputs always give the same bindings.

use crate::editor::CellEditor;
use crate::error::ColumnError;
use crate::formatter::{CellFormatter, CellValue};
use crate::header::header_text;
use crate::widget::FilterWidget;
use grid_filter::{FieldFilter, FilterPredicate, MatchMode, SharedFilterCache};
use grid_spec::{DataType, FieldKind, FieldSpec, ModelSpec, RowRecord};
use serde::{Deserialize, Serialize};

/// Default viewport width (px) above which `frozen` is honored
pub const DEFAULT_FREEZE_THRESHOLD: u32 = 768;

/// Default minimum column width
pub const DEFAULT_COLUMN_WIDTH: &str = "14rem";

/// Observed viewport size, injected by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

/// Whether a column marked `frozen` stays frozen at `viewport_width`
#[inline]
#[must_use]
pub fn is_frozen(frozen: bool, viewport_width: u32, threshold: u32) -> bool {
    frozen && viewport_width > threshold
}

/// All bindings of one field
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub field: String,
    pub header: String,
    pub kind: FieldKind,
    pub hidden: bool,
    pub min_width: String,
    pub data_type: DataType,
    /// Effective frozen state at the current viewport
    pub frozen: bool,
    pub sortable: bool,
    pub show_match_modes: bool,
    pub filter: FilterWidget,
    pub formatter: CellFormatter,
    /// `None` for read-only fields
    pub editor: Option<CellEditor>,
    spec_frozen: bool,
}

impl ResolvedColumn {
    /// Displayed content of this column for `row`
    #[inline]
    #[must_use]
    pub fn format(&self, row: &RowRecord) -> CellValue {
        self.formatter.format(row.get(&self.field))
    }

    /// Whether the field can be edited
    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editor.is_some()
    }

    /// Whether the field asked to be frozen, regardless of viewport
    #[inline]
    #[must_use]
    pub fn wants_frozen(&self) -> bool {
        self.spec_frozen
    }

    /// Parse filter input with this column's widget
    ///
    /// # Errors
    /// See [`FilterWidget::parse`].
    pub fn parse_filter(&self, mode: Option<MatchMode>, input: &str) -> Result<FilterPredicate, ColumnError> {
        self.filter.parse(mode, input)
    }

    /// Bind this column to its slot of a shared filter cache
    ///
    /// # Errors
    /// `Filter` when the cache was built for a model without this field.
    pub fn bind_filter(&self, cache: &SharedFilterCache) -> Result<FieldFilter, ColumnError> {
        Ok(cache.field(&self.field)?)
    }
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Viewport width (px) above which `frozen` is honored
    pub freeze_threshold: u32,
    /// Minimum width of columns without an explicit width
    pub default_width: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            freeze_threshold: DEFAULT_FREEZE_THRESHOLD,
            default_width: DEFAULT_COLUMN_WIDTH.to_string(),
        }
    }
}

/// Produces column bindings from a model
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    config: ResolverConfig,
}

impl ColumnResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Set freeze threshold
    #[inline]
    #[must_use]
    pub fn with_freeze_threshold(mut self, threshold: u32) -> Self {
        self.config.freeze_threshold = threshold;
        self
    }

    /// Set default column width
    #[inline]
    #[must_use]
    pub fn with_default_width(mut self, width: impl Into<String>) -> Self {
        self.config.default_width = width.into();
        self
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// One column per field, in model order
    #[must_use]
    pub fn resolve(&self, model: &ModelSpec, viewport: Viewport) -> Vec<ResolvedColumn> {
        let columns: Vec<_> = model
            .fields()
            .map(|(name, spec)| self.resolve_field(name, spec, viewport))
            .collect();
        tracing::debug!(
            resource = model.resource(),
            columns = columns.len(),
            width = viewport.width,
            "columns resolved"
        );
        columns
    }

    /// Bindings for one field
    #[must_use]
    pub fn resolve_field(&self, name: &str, spec: &FieldSpec, viewport: Viewport) -> ResolvedColumn {
        ResolvedColumn {
            field: name.to_string(),
            header: header_text(name),
            kind: spec.kind,
            hidden: spec.is_hidden,
            min_width: spec
                .width
                .clone()
                .unwrap_or_else(|| self.config.default_width.clone()),
            data_type: spec.effective_data_type(),
            frozen: is_frozen(spec.frozen, viewport.width, self.config.freeze_threshold),
            sortable: true,
            show_match_modes: spec.kind != FieldKind::Number,
            filter: FilterWidget::for_field(spec),
            formatter: CellFormatter::for_field(spec),
            editor: CellEditor::for_field(spec),
            spec_frozen: spec.frozen,
        }
    }

    /// Recompute frozen state after a viewport resize
    pub fn refreeze(&self, columns: &mut [ResolvedColumn], viewport: Viewport) {
        for column in columns {
            column.frozen = is_frozen(column.spec_frozen, viewport.width, self.config.freeze_threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_spec::catalog;

    #[test]
    fn frozen_only_above_threshold() {
        assert!(!is_frozen(true, 768, 768));
        assert!(is_frozen(true, 769, 768));
        assert!(!is_frozen(false, 4000, 768));
    }

    #[test]
    fn resolves_poker_room_columns() {
        let model = catalog::poker_room().unwrap();
        let resolver = ColumnResolver::default();
        let wide = resolver.resolve(&model, Viewport::new(1280));

        assert_eq!(wide.len(), model.len());
        let name = wide.iter().find(|c| c.field == "Name").unwrap();
        assert!(name.frozen);
        assert_eq!(name.min_width, DEFAULT_COLUMN_WIDTH);

        let card_set = wide.iter().find(|c| c.field == "CardSetId").unwrap();
        assert_eq!(card_set.header, "Card Set Id");
        assert_eq!(card_set.data_type, DataType::Numeric);
        assert!(!card_set.show_match_modes);

        let id = wide.iter().find(|c| c.field == "PokerRoomId").unwrap();
        assert!(id.hidden);
    }

    #[test]
    fn refreeze_on_resize() {
        let model = catalog::poker_room().unwrap();
        let resolver = ColumnResolver::default();
        let mut columns = resolver.resolve(&model, Viewport::new(1280));
        resolver.refreeze(&mut columns, Viewport::new(600));
        assert!(columns.iter().all(|c| !c.frozen));
        assert!(columns.iter().any(ResolvedColumn::wants_frozen));
        assert_eq!(columns, resolver.resolve(&model, Viewport::new(600)));
    }

    #[test]
    fn explicit_width_and_data_type_win() {
        let spec = FieldSpec::number()
            .with_width("6rem")
            .with_data_type(DataType::Text);
        let column = ColumnResolver::default()
            .with_default_width("10rem")
            .resolve_field("Value", &spec, Viewport::default());
        assert_eq!(column.min_width, "6rem");
        assert_eq!(column.data_type, DataType::Text);
    }

    #[test]
    fn binds_to_shared_cache() {
        let model = catalog::card().unwrap();
        let cache = SharedFilterCache::new(&model);
        let columns = ColumnResolver::default().resolve(&model, Viewport::new(1024));
        for column in &columns {
            let handle = column.bind_filter(&cache).unwrap();
            assert_eq!(handle.field(), column.field);
        }
    }
}
