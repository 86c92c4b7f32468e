//! End-to-end synchronizer behavior against in-memory gateways.

use futures::stream::{FuturesUnordered, StreamExt};
use grid_column::CellValue;
use grid_core::{
    GridConfig, GridError, Severity, SortOrder, SyncState, TableSynchronizer, MAX_QUEUED_NOTIFICATIONS,
};
use grid_gateway::{Gateway, HttpGateway, GatewayConfig, MemoryGateway, NoAuth};
use grid_spec::{catalog, RowRecord};
use grid_test_utils::{record, records, scenario_spec, seeded_gateway, DelayedGateway};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn ready(rows: Vec<RowRecord>) -> TableSynchronizer<Arc<MemoryGateway>> {
    let mut grid = TableSynchronizer::new(scenario_spec(), seeded_gateway(rows), GridConfig::default());
    assert!(grid.start().await.unwrap());
    grid
}

fn names(rows: &[&RowRecord]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("Name").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn edit_replaces_row_and_names_it() {
    let mut grid = ready(vec![record(1, "Fib")]).await;
    assert_eq!(grid.state(), SyncState::Ready);

    grid.complete_edit(record(1, "Fibonacci")).await.unwrap();

    assert_eq!(grid.rows(), &[record(1, "Fibonacci")]);
    let notes = grid.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].summary, "Update Success");
    assert!(notes[0].detail.contains("Fibonacci"));
    assert_eq!(notes[0].life, Duration::from_millis(3000));
    assert!(grid.notifications().is_empty());
}

#[tokio::test]
async fn add_appends_unknown_key() {
    let mut grid = ready(Vec::new()).await;
    assert!(grid.rows().is_empty());

    grid.complete_edit(record(2, "T-Shirt")).await.unwrap();

    assert_eq!(grid.rows(), &[record(2, "T-Shirt")]);
}

#[tokio::test]
async fn delete_after_confirmation() {
    let mut grid = ready(vec![record(1, "Fib"), record(2, "T-Shirt")]).await;

    let confirmation = grid.request_delete(&json!(1)).unwrap();
    assert_eq!(confirmation.message(), "Are you sure you want to delete Fib?");
    assert_eq!(grid.rows().len(), 2);

    let removed = grid.confirm_delete(confirmation).await.unwrap();
    assert_eq!(removed, Some(record(1, "Fib")));
    assert_eq!(grid.rows(), &[record(2, "T-Shirt")]);
    assert_eq!(grid.gateway().records("CardSet"), vec![record(2, "T-Shirt")]);

    let notes = grid.drain_notifications();
    assert_eq!(notes[0].summary, "Delete Success");
    assert_eq!(notes[0].detail, "Fib deleted successfully");

    assert!(matches!(
        grid.request_delete(&json!(1)),
        Err(GridError::UnknownKey(_))
    ));
}

#[tokio::test]
async fn text_filter_then_clear() {
    let mut grid = ready(vec![record(1, "Fibonacci"), record(2, "T-Shirt")]).await;

    grid.set_filter_draft("Name", None, "Fib").unwrap();
    assert_eq!(grid.visible_rows().len(), 2, "draft must not filter");

    grid.apply_filter("Name").unwrap();
    assert_eq!(names(&grid.visible_rows()), vec!["Fibonacci"]);

    grid.clear_filter("Name").unwrap();
    assert_eq!(grid.visible_rows().len(), 2);
    assert!(grid.filter_state().is_neutral());
}

#[tokio::test]
async fn global_filter_is_immediate() {
    let mut grid = ready(vec![record(1, "Fibonacci"), record(2, "T-Shirt")]).await;
    grid.set_global_filter("SHIRT");
    assert_eq!(names(&grid.visible_rows()), vec!["T-Shirt"]);
    grid.set_global_filter("");
    assert_eq!(grid.visible_rows().len(), 2);
}

#[tokio::test]
async fn filter_input_is_typed_per_column() {
    let grid = ready(records(3)).await;
    assert!(matches!(
        grid.set_filter_draft("Missing", None, "x"),
        Err(GridError::UnknownField(_))
    ));
    grid.set_filter_draft("Id", None, "2").unwrap();
    assert!(grid
        .set_filter_draft("Id", Some(grid_filter::MatchMode::Contains), "2")
        .is_err());
}

#[tokio::test]
async fn sort_cycles_through_removable_states() {
    let mut grid = ready(vec![record(1, "b"), record(2, "c"), record(3, "a")]).await;
    assert_eq!(grid.view().sort().unwrap().field, "Name");
    assert_eq!(names(&grid.visible_rows()), vec!["a", "b", "c"]);

    let sort = grid.sort_by("Name").unwrap().cloned();
    assert_eq!(sort.unwrap().order, SortOrder::Descending);
    assert_eq!(names(&grid.visible_rows()), vec!["c", "b", "a"]);

    assert!(grid.sort_by("Name").unwrap().is_none());
    assert_eq!(names(&grid.visible_rows()), vec!["b", "c", "a"]);

    assert!(grid.sort_by("Nope").is_err());
}

#[tokio::test]
async fn numeric_sort_on_id() {
    let mut grid = ready(vec![record(10, "x"), record(9, "y"), record(100, "z")]).await;
    grid.sort_by("Id").unwrap();
    let ids: Vec<_> = grid.visible_rows().iter().map(|r| r.get("Id").cloned()).collect();
    assert_eq!(ids, vec![Some(json!(9)), Some(json!(10)), Some(json!(100))]);
}

#[tokio::test]
async fn pagination_clamps_to_last_page() {
    let mut grid = ready(records(23)).await;
    assert_eq!(grid.page_rows().len(), 10);

    grid.set_page(5);
    assert_eq!(grid.view().pagination().page(), 2);
    assert_eq!(grid.page_rows().len(), 3);

    grid.set_rows_per_page(25).unwrap();
    assert_eq!(grid.page_rows().len(), 23);
    assert!(matches!(
        grid.set_rows_per_page(7),
        Err(GridError::InvalidPageSize(7))
    ));
}

#[tokio::test]
async fn renders_visible_columns_only() {
    let mut grid = TableSynchronizer::new(
        catalog::poker_room().unwrap(),
        MemoryGateway::demo(),
        GridConfig::default(),
    );
    grid.start().await.unwrap();

    let rendered = grid.rendered_rows();
    assert_eq!(rendered.len(), 1);
    let row = &rendered[0];
    assert!(row.key.is_some());
    assert!(row.cells.iter().all(|c| c.field != "PokerRoomId"));

    let name = row.cells.iter().find(|c| c.field == "Name").unwrap();
    assert_eq!(name.value, CellValue::Text("Sprint Planning".into()));

    let players = row.cells.iter().find(|c| c.field == "PokerPlayers").unwrap();
    let CellValue::Select(control) = &players.value else {
        panic!("players should render a select control");
    };
    assert_eq!(control.value, Some(json!(1)));
    assert_eq!(control.options.len(), 2);
}

#[tokio::test]
async fn add_form_round_trip() {
    let mut grid = ready(vec![record(1, "Fib")]).await;
    grid.show_add_form();
    grid.show_add_form();
    assert!(grid.is_add_form_visible());

    let template = grid.new_record_template();
    assert_eq!(template.get("Id"), Some(&Value::Null));
    assert_eq!(template.get("Name"), Some(&Value::Null));

    let stored = grid.complete_edit(template.with("Name", "Powers")).await.unwrap();
    assert_eq!(stored.get("Id"), Some(&json!(2)));
    assert_eq!(grid.rows().len(), 2);
    assert!(!grid.is_add_form_visible());

    grid.show_add_form();
    grid.hide_add_form();
    assert!(!grid.is_add_form_visible());
}

#[tokio::test]
async fn cell_edit_goes_through_the_editor() {
    let grid = ready(vec![record(1, "Fib")]).await;
    let edited = grid.edited_row(&json!(1), "Name", "Fibonacci").unwrap();
    assert_eq!(edited, record(1, "Fibonacci"));
    assert!(matches!(
        grid.edited_row(&json!(1), "Id", "5"),
        Err(GridError::ReadOnlyField(_))
    ));
    assert!(matches!(
        grid.edited_row(&json!(7), "Name", "x"),
        Err(GridError::UnknownKey(_))
    ));
}

#[tokio::test]
async fn set_model_rebuilds_and_refetches() {
    let mut grid = TableSynchronizer::new(
        catalog::card_set().unwrap(),
        MemoryGateway::demo(),
        GridConfig::default(),
    );
    grid.start().await.unwrap();
    grid.set_filter_draft("Name", None, "fib").unwrap();
    grid.apply_filter("Name").unwrap();
    assert_eq!(grid.visible_rows().len(), 1);

    let same = grid.model().clone();
    assert!(!grid.set_model(same).await.unwrap());
    assert_eq!(grid.visible_rows().len(), 1);

    assert!(grid.set_model(catalog::card().unwrap()).await.unwrap());
    assert_eq!(grid.model().resource(), "Card");
    assert_eq!(grid.rows().len(), 13);
    assert!(grid.filter_state().is_neutral());
    assert!(!grid.filter_state().contains("Name"));
    assert!(grid.column("DisplayName").is_some());
    assert_eq!(grid.view().sort().unwrap().field, "DisplayName");
}

#[tokio::test]
async fn resize_toggles_frozen_columns() {
    let mut grid = TableSynchronizer::new(
        catalog::poker_room().unwrap(),
        MemoryGateway::demo(),
        GridConfig::default().with_viewport_width(1280),
    );
    assert!(grid.column("Name").unwrap().frozen);
    grid.resize(600);
    assert!(!grid.column("Name").unwrap().frozen);
    grid.resize(769);
    assert!(grid.column("Name").unwrap().frozen);
}

#[tokio::test]
async fn waits_idle_without_credentials() {
    let gateway = HttpGateway::new(GatewayConfig::default(), Arc::new(NoAuth)).unwrap();
    assert!(!gateway.is_available());
    let mut grid = TableSynchronizer::new(scenario_spec(), gateway, GridConfig::default());

    assert!(!grid.start().await.unwrap());
    assert_eq!(grid.state(), SyncState::Idle);
    assert!(matches!(
        grid.begin_edit(record(1, "x")),
        Err(GridError::NotReady(SyncState::Idle))
    ));
}

#[tokio::test]
async fn racing_edits_reconcile_in_arrival_order() {
    let gateway = DelayedGateway::new(seeded_gateway(vec![record(1, "a"), record(2, "b")]))
        .with_delay(1, Duration::from_millis(60));
    let mut grid = TableSynchronizer::new(scenario_spec(), gateway, GridConfig::default());
    grid.start().await.unwrap();

    let slow = grid.begin_edit(record(1, "a2")).unwrap();
    let fast = grid.begin_edit(record(2, "b2")).unwrap();

    let arrivals: Vec<_> = {
        let in_flight: FuturesUnordered<_> = [slow, fast]
            .into_iter()
            .map(|edit| edit.send(grid.gateway()))
            .collect();
        in_flight.collect().await
    };

    let order: Vec<_> = arrivals
        .iter()
        .map(|r| r.request().get("Id").cloned())
        .collect();
    assert_eq!(order, vec![Some(json!(2)), Some(json!(1))]);

    for response in arrivals {
        grid.reconcile_edit(response).unwrap();
    }
    assert_eq!(grid.rows(), &[record(1, "a2"), record(2, "b2")]);
}

#[tokio::test]
async fn last_reconciled_response_wins() {
    let mut grid = ready(vec![record(1, "a")]).await;

    let first = grid.begin_edit(record(1, "first")).unwrap();
    let second = grid.begin_edit(record(1, "second")).unwrap();
    let (first, second) = futures::join!(first.send(grid.gateway()), second.send(grid.gateway()));

    grid.reconcile_edit(second).unwrap();
    grid.reconcile_edit(first).unwrap();

    assert_eq!(grid.rows(), &[record(1, "first")]);
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
    let config = GridConfig::default().with_page_size_options(vec![0, 10]);
    assert!(matches!(
        TableSynchronizer::try_new(scenario_spec(), seeded_gateway(records(5)), config.clone()),
        Err(GridError::InvalidConfig(_))
    ));

    let mut grid = TableSynchronizer::new(scenario_spec(), seeded_gateway(records(5)), config);
    grid.start().await.unwrap();
    assert!(matches!(
        grid.set_rows_per_page(0),
        Err(GridError::InvalidPageSize(0))
    ));
    assert_eq!(grid.page_rows().len(), 5);
}

#[tokio::test]
async fn expired_notifications_are_dropped() {
    let config = GridConfig {
        notification_life_ms: 0,
        ..GridConfig::default()
    };
    let mut grid = TableSynchronizer::new(scenario_spec(), seeded_gateway(vec![record(1, "a")]), config);
    grid.start().await.unwrap();

    grid.complete_edit(record(1, "b")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    grid.complete_edit(record(1, "c")).await.unwrap();

    let notes = grid.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].detail, "c updated successfully");
}

#[tokio::test]
async fn notification_queue_is_bounded() {
    let mut grid = ready(vec![record(1, "a")]).await;
    for i in 0..MAX_QUEUED_NOTIFICATIONS + 5 {
        grid.complete_edit(record(1, &format!("n{i}"))).await.unwrap();
    }
    let notes = grid.notifications();
    assert_eq!(notes.len(), MAX_QUEUED_NOTIFICATIONS);
    assert_eq!(
        notes.last().unwrap().detail,
        format!("n{} updated successfully", MAX_QUEUED_NOTIFICATIONS + 4)
    );
}
