// tests/widget_flow.rs
// Drives a headless app through load, edit, autosave and teardown with a manually advanced clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;

use datagrid_sync::settings::GridConfig;
use datagrid_sync::sheets::events::{
    HostValueRefreshed, RequestAddColumn, RequestAddSheet, RequestDeleteColumn,
    RequestDeleteSheet, SheetOperationFeedback, UpdateCellEvent, WidgetUnmounted,
    WorkbookLoadedFromHost,
};
use datagrid_sync::sheets::{
    CellValue, HostBoundary, HostLink, InvokeError, MemoryHost, PermissionContext,
    SaveCoordinator, SaveStatus, Workbook, WriteError,
};
use datagrid_sync::{SheetsPlugin, WidgetSettings};

#[derive(Clone, Default)]
struct SharedHost(Arc<Mutex<MemoryHost>>);

impl HostBoundary for SharedHost {
    fn try_write(&mut self, value: &str) -> Result<(), WriteError> {
        self.0.lock().unwrap().try_write(value)
    }

    fn try_invoke(&mut self) -> Result<(), InvokeError> {
        self.0.lock().unwrap().try_invoke()
    }
}

const DOC: &str = r#"[{"sheetId":"a","sheetName":"Main","data":[["x"]],"isEditable":true}]"#;

fn admin() -> PermissionContext {
    PermissionContext {
        is_admin: true,
        ..Default::default()
    }
}

fn small_settings() -> WidgetSettings {
    WidgetSettings {
        grid: GridConfig {
            min_rows: 3,
            min_cols: 3,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn setup(settings: WidgetSettings, permissions: PermissionContext) -> (App, SharedHost) {
    let host = SharedHost::default();
    let mut app = App::new();
    app.add_plugins(SheetsPlugin::new(settings))
        .insert_resource(permissions)
        .insert_resource(HostLink::new(host.clone()));
    step(&mut app, 0);
    (app, host)
}

/// Advances the clock by `ms` and runs one frame.
fn step(app: &mut App, ms: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(ms));
    app.update();
}

fn load(app: &mut App, value: &str) {
    app.world_mut().send_event(HostValueRefreshed {
        value: Some(value.to_string()),
    });
    step(app, 0);
}

fn edit(app: &mut App, row: usize, col: usize, value: &str) {
    app.world_mut().send_event(UpdateCellEvent {
        sheet_id: "a".to_string(),
        row,
        col,
        value: value.into(),
    });
    step(app, 0);
}

fn status(app: &App) -> SaveStatus {
    app.world().resource::<SaveCoordinator>().status()
}

fn workbook(app: &App) -> &Workbook {
    app.world().resource::<Workbook>()
}

fn loads_this_frame(app: &App) -> usize {
    app.world()
        .resource::<Events<WorkbookLoadedFromHost>>()
        .iter_current_update_events()
        .count()
}

fn errors_this_frame(app: &App) -> Vec<String> {
    app.world()
        .resource::<Events<SheetOperationFeedback>>()
        .iter_current_update_events()
        .filter(|f| f.is_error)
        .map(|f| f.message.clone())
        .collect()
}

#[test]
fn minimal_document_loads_padded_to_defaults() {
    let (mut app, host) = setup(WidgetSettings::default(), admin());
    load(&mut app, r#"[{"sheetId":"a","data":[["x"]]}]"#);

    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert_eq!(sheet.row_count(), 50);
    assert_eq!(sheet.column_count(), 26);
    assert_eq!(sheet.cell(0, 0), Some(&CellValue::from("x")));
    assert!(sheet.grid.iter().flatten().skip(1).all(|c| *c == CellValue::Null));
    assert_eq!(sheet.order_index, 0);
    assert!(!sheet.is_editable);

    // Loading alone never writes back.
    step(&mut app, 5_000);
    assert_eq!(host.0.lock().unwrap().writes, 0);
    assert_eq!(status(&app), SaveStatus::Idle);
}

#[test]
fn burst_of_edits_is_saved_once_after_the_debounce() {
    let (mut app, host) = setup(small_settings(), admin());
    load(&mut app, DOC);

    edit(&mut app, 0, 1, "one");
    step(&mut app, 500);
    edit(&mut app, 0, 1, "two");
    step(&mut app, 500);
    edit(&mut app, 0, 2, "three");
    assert_eq!(status(&app), SaveStatus::Pending);

    step(&mut app, 799);
    assert_eq!(host.0.lock().unwrap().writes, 0);
    step(&mut app, 1);
    {
        let host = host.0.lock().unwrap();
        assert_eq!((host.writes, host.commits), (1, 1));
        let committed = host.committed.clone().unwrap();
        assert!(committed.contains("\"two\""), "{}", committed);
        assert!(committed.contains("\"three\""), "{}", committed);
    }
    assert_eq!(status(&app), SaveStatus::Committed);

    step(&mut app, 1_999);
    assert_eq!(status(&app), SaveStatus::Committed);
    step(&mut app, 1);
    assert_eq!(status(&app), SaveStatus::Idle);
}

#[test]
fn host_refresh_is_ignored_while_local_edits_are_pending() {
    let (mut app, _host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    edit(&mut app, 1, 1, "mine");

    load(&mut app, r#"[{"sheetId":"a","data":[["theirs"]]}]"#);
    assert_eq!(loads_this_frame(&app), 0);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::from("mine")));
    assert_eq!(sheet.cell(0, 0), Some(&CellValue::from("x")));

    // Once saved, a genuinely new host value is accepted again.
    step(&mut app, 800);
    load(&mut app, r#"[{"sheetId":"a","data":[["theirs"]]}]"#);
    assert_eq!(loads_this_frame(&app), 1);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert_eq!(sheet.cell(0, 0), Some(&CellValue::from("theirs")));
}

#[test]
fn echo_of_the_written_value_does_not_reload() {
    let (mut app, host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    edit(&mut app, 0, 0, "saved");
    step(&mut app, 800);

    let written = host.0.lock().unwrap().value.clone().unwrap();
    load(&mut app, &written);
    assert_eq!(loads_this_frame(&app), 0);
}

#[test]
fn failed_write_keeps_the_model_authoritative() {
    let (mut app, host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    host.0.lock().unwrap().writable = false;

    edit(&mut app, 0, 0, "pending");
    step(&mut app, 800);
    assert_eq!(status(&app), SaveStatus::Idle);
    assert!(app.world().resource::<SaveCoordinator>().local_edits_pending());
    assert_eq!(host.0.lock().unwrap().commits, 0);

    load(&mut app, r#"[{"sheetId":"a","data":[["remote"]]}]"#);
    assert_eq!(loads_this_frame(&app), 0);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert_eq!(sheet.cell(0, 0), Some(&CellValue::from("pending")));

    // The next edit retries and succeeds once the host accepts writes.
    host.0.lock().unwrap().writable = true;
    edit(&mut app, 0, 1, "retry");
    step(&mut app, 800);
    assert_eq!(host.0.lock().unwrap().commits, 1);
    assert!(!app.world().resource::<SaveCoordinator>().local_edits_pending());
}

#[test]
fn uncommitted_write_returns_to_idle() {
    let (mut app, host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    host.0.lock().unwrap().commit_configured = false;

    edit(&mut app, 0, 0, "held");
    step(&mut app, 800);
    assert_eq!(status(&app), SaveStatus::Idle);
    let host = host.0.lock().unwrap();
    assert_eq!(host.writes, 1);
    assert!(host.value.as_deref().unwrap().contains("held"));
    assert_eq!(host.commits, 0);
}

#[test]
fn non_admins_edit_cells_but_never_structure() {
    let (mut app, host) = setup(small_settings(), PermissionContext::default());
    load(&mut app, DOC);

    edit(&mut app, 0, 0, "ok");
    assert_eq!(workbook(&app).edit_generation(), 1);

    app.world_mut().send_event(RequestAddColumn {
        sheet_id: "a".to_string(),
    });
    step(&mut app, 0);
    assert_eq!(errors_this_frame(&app).len(), 1);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert!(sheet.columns.is_empty());
    assert_eq!(workbook(&app).edit_generation(), 1);

    step(&mut app, 800);
    assert_eq!(host.0.lock().unwrap().commits, 1);
}

#[test]
fn read_only_workbook_blocks_cell_edits() {
    let ctx = PermissionContext {
        workbook_read_only: true,
        ..Default::default()
    };
    let (mut app, host) = setup(small_settings(), ctx);
    load(&mut app, DOC);
    edit(&mut app, 0, 0, "nope");
    assert_eq!(errors_this_frame(&app).len(), 1);
    assert_eq!(workbook(&app).edit_generation(), 0);
    step(&mut app, 2_000);
    assert_eq!(host.0.lock().unwrap().writes, 0);
}

#[test]
fn sheet_order_stays_contiguous() {
    let (mut app, _host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    for _ in 0..3 {
        app.world_mut().send_event(RequestAddSheet);
    }
    step(&mut app, 0);
    let names: Vec<_> = workbook(&app).sheets().iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, ["Main", "Sheet2", "Sheet3", "Sheet4"]);

    let second = workbook(&app).sheets()[1].id.clone();
    app.world_mut().send_event(RequestDeleteSheet { sheet_id: second });
    step(&mut app, 0);
    let sheets = workbook(&app).sheets();
    assert_eq!(sheets.len(), 3);
    assert!(sheets.iter().enumerate().all(|(i, s)| s.order_index == i));
}

#[test]
fn last_sheet_cannot_be_deleted() {
    let (mut app, _host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    app.world_mut().send_event(RequestDeleteSheet {
        sheet_id: "a".to_string(),
    });
    step(&mut app, 0);
    assert_eq!(errors_this_frame(&app).len(), 1);
    assert_eq!(workbook(&app).sheets().len(), 1);
}

#[test]
fn column_add_and_delete_keep_rows_aligned() {
    let doc = r#"[{"sheetId":"a","data":[["a0","b0","c0"],["a1","b1","c1"]],
        "columns":[{"key":"ka","header":"A"},{"key":"kb","header":"B"},{"key":"kc","header":"C"}]}]"#;
    let settings = WidgetSettings {
        grid: GridConfig {
            min_rows: 2,
            min_cols: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let (mut app, _host) = setup(settings, admin());
    load(&mut app, doc);

    app.world_mut().send_event(RequestAddColumn {
        sheet_id: "a".to_string(),
    });
    step(&mut app, 0);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    assert_eq!(sheet.columns.len(), 4);
    assert_eq!(sheet.row_count(), 2);
    assert!(sheet.grid.iter().all(|r| r.len() == 4 && r[3] == CellValue::Null));

    app.world_mut().send_event(RequestDeleteColumn {
        sheet_id: "a".to_string(),
        column_key: "kb".to_string(),
    });
    step(&mut app, 0);
    let sheet = workbook(&app).get_sheet("a").unwrap();
    let keys: Vec<_> = sheet.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(&keys[..2], ["ka", "kc"]);
    assert_eq!(sheet.grid[0][..2], [CellValue::from("a0"), CellValue::from("c0")]);
    assert_eq!(sheet.grid[1][..2], [CellValue::from("a1"), CellValue::from("c1")]);
}

#[test]
fn teardown_cancels_the_pending_save() {
    let (mut app, host) = setup(small_settings(), admin());
    load(&mut app, DOC);
    edit(&mut app, 0, 0, "lost");
    app.world_mut().send_event(WidgetUnmounted);
    step(&mut app, 0);
    step(&mut app, 5_000);
    assert_eq!(host.0.lock().unwrap().writes, 0);
    assert_eq!(status(&app), SaveStatus::Idle);

    load(&mut app, r#"[{"sheetId":"a","data":[["late"]]}]"#);
    assert_eq!(loads_this_frame(&app), 0);
}
