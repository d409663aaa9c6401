//! Drives the editor and HTTP client against a live in-process API server.

use std::sync::Arc;
use std::time::Duration;

use scorecard_api::{create_router, ApiConfig, AppState};
use scorecard_models::{BulkSchedulePatch, NewTeam, ScheduleInput, SchedulePatch};
use scorecard_persistence::{seed_defaults, PlanStore};
use scorecard_planner::export::to_csv;
use scorecard_planner::{
    ApiClient, DragKind, EditorConfig, GanttEditor, MonthSpan, Notification, PlannerError,
    SyncState,
};
use tempfile::TempDir;

async fn spawn_server() -> (TempDir, ApiClient) {
    let dir = tempfile::tempdir().unwrap();
    let store = PlanStore::open(dir.path()).unwrap();
    seed_defaults(&store).unwrap();
    let state = AppState::new(ApiConfig::default(), store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    (dir, ApiClient::new(format!("http://{}/api", addr)))
}

fn grid_x(offset: f64) -> f64 {
    250.0 + offset
}

#[tokio::test]
async fn test_drag_create_persists_through_api() {
    let (_dir, client) = spawn_server().await;
    let mut editor = GanttEditor::new(Arc::new(client.clone()), EditorConfig::default());
    editor.load().await.unwrap();
    assert!(editor.view().is_empty());

    let f1 = editor.find_by_code("f1").unwrap().initiative.id.clone();
    assert_eq!(
        editor.pointer_down(&f1, grid_x(0.0)).unwrap(),
        Some(DragKind::Create)
    );
    editor.pointer_move(grid_x(250.0)).unwrap();
    editor.pointer_up();
    assert!(editor.flush(&f1).await.unwrap());

    let stored = client.get_initiative(&f1).await.unwrap();
    let schedule = stored.schedule.unwrap();
    assert_eq!((schedule.start_month, schedule.end_month), (0, 3));
    assert_eq!(schedule.year, 2026);

    let notes = editor.poll_events();
    assert!(notes.contains(&Notification::Success("Changes saved".to_string())));
    assert_eq!(editor.view().get(&f1).unwrap().sync, SyncState::Synced);

    let csv = to_csv(&client.gantt_data().await.unwrap());
    assert!(csv.contains("\"F1\",\"License usage audit\",\"January\",\"April\",\"2026\""));
}

#[tokio::test]
async fn test_timer_save_and_delete() {
    let (_dir, client) = spawn_server().await;
    let config = EditorConfig::default().with_autosave_delay(Duration::from_millis(50));
    let mut editor = GanttEditor::new(Arc::new(client.clone()), config);
    editor.load().await.unwrap();

    let c1 = editor.find_by_code("C1").unwrap().initiative.id.clone();
    client
        .upsert_schedule(&c1, &ScheduleInput::new(2026, 2, 5))
        .await
        .unwrap();
    editor.refresh().await.unwrap();

    editor.pointer_down(&c1, grid_x(300.0)).unwrap();
    assert_eq!(
        editor.pointer_move(grid_x(460.0)).unwrap(),
        Some(MonthSpan { start: 4, end: 7 })
    );
    editor.pointer_up();

    for _ in 0..50 {
        if !editor.is_saving() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!editor.is_saving());
    let schedule = client.get_initiative(&c1).await.unwrap().schedule.unwrap();
    assert_eq!((schedule.start_month, schedule.end_month), (4, 7));

    assert!(editor.delete_schedule(&c1, |_| true).await.unwrap());
    assert!(client.get_initiative(&c1).await.unwrap().schedule.is_none());
    assert!(client.list_schedules().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_messages_surface_verbatim() {
    let (_dir, client) = spawn_server().await;

    let team = NewTeam {
        name: "Infrastructure".to_string(),
        color: "#FF5733".to_string(),
    };
    client.create_team(&team).await.unwrap();
    let err = client.create_team(&team).await.unwrap_err();
    match err {
        PlannerError::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Team name already exists");
        }
        other => panic!("unexpected error: {other}"),
    }

    let data = client.gantt_data().await.unwrap();
    let id = data[0].initiatives[0].initiative.id.clone();
    let err = client
        .upsert_schedule(&id, &ScheduleInput::new(2026, 7, 2))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Start month must be <= end month");
}

#[tokio::test]
async fn test_bulk_update_rejects_whole_batch() {
    let (_dir, client) = spawn_server().await;
    let data = client.gantt_data().await.unwrap();
    let a = data[0].initiatives[0].initiative.id.clone();
    let b = data[0].initiatives[1].initiative.id.clone();
    let sa = client
        .upsert_schedule(&a, &ScheduleInput::new(2026, 0, 1))
        .await
        .unwrap();
    let sb = client
        .upsert_schedule(&b, &ScheduleInput::new(2026, 3, 4))
        .await
        .unwrap();

    let patches = vec![
        BulkSchedulePatch {
            id: sa.id.clone(),
            patch: SchedulePatch {
                end_month: Some(6),
                ..Default::default()
            },
        },
        BulkSchedulePatch {
            id: sb.id.clone(),
            patch: SchedulePatch {
                start_month: Some(9),
                ..Default::default()
            },
        },
    ];
    let err = client.bulk_update_schedules(&patches).await.unwrap_err();
    assert!(matches!(err, PlannerError::Api { status: 400, .. }));
    assert!(err.to_string().starts_with(&format!("Schedule {}", sb.id)));

    let unchanged = client.get_schedule(&sa.id).await.unwrap();
    assert_eq!(unchanged.schedule.end_month, 1);
}

#[tokio::test]
async fn test_initiative_delete_reconciles_timeline() {
    let (_dir, client) = spawn_server().await;
    let mut editor = GanttEditor::new(Arc::new(client.clone()), EditorConfig::default());
    editor.load().await.unwrap();

    let f2 = editor.find_by_code("F2").unwrap().initiative.id.clone();
    client
        .upsert_schedule(&f2, &ScheduleInput::new(2026, 1, 2))
        .await
        .unwrap();
    editor.refresh().await.unwrap();
    assert!(editor.span_of(&f2).is_some());

    editor
        .structural_change(
            "Initiative deleted successfully",
            "Failed to delete initiative",
            client.delete_initiative(&f2),
        )
        .await
        .unwrap();
    assert!(editor.find_by_code("F2").is_none());
    assert!(editor.span_of(&f2).is_none());

    let err = editor
        .structural_change(
            "Initiative deleted successfully",
            "Failed to delete initiative",
            client.delete_initiative(&f2),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    let notes = editor.poll_events();
    assert_eq!(
        notes.last(),
        Some(&Notification::Error(format!("initiative not found: {}", f2)))
    );
}
