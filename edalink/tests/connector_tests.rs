//! Integration tests for the EDA connectors

use std::sync::Arc;

use edalink::prelude::*;
use edalink::{LiveEdaConnector, ScriptedRandom};

async fn demo_connector() -> Arc<dyn EdaConnector> {
    let connector = MockEdaConnector::new().with_rng(ScriptedRandom::constant(0.5));
    connector.initialize().await.unwrap();
    Arc::new(connector)
}

#[tokio::test]
async fn test_list_respects_limit_and_total() {
    let connector = demo_connector().await;

    let projects = connector
        .list_projects(ProjectFilter {
            page: Pagination::limit(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(projects.items.len(), 1);
    assert_eq!(projects.total, 2);
    assert!(projects.has_more());

    let components = connector
        .list_components(DEMO_BOARD_ID, ComponentFilter {
            page: Pagination::new(3, 6),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(components.items.len(), 2);
    assert_eq!(components.total, 8);
    assert_eq!(components.limit, 3);

    let bottom = connector
        .list_components(DEMO_BOARD_ID, ComponentFilter {
            layer: Some(Side::Bottom),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(bottom.total, 1);
    assert_eq!(bottom.items[0].designator, "C2");

    let high = connector
        .list_nets(DEMO_BOARD_ID, NetFilter {
            priority: Some(NetPriority::High),
            net_class: Some("differential".to_string()),
            page: Pagination::limit(1),
        })
        .await
        .unwrap();
    assert_eq!(high.items.len(), 1);
    assert_eq!(high.total, 2);
}

#[tokio::test]
async fn test_default_limits() {
    let connector = demo_connector().await;
    let projects = connector.list_projects(ProjectFilter::default()).await.unwrap();
    assert_eq!(projects.limit, 25);
    let nets = connector.list_nets(DEMO_BOARD_ID, NetFilter::default()).await.unwrap();
    assert_eq!(nets.limit, 100);
    assert_eq!(nets.total, 7);
}

#[tokio::test]
async fn test_get_unknown_ids_not_found() {
    let connector = demo_connector().await;
    assert_eq!(connector.get_project("PROJ999").await.unwrap_err().code, ErrorCode::NotFound);
    assert_eq!(connector.get_board("BRD999").await.unwrap_err().code, ErrorCode::NotFound);
    assert_eq!(
        connector.get_component(DEMO_BOARD_ID, "COMP999").await.unwrap_err().code,
        ErrorCode::NotFound
    );
    assert_eq!(
        connector.get_net(DEMO_BOARD_ID, "NET_NOPE").await.unwrap_err().code,
        ErrorCode::NotFound
    );

    let project = connector.get_project(DEMO_PROJECT_ID).await.unwrap();
    assert_eq!(project.name, "Smart Sensor Hub");
    assert_eq!(project.boards[0].id, DEMO_BOARD_ID);
}

#[tokio::test]
async fn test_locked_component_cannot_move() {
    let connector = demo_connector().await;
    let err = connector
        .move_component(DEMO_BOARD_ID, "COMP001", ComponentMove::to(1.0, 1.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let before = connector.get_component(DEMO_BOARD_ID, "COMP004").await.unwrap();
    let moved = connector
        .move_component(DEMO_BOARD_ID, "COMP004", ComponentMove {
            position: Some(Point::new(40.0, 30.0)),
            rotation: Some(90.0),
            layer: None,
        })
        .await
        .unwrap();
    assert_eq!(moved.position, Point::new(40.0, 30.0));
    assert_eq!(moved.rotation, 90.0);
    assert_eq!(moved.layer, before.layer);
    assert_eq!(moved.pins, before.pins);
}

#[tokio::test]
async fn test_drc_run_then_get() {
    let connector = demo_connector().await;
    let err = connector.get_drc_violations(DEMO_BOARD_ID, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let result = connector.run_drc(DEMO_BOARD_ID).await.unwrap();
    let violations = connector.get_drc_violations(DEMO_BOARD_ID, None).await.unwrap();
    assert_eq!(violations, result.violations);

    let errors = connector
        .get_drc_violations(DEMO_BOARD_ID, Some(Severity::Error))
        .await
        .unwrap();
    assert_eq!(errors.len(), result.error_count);
}

#[tokio::test]
async fn test_update_drc_rule() {
    let connector = demo_connector().await;
    let rule = connector
        .update_drc_rule(DEMO_BOARD_ID, "RULE004", RuleUpdate {
            enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!rule.enabled);

    let rules = connector.list_design_rules(DEMO_BOARD_ID).await.unwrap();
    assert_eq!(rules.iter().filter(|r| r.enabled).count(), 4);

    let result = connector.run_drc(DEMO_BOARD_ID).await.unwrap();
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.rules_checked, 4);

    let err = connector
        .update_drc_rule(DEMO_BOARD_ID, "RULE404", RuleUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_clear_routes_all() {
    let connector = demo_connector().await;
    let cleared = connector.clear_routes(DEMO_BOARD_ID, None).await.unwrap();
    assert_eq!(cleared.traces_removed, 5);
    assert_eq!(cleared.vias_removed, 2);

    let board = connector.get_board(DEMO_BOARD_ID).await.unwrap();
    assert!(board.traces.is_empty());
    assert!(board.vias.is_empty());
}

#[tokio::test]
async fn test_clear_routes_filtered() {
    let connector = demo_connector().await;
    let cleared = connector
        .clear_routes(DEMO_BOARD_ID, Some(vec!["NET_GND".to_string()]))
        .await
        .unwrap();
    assert_eq!(cleared.traces_removed, 1);
    assert_eq!(cleared.vias_removed, 1);

    let board = connector.get_board(DEMO_BOARD_ID).await.unwrap();
    assert_eq!(board.traces.len(), 4);
    assert!(board.traces.iter().all(|t| t.net_id != "NET_GND"));
    assert!(board.vias.iter().all(|v| v.net_id != "NET_GND"));
    assert_eq!(board.vias.len(), 1);
}

#[tokio::test]
async fn test_grouped_bom_counts() {
    let connector = demo_connector().await;
    let board = connector.get_board(DEMO_BOARD_ID).await.unwrap();
    let bom = connector.export_bom(DEMO_BOARD_ID, BomOptions::grouped()).await.unwrap();
    assert!(bom.entries.len() <= bom.total_components);
    assert_eq!(bom.total_components, board.components.len());
    let quantity: usize = bom.entries.iter().map(|e| e.quantity).sum();
    assert_eq!(quantity, bom.total_components);
}

#[tokio::test]
async fn test_not_initialized_before_init_and_after_dispose() {
    let connector = MockEdaConnector::new();
    let err = connector.list_projects(ProjectFilter::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);
    let err = connector.run_drc(DEMO_BOARD_ID).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);
    let err = connector.export_gerber(DEMO_BOARD_ID, GerberOptions::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);

    connector.initialize().await.unwrap();
    connector.dispose().await.unwrap();
    let err = connector
        .analyze_signal_integrity(DEMO_BOARD_ID, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);
    let err = connector
        .run_auto_router(DEMO_BOARD_ID, AutoRouteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);
}

#[tokio::test]
async fn test_ids_not_reused_after_delete() {
    let connector = demo_connector().await;
    let first = connector
        .place_component(DEMO_BOARD_ID, PlaceComponent::new("R10", "0603", 1.0, 1.0))
        .await
        .unwrap();
    connector.delete_component(DEMO_BOARD_ID, &first.id).await.unwrap();
    let second = connector
        .place_component(DEMO_BOARD_ID, PlaceComponent::new("R11", "0603", 2.0, 2.0))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.id, "COMP009");
    assert_eq!(second.id, "COMP010");
}

#[tokio::test]
async fn test_delete_component_drops_pin_keys() {
    let connector = demo_connector().await;
    connector.delete_component(DEMO_BOARD_ID, "COMP004").await.unwrap();
    let sda = connector.get_net(DEMO_BOARD_ID, "NET_I2C_SDA").await.unwrap();
    assert_eq!(sda.pins, vec!["COMP001:6"]);
}

#[tokio::test]
async fn test_create_and_update_net() {
    let connector = demo_connector().await;
    let net = connector
        .create_net(DEMO_BOARD_ID, CreateNet {
            pins: vec!["COMP007:1".to_string()],
            ..CreateNet::named("osc in")
        })
        .await
        .unwrap();
    assert_eq!(net.id, "NET_OSC_IN");
    assert_eq!(net.priority, NetPriority::Normal);
    assert_eq!(net.net_class, "signal");

    let updated = connector
        .update_net(DEMO_BOARD_ID, &net.id, NetUpdate {
            priority: Some(NetPriority::High),
            max_length: Some(12.0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.priority, NetPriority::High);
    assert_eq!(updated.max_length, Some(12.0));
    assert_eq!(updated.pins, net.pins);

    let err = connector
        .create_net(DEMO_BOARD_ID, CreateNet::named("osc in"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = connector
        .create_net(DEMO_BOARD_ID, CreateNet {
            pins: vec!["COMP404:1".to_string()],
            ..CreateNet::named("dangling")
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_net_writes_reject_blank_name_and_self_pair() {
    let connector = demo_connector().await;
    let err = connector
        .create_net(DEMO_BOARD_ID, CreateNet::named("   "))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = connector
        .update_net(DEMO_BOARD_ID, "NET_USB_DP", NetUpdate {
            diff_pair: Some("NET_USB_DP".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let net = connector.get_net(DEMO_BOARD_ID, "NET_USB_DP").await.unwrap();
    assert_eq!(net.diff_pair.as_deref(), Some("NET_USB_DN"));
}

#[tokio::test]
async fn test_project_and_board_updates() {
    let connector = demo_connector().await;
    let project = connector
        .update_project(DEMO_PROJECT_ID, ProjectUpdate {
            status: Some(ProjectStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Approved);
    assert_eq!(project.name, "Smart Sensor Hub");

    let board = connector
        .update_board(DEMO_BOARD_ID, BoardUpdate {
            name: Some("Sensor Main Board rev B".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(board.width, 50.0);

    let boards = connector.list_boards(DEMO_PROJECT_ID).await.unwrap();
    assert_eq!(boards.len(), 1);
    let project = connector.get_project(DEMO_PROJECT_ID).await.unwrap();
    assert_eq!(project.boards[0].name, "Sensor Main Board rev B");
}

#[tokio::test]
async fn test_seeded_connectors_reproduce_figures() {
    let config = ConnectorConfig::mock().with_seed(42);
    let a = create_connector(&config);
    let b = create_connector(&config);
    a.initialize().await.unwrap();
    b.initialize().await.unwrap();

    let si_a = a.analyze_signal_integrity(DEMO_BOARD_ID, None).await.unwrap();
    let si_b = b.analyze_signal_integrity(DEMO_BOARD_ID, None).await.unwrap();
    assert_eq!(si_a.results, si_b.results);

    let gerber_a = a.export_gerber(DEMO_BOARD_ID, GerberOptions::default()).await.unwrap();
    let gerber_b = b.export_gerber(DEMO_BOARD_ID, GerberOptions::default()).await.unwrap();
    assert_eq!(gerber_a.files, gerber_b.files);
    assert!(gerber_a
        .files
        .iter()
        .filter(|f| f.file_type == GerberFileType::Copper)
        .all(|f| (50_000..150_000).contains(&f.size)));
}

#[tokio::test]
async fn test_envelope_wire_shape() {
    let connector = demo_connector().await;

    let ok: Envelope<Project> = connector.get_project(DEMO_PROJECT_ID).await.into();
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], "PROJ001");
    assert_eq!(json["data"]["status"], "in_review");

    let failed: Envelope<Board> = connector.get_board("BRD404").await.into();
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "success": false,
            "error": { "code": "NOT_FOUND", "message": "Board BRD404 not found" }
        })
    );
}

#[tokio::test]
async fn test_live_stub_codes() {
    let missing = create_connector(&ConnectorConfig::live(None));
    let err = missing.initialize().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
    let err = missing.list_projects(ProjectFilter::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);

    let live = LiveEdaConnector::new(Some("token".to_string()), None);
    live.initialize().await.unwrap();
    let err = live.export_bom(DEMO_BOARD_ID, BomOptions::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotImplemented);
    assert_eq!(live.mode(), ConnectorMode::Live);
}
