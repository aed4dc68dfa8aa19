use axum::body::Body;
use axum::http::{Method, StatusCode};
use cabinet_core::application::commands::mahakim::SyncRequest;
use cabinet_core::domain::cases::AffaireStatut;
use cabinet_core::domain::record::RecordRepository;
use serde_json::json;

mod support;

use support::{AffaireBuilder, PortalScript, TestApp, authed, body_json, date};

const PORTAL_ANSWER: &str = r#"
<div id="resultat">
  <table>
    <tr><td>الحالة</td><td>في طور المداولة</td></tr>
    <tr><td>الجلسة المقبلة</td><td>12/09/2024</td></tr>
    <tr><td>القاضي المقرر</td><td>ذ. محمد العلوي</td></tr>
  </table>
</div>"#;

async fn insert_affaire(app: &TestApp, builder: AffaireBuilder) -> i64 {
    app.affaires
        .insert(builder.build(), app.clock_now())
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn successful_sync_stores_extracted_fields() {
    let app = TestApp::new();
    let id = insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1234/8201/2024")).await;
    app.browser
        .set_script(PortalScript::Answer(PORTAL_ANSWER.into()));

    let report = app
        .services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);

    assert_eq!(
        app.browser.filled(),
        vec![
            ("input[name='numero']".to_string(), "1234".to_string()),
            ("input[name='code']".to_string(), "8201".to_string()),
            ("input[name='annee']".to_string(), "2024".to_string()),
        ]
    );

    let rows = app.sync_results.rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.affaire_id, id);
    assert!(row.success);
    assert_eq!(row.numero_dossier, "1234/8201/2024");
    assert_eq!(row.statut.as_deref(), Some("في طور المداولة"));
    assert_eq!(row.prochaine_audience, Some(date(2024, 9, 12)));
    assert_eq!(row.juge.as_deref(), Some("ذ. محمد العلوي"));
    assert!(row.raw_html.as_deref().unwrap().contains("resultat"));
}

#[tokio::test]
async fn timeout_is_stored_as_failed_attempt() {
    let app = TestApp::new();
    insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1234/8201/2024")).await;
    app.browser.set_script(PortalScript::Timeout);

    let report = app
        .services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.failed, 1);

    let row = &app.sync_results.rows()[0];
    assert!(!row.success);
    assert!(row.raw_html.is_none());
    assert!(row.error_message.as_deref().unwrap().contains("انتهت مهلة"));
}

#[tokio::test]
async fn batch_continues_past_failures_and_skips_unusable_affaires() {
    let app = TestApp::new();
    insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1/2/2024")).await;
    insert_affaire(&app, AffaireBuilder::new("CAB-2").numero("3/4/2023")).await;
    // malformed numbers can only come from older rows; they are skipped
    insert_affaire(&app, AffaireBuilder::new("CAB-3").numero("not-a-number")).await;
    insert_affaire(
        &app,
        AffaireBuilder::new("CAB-4")
            .numero("5/6/2022")
            .statut(AffaireStatut::Cloturee),
    )
    .await;
    insert_affaire(&app, AffaireBuilder::new("CAB-5")).await;
    app.browser.set_script(PortalScript::DriverDown);

    let report = app
        .services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(app.sync_results.rows().len(), 2);
}

#[tokio::test]
async fn limit_and_single_affaire_selection() {
    let app = TestApp::new();
    insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1/2/2024")).await;
    let second = insert_affaire(&app, AffaireBuilder::new("CAB-2").numero("3/4/2023")).await;
    app.browser
        .set_script(PortalScript::Answer(PORTAL_ANSWER.into()));

    let limited = app
        .services
        .mahakim
        .sync_batch(SyncRequest {
            limit: Some(1),
            ..SyncRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.attempted, 1);

    let single = app
        .services
        .mahakim
        .sync_batch(SyncRequest {
            affaire_id: Some(second),
            ..SyncRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(single.attempted, 1);
    assert_eq!(app.sync_results.rows().last().unwrap().affaire_id, second);
    assert_eq!(app.browser.launches(), 2);

    let missing = app
        .services
        .mahakim
        .sync_batch(SyncRequest {
            affaire_id: Some(999),
            ..SyncRequest::default()
        })
        .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn storage_failure_on_one_affaire_does_not_stop_the_batch() {
    let app = TestApp::new();
    insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1/2/2024")).await;
    let second = insert_affaire(&app, AffaireBuilder::new("CAB-2").numero("3/4/2023")).await;
    app.browser
        .set_script(PortalScript::Answer(PORTAL_ANSWER.into()));
    app.sync_results.fail_next_inserts(1);

    let report = app
        .services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(app.browser.launches(), 2);

    let rows = app.sync_results.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].affaire_id, second);
}

#[tokio::test]
async fn limit_counts_only_affaires_with_usable_numbers() {
    let app = TestApp::new();
    insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("not-a-number")).await;
    let valid = insert_affaire(&app, AffaireBuilder::new("CAB-2").numero("3/4/2023")).await;
    insert_affaire(&app, AffaireBuilder::new("CAB-3").numero("5/6/2022")).await;
    app.browser
        .set_script(PortalScript::Answer(PORTAL_ANSWER.into()));

    let report = app
        .services
        .mahakim
        .sync_batch(SyncRequest {
            limit: Some(1),
            ..SyncRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped, 1);

    let rows = app.sync_results.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].affaire_id, valid);
}

#[tokio::test]
async fn sync_history_is_served_over_http() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let id = insert_affaire(&app, AffaireBuilder::new("CAB-1").numero("1234/8201/2024")).await;
    app.browser.set_script(PortalScript::Timeout);
    app.services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();
    app.browser
        .set_script(PortalScript::Answer(PORTAL_ANSWER.into()));
    app.services
        .mahakim
        .sync_batch(SyncRequest::default())
        .await
        .unwrap();

    let resp = app
        .send(
            authed(Method::GET, &format!("/api/v1/affaires/{id}/sync-results"), &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["success"], json!(true), "newest first");
    assert_eq!(items[1]["success"], json!(false));
    assert!(items[0].get("raw_html").is_none());

    let unknown = app
        .send(
            authed(Method::GET, "/api/v1/affaires/999/sync-results", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
