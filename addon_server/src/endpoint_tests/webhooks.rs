use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use addon_engine::{
    db_types::AccountStatus,
    traits::{TokenExchangeError, TokenStore},
    AccountApi,
    OAuthTokenBroker,
    SqliteDatabase,
};

use super::helpers::{new_db, provisioning_request, seed_account, token_grant, MockExchange};
use crate::{
    data_objects::{Notification, NotificationEnvelope, PlanChangeRequest, ProvisioningResponse},
    routes::{deprovision, notifications, plan_change, provision},
};

fn configure_webhooks(db: SqliteDatabase, exchange: MockExchange) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AccountApi::new(db.clone())))
            .app_data(web::Data::new(OAuthTokenBroker::new(db, exchange)))
            .route("/resources", web::post().to(provision::<SqliteDatabase, MockExchange>))
            .route("/resources/{resource_uuid}", web::delete().to(deprovision::<SqliteDatabase>))
            .route("/resources/{resource_uuid}", web::put().to(plan_change::<SqliteDatabase>))
            .route("/notifications", web::post().to(notifications::<SqliteDatabase>));
    }
}

#[actix_web::test]
async fn provisioning_creates_an_account_and_stores_the_token_pair() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let mut exchange = MockExchange::new();
    exchange
        .expect_exchange_auth_code()
        .withf(|code| code == "c0ffee")
        .times(1)
        .returning(|_| Ok(token_grant("A1", "R1")));
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), exchange))).await;

    let req = TestRequest::post().uri("/resources").set_json(provisioning_request("r-100")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ProvisioningResponse = test::read_body_json(res).await;
    assert_eq!(body.id, "r-100");
    assert_eq!(body.config.license_key.len(), 32);

    let record = db.fetch_token("r-100").await.unwrap().expect("the code exchange result should be stored");
    assert_eq!(record.access_token, "A1");
    assert_eq!(record.refresh_token, "R1");
}

#[actix_web::test]
async fn a_failed_code_exchange_does_not_fail_provisioning() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let mut exchange = MockExchange::new();
    exchange
        .expect_exchange_auth_code()
        .times(1)
        .returning(|_| Err(TokenExchangeError::Transport("connection refused".to_string())));
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), exchange))).await;

    let req = TestRequest::post().uri("/resources").set_json(provisioning_request("r-100")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(db.fetch_token("r-100").await.unwrap().is_none());
}

#[actix_web::test]
async fn provisioning_the_same_resource_twice_is_unprocessable() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_webhooks(db, MockExchange::new()))).await;

    let req = TestRequest::post().uri("/resources").set_json(provisioning_request("r-100")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn deprovisioning_marks_the_account_and_keeps_the_record() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), MockExchange::new()))).await;

    let req = TestRequest::delete().uri("/resources/r-100").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let account = AccountApi::new(db).account("r-100").await.unwrap().expect("record should survive deprovisioning");
    assert_eq!(account.status, AccountStatus::Deprovisioned);
}

#[actix_web::test]
async fn deprovisioning_an_unknown_resource_is_not_found() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let app = test::init_service(App::new().configure(configure_webhooks(db, MockExchange::new()))).await;
    let req = TestRequest::delete().uri("/resources/never-heard-of-it").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn plan_changes_replace_the_plan_slug() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), MockExchange::new()))).await;

    let body = PlanChangeRequest { plan_slug: "pro".to_string() };
    let req = TestRequest::put().uri("/resources/r-100").set_json(body).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let account = AccountApi::new(db).account("r-100").await.unwrap().unwrap();
    assert_eq!(account.plan_slug, "pro");
}

#[actix_web::test]
async fn suspension_notifications_flip_status_and_leave_an_audit_trail() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    seed_account(&db, "r-200").await;
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), MockExchange::new()))).await;

    let envelope = NotificationEnvelope {
        kind: Notification::SUSPENDED.to_string(),
        created_at: 1724668800,
        payload: r#"{"resources_uuids": ["r-100", "r-200"]}"#.to_string(),
    };
    let req = TestRequest::post().uri("/notifications").set_json(envelope).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let api = AccountApi::new(db);
    for id in ["r-100", "r-200"] {
        let account = api.account(id).await.unwrap().unwrap();
        assert_eq!(account.status, AccountStatus::Suspended, "{id} should be suspended");
        let activities = api.activities(Some(id)).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].kind, Notification::SUSPENDED);
    }
}

#[actix_web::test]
async fn reactivation_restores_a_suspended_account() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let api = AccountApi::new(db.clone());
    api.set_account_status("r-100", AccountStatus::Suspended).await.unwrap();
    let app = test::init_service(App::new().configure(configure_webhooks(db, MockExchange::new()))).await;

    let envelope = NotificationEnvelope {
        kind: Notification::REACTIVATED.to_string(),
        created_at: 1724668800,
        payload: r#"{"resources_uuids": ["r-100"]}"#.to_string(),
    };
    let req = TestRequest::post().uri("/notifications").set_json(envelope).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(api.account("r-100").await.unwrap().unwrap().status, AccountStatus::Active);
}

#[actix_web::test]
async fn unrecognized_notification_types_are_unprocessable() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let app = test::init_service(App::new().configure(configure_webhooks(db, MockExchange::new()))).await;
    let envelope = NotificationEnvelope {
        kind: "resources.migrated".to_string(),
        created_at: 1724668800,
        payload: "{}".to_string(),
    };
    let req = TestRequest::post().uri("/notifications").set_json(envelope).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn a_storage_failure_during_notification_processing_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_webhooks(db.clone(), MockExchange::new()))).await;
    // Take the database away from under the handler.
    db.pool().close().await;

    let envelope = NotificationEnvelope {
        kind: Notification::SUSPENDED.to_string(),
        created_at: 1724668800,
        payload: r#"{"resources_uuids": ["r-100"]}"#.to_string(),
    };
    let req = TestRequest::post().uri("/notifications").set_json(envelope).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains("An internal error occurred."));
    assert!(!body.contains("pool"), "storage detail must not leak to the caller: {body}");
}

#[actix_web::test]
async fn notifications_for_unknown_resources_are_unprocessable() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let app = test::init_service(App::new().configure(configure_webhooks(db, MockExchange::new()))).await;
    let envelope = NotificationEnvelope {
        kind: Notification::SUSPENDED.to_string(),
        created_at: 1724668800,
        payload: r#"{"resources_uuids": ["never-provisioned"]}"#.to_string(),
    };
    let req = TestRequest::post().uri("/notifications").set_json(envelope).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
