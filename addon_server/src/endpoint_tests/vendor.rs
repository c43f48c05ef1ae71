use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use addon_engine::{
    db_types::{Activity, NewActivity, OAuthTokenRecord},
    traits::TokenStore,
    AccountApi,
    OAuthTokenBroker,
    SqliteDatabase,
};
use chrono::{Duration, Utc};

use super::helpers::{new_db, salt, seed_account, token_grant, MockExchange};
use crate::{
    auth::SessionTokenIssuer,
    data_objects::{AuthorizeRequest, AuthorizeResponse},
    routes::{activities, authorize},
};

fn configure_vendor(db: SqliteDatabase, exchange: MockExchange) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AccountApi::new(db.clone())))
            .app_data(web::Data::new(OAuthTokenBroker::new(db, exchange)))
            .app_data(web::Data::new(SessionTokenIssuer::new(&salt())))
            .route("/authorize", web::post().to(authorize::<SqliteDatabase, MockExchange>))
            .route("/activities", web::get().to(activities::<SqliteDatabase>));
    }
}

async fn store_valid_token(db: &SqliteDatabase, resource_id: &str) {
    let record = OAuthTokenRecord::from_grant(resource_id, token_grant("A1", "R1"), Utc::now());
    db.upsert_token(&record).await.unwrap();
}

#[actix_web::test]
async fn a_valid_session_token_unlocks_the_dashboard_data() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    store_valid_token(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_vendor(db, MockExchange::new()))).await;

    let secret = SessionTokenIssuer::new(&salt()).issue("r-100").unwrap();
    let req = TestRequest::post().uri("/authorize").set_json(AuthorizeRequest { secret }).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: AuthorizeResponse = test::read_body_json(res).await;
    assert_eq!(body.resource_uuid, "r-100");
    assert_eq!(body.access_token, "A1");
    assert_eq!(body.app_slug, "orca-crm");
    assert_eq!(body.plan_slug, "starter");
}

#[actix_web::test]
async fn an_expired_access_token_is_renewed_before_answering() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    // The stored access token expired an hour ago.
    let record = OAuthTokenRecord::from_grant("r-100", token_grant("A1", "R1"), Utc::now() - Duration::hours(9));
    db.upsert_token(&record).await.unwrap();
    let mut exchange = MockExchange::new();
    exchange
        .expect_refresh_token()
        .withf(|refresh| refresh == "R1")
        .times(1)
        .returning(|_| Ok(token_grant("A2", "R2")));
    let app = test::init_service(App::new().configure(configure_vendor(db.clone(), exchange))).await;

    let secret = SessionTokenIssuer::new(&salt()).issue("r-100").unwrap();
    let req = TestRequest::post().uri("/authorize").set_json(AuthorizeRequest { secret }).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: AuthorizeResponse = test::read_body_json(res).await;
    assert_eq!(body.access_token, "A2");
    // The rotated pair was persisted.
    let stored = db.fetch_token("r-100").await.unwrap().unwrap();
    assert_eq!(stored.refresh_token, "R2");
}

#[actix_web::test]
async fn a_forged_session_token_is_rejected_without_detail() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    let app = test::init_service(App::new().configure(configure_vendor(db, MockExchange::new()))).await;

    let other_salt = aog_common::Secret::new("a-different-salt".to_string());
    let secret = SessionTokenIssuer::new(&other_salt).issue("r-100").unwrap();
    let req = TestRequest::post().uri("/authorize").set_json(AuthorizeRequest { secret }).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(res).await;
    assert!(body.is_empty(), "an auth rejection must not explain itself: {body:?}");
}

#[actix_web::test]
async fn a_session_token_for_a_missing_account_is_not_found() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    let app = test::init_service(App::new().configure(configure_vendor(db, MockExchange::new()))).await;
    let secret = SessionTokenIssuer::new(&salt()).issue("r-100").unwrap();
    let req = TestRequest::post().uri("/authorize").set_json(AuthorizeRequest { secret }).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn activities_can_be_filtered_by_resource() {
    let _ = env_logger::try_init().ok();
    let db = new_db().await;
    seed_account(&db, "r-100").await;
    seed_account(&db, "r-200").await;
    let api = AccountApi::new(db.clone());
    api.record_activity(&NewActivity::new("r-100", "resources.suspended", "{}")).await.unwrap();
    api.record_activity(&NewActivity::new("r-200", "resources.updated", "{}")).await.unwrap();
    let app = test::init_service(App::new().configure(configure_vendor(db, MockExchange::new()))).await;

    let req = TestRequest::get().uri("/activities?resource_uuid=r-100").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Activity> = test::read_body_json(res).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].resource_id, "r-100");

    let req = TestRequest::get().uri("/activities").to_request();
    let res = test::call_service(&app, req).await;
    let body: Vec<Activity> = test::read_body_json(res).await;
    assert_eq!(body.len(), 2);
}
