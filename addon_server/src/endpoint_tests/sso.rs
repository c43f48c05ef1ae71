use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use addon_engine::helpers::{sign_sso_message, SsoValidator};
use chrono::{Duration, Utc};

use super::helpers::{salt, TEST_HOMEPAGE};
use crate::{auth::SessionTokenIssuer, config::ServerOptions, data_objects::SsoRequest, routes::sso};

fn configure_sso() -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(SsoValidator::new(salt())))
            .app_data(web::Data::new(SessionTokenIssuer::new(&salt())))
            .app_data(web::Data::new(ServerOptions { app_homepage: TEST_HOMEPAGE.to_string() }))
            .route("/sso", web::post().to(sso));
    }
}

fn sso_form(resource_id: &str, token: String, timestamp: String) -> SsoRequest {
    SsoRequest {
        resource_uuid: resource_id.to_string(),
        token,
        timestamp,
        user_email: "someone@example.com".to_string(),
        user_id: "user-42".to_string(),
    }
}

#[actix_web::test]
async fn a_valid_sso_request_redirects_with_a_session_token() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_sso())).await;
    let ts = Utc::now().timestamp().to_string();
    let token = sign_sso_message(&salt(), &ts, "r-100");
    let req = TestRequest::post().uri("/sso").set_form(sso_form("r-100", token, ts)).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = res.headers().get("Location").unwrap().to_str().unwrap();
    let secret = location
        .strip_prefix(&format!("{TEST_HOMEPAGE}?secret="))
        .expect("redirect should point at the homepage with a secret");
    // The handed-off secret is a session token for the same resource.
    let claims = SessionTokenIssuer::new(&salt()).validate(secret).unwrap();
    assert_eq!(claims.sub, "r-100");
}

#[actix_web::test]
async fn a_stale_timestamp_is_rejected_without_detail() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_sso())).await;
    let ts = (Utc::now() - Duration::minutes(10)).timestamp().to_string();
    let token = sign_sso_message(&salt(), &ts, "r-100");
    let req = TestRequest::post().uri("/sso").set_form(sso_form("r-100", token, ts)).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(res).await;
    assert!(body.is_empty(), "an auth rejection must not explain itself: {body:?}");
}

#[actix_web::test]
async fn a_token_for_a_different_resource_is_rejected() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_sso())).await;
    let ts = Utc::now().timestamp().to_string();
    let token = sign_sso_message(&salt(), &ts, "some-other-resource");
    let req = TestRequest::post().uri("/sso").set_form(sso_form("r-100", token, ts)).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn a_future_timestamp_within_the_window_is_accepted() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_sso())).await;
    let ts = (Utc::now() + Duration::seconds(60)).timestamp().to_string();
    let token = sign_sso_message(&salt(), &ts, "r-100");
    let req = TestRequest::post().uri("/sso").set_form(sso_form("r-100", token, ts)).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[actix_web::test]
async fn garbage_inputs_are_a_bad_request_not_a_rejection() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_sso())).await;
    let req = TestRequest::post()
        .uri("/sso")
        .set_form(sso_form("r-100", "not-hex-at-all".to_string(), Utc::now().timestamp().to_string()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let ts = Utc::now().timestamp().to_string();
    let token = sign_sso_message(&salt(), &ts, "r-100");
    let req = TestRequest::post().uri("/sso").set_form(sso_form("r-100", token, "yesterday".to_string())).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
