//! Tests for the basic-auth gate in front of the marketplace webhook scope.

use actix_web::{http::StatusCode, test, test::TestRequest, web, App, HttpResponse};
use aog_common::Secret;

use crate::middleware::BasicAuthMiddlewareFactory;

const USERNAME: &str = "orca-crm";
const PASSWORD: &str = "s3cret";

async fn protected() -> HttpResponse {
    HttpResponse::Ok().body("made it")
}

fn configure_gate() -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let scope = web::scope("/marketplace")
            .wrap(BasicAuthMiddlewareFactory::new(USERNAME, Secret::new(PASSWORD.to_string())))
            .route("/ping", web::get().to(protected));
        cfg.service(scope);
    }
}

fn basic_header(user: &str, password: &str) -> (&'static str, String) {
    ("Authorization", format!("Basic {}", base64::encode(format!("{user}:{password}"))))
}

#[actix_web::test]
async fn requests_with_the_registered_credentials_pass() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_gate())).await;
    let req = TestRequest::get().uri("/marketplace/ping").insert_header(basic_header(USERNAME, PASSWORD)).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn requests_without_credentials_are_rejected() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_gate())).await;
    let req = TestRequest::get().uri("/marketplace/ping").to_request();
    let res = test::try_call_service(&app, req).await;
    let err = res.expect_err("the gate should reject the request");
    assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_password_and_wrong_username_fail_alike() {
    let _ = env_logger::try_init().ok();
    let app = test::init_service(App::new().configure(configure_gate())).await;
    for (user, password) in [(USERNAME, "wrong"), ("imposter", PASSWORD)] {
        let req =
            TestRequest::get().uri("/marketplace/ping").insert_header(basic_header(user, password)).to_request();
        let err = test::try_call_service(&app, req).await.expect_err("the gate should reject the request");
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
