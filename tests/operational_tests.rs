//! Versioning, configuration reload and health endpoints

mod common;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use codecamp::prelude::*;
use common::*;
use serde_json::Value;
use std::io::Write;

const VERSIONS_HEADER: &str = "api-supported-versions";

fn write_config(file: &mut tempfile::NamedTempFile, yaml: &str) {
    let handle = file.as_file_mut();
    handle.set_len(0).unwrap();
    std::io::Seek::rewind(handle).unwrap();
    handle.write_all(yaml.as_bytes()).unwrap();
    handle.flush().unwrap();
}

fn server_with_config(config: ConfigHandle) -> TestServer {
    let router = ServerBuilder::new()
        .with_config(config)
        .with_provider(InMemoryStore::seeded())
        .build()
        .unwrap();
    TestServer::new(router)
}

#[tokio::test]
async fn test_default_version_is_assumed() {
    let server = seeded_server();

    let response = server.get("/api/camps").await;
    response.assert_status_ok();
    assert_eq!(response.header(VERSIONS_HEADER), "1.0, 1.1, 2.0");
}

#[tokio::test]
async fn test_supported_version_is_accepted() {
    let server = seeded_server();

    server
        .get("/api/camps")
        .add_query_param("ver", "2.0")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_unsupported_version_is_rejected() {
    let server = seeded_server();

    let response = server
        .get("/api/camps/ATL2018")
        .add_query_param("ver", "3.0")
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.header(VERSIONS_HEADER), "1.0, 1.1, 2.0");
}

#[tokio::test]
async fn test_malformed_version_is_rejected() {
    let server = seeded_server();

    server
        .get("/api/camps")
        .add_query_param("ver", "latest")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_health_is_unversioned() {
    let server = seeded_server();

    let response = server.get("/health").add_query_param("ver", "9.9").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "codecamp");

    server.get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn test_reload_without_file_keeps_defaults() {
    let server = seeded_server();

    server
        .method(Method::OPTIONS, "/api/operational/reloadconfig")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_reload_picks_up_file_changes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_config(
        &mut file,
        "api:\n  supported_versions: [\"1.0\", \"1.1\", \"2.0\"]\n",
    );
    let server = server_with_config(ConfigHandle::from_file(file.path()).unwrap());

    server
        .get("/api/camps")
        .add_query_param("ver", "2.0")
        .await
        .assert_status_ok();

    write_config(
        &mut file,
        "api:\n  default_version: \"1.0\"\n  supported_versions: [\"1.0\", \"1.1\"]\n",
    );
    server
        .method(Method::OPTIONS, "/api/operational/reloadconfig")
        .await
        .assert_status_ok();

    let response = server
        .get("/api/camps")
        .add_query_param("ver", "2.0")
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.header(VERSIONS_HEADER), "1.0, 1.1");
}

#[tokio::test]
async fn test_failed_reload_keeps_running_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_config(&mut file, "server:\n  port: 5000\n");
    let server = server_with_config(ConfigHandle::from_file(file.path()).unwrap());

    write_config(&mut file, "server:\n  port: not-a-number\n");
    let response = server
        .method(Method::OPTIONS, "/api/operational/reloadconfig")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["message"],
        "Failed to reload configuration"
    );

    server.get("/api/camps").await.assert_status_ok();
}
