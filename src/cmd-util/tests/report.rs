use axum::http::StatusCode;
use cmd_util::constants::WANT_REPORT_ERROR;
use cmd_util::{
    format_error, marshall_error, maybe_report_error, report_error, upload_error, ReportError,
    TracedError, Version, WrapErr,
};
use serde_json::Value;
use std::collections::HashMap;
use std::io;

mod common;
use common::collector::Collector;

fn payload() -> Vec<u8> {
    let err = TracedError::wrap(TracedError::new("TestUploadError 1"), "TestUploadError 2");
    let message = format_error(Some(&err)).unwrap();
    marshall_error(&message, "default", Version::current_str()).unwrap()
}

fn opted_in() -> HashMap<String, bool> {
    HashMap::from([(WANT_REPORT_ERROR.to_string(), true)])
}

#[test]
fn upload_error_accepted() {
    let collector = Collector::launch(StatusCode::OK, "http test");
    let payload = payload();

    upload_error(&payload, &collector.url).unwrap();

    let received = collector.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(received[0].body, payload);
}

#[test]
fn upload_error_rejected() {
    let collector = Collector::launch(StatusCode::BAD_REQUEST, "failed to write report");

    match upload_error(&payload(), &collector.url) {
        Err(ReportError::RemoteRejection { status, body }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body, "failed to write report");
        }
        other => panic!("expected RemoteRejection, got {:?}", other),
    }
    assert_eq!(collector.received().len(), 1);
}

#[test]
fn upload_error_server_error_is_rejection() {
    let collector = Collector::launch(StatusCode::INTERNAL_SERVER_ERROR, "try later");
    let result = upload_error(&payload(), &collector.url);
    assert!(matches!(result, Err(ReportError::RemoteRejection { .. })));
}

#[test]
fn upload_error_unreachable_is_transport() {
    // nothing listens on a port that was just released
    let url = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}/report", listener.local_addr().unwrap())
    };
    let result = upload_error(&payload(), &url);
    assert!(matches!(result, Err(ReportError::Transport(_))));
}

#[test]
fn report_error_end_to_end() {
    let collector = Collector::launch(StatusCode::OK, "http test");
    let err = TracedError::new("TestError 1");

    report_error(&err, &collector.url).unwrap();

    let received = collector.received();
    assert_eq!(received.len(), 1);
    let json: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(json["message"].as_str().unwrap().starts_with("TestError 1\n\t"));
    assert_eq!(json["exit-code"], "default");
    assert_eq!(json["version"], Version::current_str());
}

#[test]
fn report_error_wrapped_io_error() {
    let collector = Collector::launch(StatusCode::OK, "http test");
    let result: Result<(), io::Error> = Err(io::Error::other("permission denied"));
    let err = result.wrap_err("writing cache").unwrap_err();

    report_error(&err, &collector.url).unwrap();

    let json: Value = serde_json::from_slice(&collector.received()[0].body).unwrap();
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("writing cache: permission denied"));
}

#[test]
fn report_error_stops_at_rejection() {
    let collector = Collector::launch(StatusCode::BAD_REQUEST, "nope");
    let err = TracedError::new("TestError 1");
    let result = report_error(&err, &collector.url);
    assert!(matches!(result, Err(ReportError::RemoteRejection { .. })));
}

#[test]
fn maybe_report_error_delivers_when_opted_in() {
    let collector = Collector::launch(StatusCode::OK, "http test");
    let err = anyhow::Error::new(TracedError::new("disk full")).context("saving state");

    assert!(maybe_report_error(&err, &opted_in(), &collector.url));

    let json: Value = serde_json::from_slice(&collector.received()[0].body).unwrap();
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("saving state: disk full"));
}

#[test]
fn maybe_report_error_swallows_failures() {
    let collector = Collector::launch(StatusCode::BAD_REQUEST, "nope");
    let err = TracedError::new("boom");
    assert!(!maybe_report_error(&err, &opted_in(), &collector.url));
}
