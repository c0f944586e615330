//! HTTP routing: URI in, status code and body out.

use crate::mock_hw::{Bench, MockDelay, RecordingSink, TestService};

use actuator_node::adapters::http::{CONTENT_JSON, CONTENT_TEXT, HttpResponse, route};

fn ready() -> (TestService, RecordingSink) {
    let service = Bench::new().service();
    let mut sink = RecordingSink::new();
    service.begin(&mut MockDelay::default(), &mut sink);
    (service, sink)
}

fn get(service: &TestService, sink: &mut RecordingSink, uri: &str) -> HttpResponse {
    route(service, uri, sink)
}

#[test]
fn servo_angle_is_echoed_clamped() {
    let (service, mut sink) = ready();
    let resp = get(&service, &mut sink, "/servo?angle=200");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.content_type, CONTENT_JSON);
    assert_eq!(resp.body, r#"{"ok":true,"angle":180,"clamped":true}"#);
}

#[test]
fn motor_speed_and_actions() {
    let (service, mut sink) = ready();
    assert_eq!(
        get(&service, &mut sink, "/motor?speed=-100").body,
        r#"{"ok":true,"speed":-100}"#
    );
    assert_eq!(
        get(&service, &mut sink, "/motor?action=disable").body,
        r#"{"ok":true,"action":"disable"}"#
    );
    assert_eq!(service.speed(), 0);
}

#[test]
fn servo_subroutes() {
    let (service, mut sink) = ready();
    assert_eq!(
        get(&service, &mut sink, "/servo/detach").body,
        r#"{"ok":true,"action":"detach"}"#
    );
    assert!(!service.status().servo.attached);
    assert_eq!(
        get(&service, &mut sink, "/servo/center/").body,
        r#"{"ok":true,"angle":90}"#
    );
}

#[test]
fn status_reports_both_devices() {
    let (service, mut sink) = ready();
    get(&service, &mut sink, "/motor?speed=12");

    let resp = get(&service, &mut sink, "/status");
    assert_eq!(resp.status, 200);
    let json: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(json["servo"]["angle"], 90);
    assert_eq!(json["servo"]["attached"], true);
    assert_eq!(json["motor"]["speed"], 12);
    assert_eq!(json["motor"]["direction"], "forward");
    assert_eq!(json["motor"]["enabled"], true);
}

#[test]
fn bad_parameters_are_400() {
    let (service, mut sink) = ready();

    let resp = get(&service, &mut sink, "/motor?speed=fast");
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, r#"{"ok":false,"error":"parameter 'speed' is not an integer"}"#);

    let resp = get(&service, &mut sink, "/motor?action=brake");
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, r#"{"ok":false,"error":"unknown action"}"#);

    let resp = get(&service, &mut sink, "/servo");
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, r#"{"ok":false,"error":"missing parameter 'angle'"}"#);
}

#[test]
fn unknown_path_is_404() {
    let (service, mut sink) = ready();
    let resp = get(&service, &mut sink, "/led?on=1");
    assert_eq!(resp.status, 404);
    assert_eq!(resp.content_type, CONTENT_TEXT);
    assert_eq!(resp.body, "Not found");
}

#[test]
fn uninitialized_device_is_503() {
    let service = Bench::new().service();
    let mut sink = RecordingSink::new();

    let resp = get(&service, &mut sink, "/servo?angle=10");
    assert_eq!(resp.status, 503);
    assert_eq!(resp.body, r#"{"ok":false,"error":"not initialized"}"#);

    let json: serde_json::Value =
        serde_json::from_str(&get(&service, &mut sink, "/status").body).unwrap();
    assert_eq!(json["servo"]["ready"], false);
    assert_eq!(json["motor"]["ready"], false);
}
