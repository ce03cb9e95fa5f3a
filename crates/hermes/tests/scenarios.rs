//! End-to-end request scenarios through a configured controller.

use bytes::Bytes;
use hermes::prelude::*;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Profile {
    name: String,
    #[serde(rename = "json-image", alias = "form-image")]
    image: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Employee {
    position: String,
}

fn request(
    method: http::Method,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(Bytes::from_static(body.as_bytes())).unwrap()
}

fn json_post(uri: &str, body: &'static str) -> Request {
    request(http::Method::POST, uri, Some("application/json"), body)
}

fn body_json(sink: &ResponseRecorder) -> Value {
    serde_json::from_str(sink.body_str().unwrap()).unwrap()
}

fn ascii_image(profile: &Profile) -> Result<(), BoxError> {
    if profile.image.is_ascii() {
        Ok(())
    } else {
        Err("image must only contain ASCII characters".into())
    }
}

#[test]
fn get_without_query_or_body_renders_empty_object() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = request(http::Method::GET, "/", None, "");
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    controller
        .handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default())
        .unwrap()
        .render(Ok::<_, BoxError>(json!({})));

    assert_eq!(profile, Profile::default());
    assert_eq!(sink.status(), StatusCode::OK);
    assert_eq!(sink.body_str(), Some("{}"));
    assert_eq!(
        sink.header("content-type"),
        Some("application/json; charset=utf-8")
    );
}

#[test]
fn json_post_fills_input() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = json_post("/", r#"{"json-image": "bar3"}"#);
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    controller
        .handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default())
        .unwrap()
        .render(Ok::<_, BoxError>(profile.clone()));

    assert_eq!(profile.image, "bar3");
    assert_eq!(body_json(&sink), json!({"name": "", "json-image": "bar3"}));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Badge {
    holder: String,
    #[serde(rename = "json-image", alias = "form-image")]
    image: String,
    active: bool,
}

#[test]
fn partial_body_fills_input_without_container_default() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = json_post("/?holder=ada&active=true", r#"{"json-image": "bar3", "active": false}"#);
    let mut sink = ResponseRecorder::new();
    let mut badge = Badge {
        holder: String::new(),
        image: String::new(),
        active: false,
    };

    let responder =
        controller.handle(&mut sink, &request, Some(&mut badge), ErrorEnvelope::default());

    assert!(responder.is_some(), "status {}", sink.status());
    assert_eq!(
        badge,
        Badge {
            holder: "ada".into(),
            image: "bar3".into(),
            active: false,
        }
    );
}

#[test]
fn query_after_body_overwrites_body_fields() {
    let mut config = HermesConfig::default();
    config.ingress.query = QueryPlacement::AfterBody;
    let controller = controller_from_config(&config, None).unwrap();
    let request = json_post("/?form-image=overwritten", r#"{"json-image": "bar"}"#);
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_some());
    assert_eq!(profile.image, "overwritten");
}

#[test]
fn body_after_query_overwrites_query_fields() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = json_post("/?name=ada&form-image=overwritten", r#"{"json-image": "bar"}"#);
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_some());
    assert_eq!(profile.name, "ada");
    assert_eq!(profile.image, "bar");
}

#[test]
fn validator_failure_renders_400_with_message() {
    let validator: Arc<dyn Validator> = Arc::new(TypedValidator::new(ascii_image));
    let controller = controller_from_config(&HermesConfig::default(), Some(validator)).unwrap();
    let request = json_post("/", r#"{"json-image": "Ïd"}"#);
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_none());
    assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(&sink),
        json!({"message": "image must only contain ASCII characters"})
    );
}

#[test]
fn malformed_json_renders_parser_message() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let body = r#"{"position": "director}"#;
    let request = json_post("/", body);
    let mut sink = ResponseRecorder::new();
    let mut employee = Employee::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut employee), ErrorEnvelope::default());

    assert!(responder.is_none());
    assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
    let expected = serde_json::from_str::<Value>(body).unwrap_err().to_string();
    assert_eq!(body_json(&sink), json!({ "message": expected }));
}

#[test]
fn unsupported_content_type_renders_400() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = request(http::Method::POST, "/", Some("text/csv"), "a,b");
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_none());
    assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(&sink),
        json!({"message": "unsupported media type: text/csv"})
    );
}

#[test]
fn form_body_decodes_through_configured_decoder() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = request(
        http::Method::POST,
        "/",
        Some("application/x-www-form-urlencoded"),
        "name=ada&form-image=lovelace",
    );
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_some());
    assert_eq!(profile.name, "ada");
    assert_eq!(profile.image, "lovelace");
}

#[test]
fn oversized_body_is_rejected() {
    let mut config = HermesConfig::default();
    config.ingress.max_body_bytes = 16;
    let controller = controller_from_config(&config, None).unwrap();
    let request = json_post("/", r#"{"json-image": "far too long for the limit"}"#);
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());

    assert!(responder.is_none());
    assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
    let message = body_json(&sink)["message"].as_str().unwrap().to_string();
    assert!(message.contains("exceeds the limit of 16 bytes"), "{message}");
    assert_eq!(profile, Profile::default());
}

#[test]
fn application_error_renders_500() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = request(http::Method::GET, "/", None, "");
    let mut sink = ResponseRecorder::new();

    controller
        .handle(&mut sink, &request, None, ErrorEnvelope::default())
        .unwrap()
        .render(Err::<(), _>(anyhow::anyhow!("database unavailable")));

    assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(&sink), json!({"message": "database unavailable"}));
}

#[test]
fn application_error_status_hint_is_honoured() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = request(http::Method::GET, "/", None, "");
    let mut sink = ResponseRecorder::new();

    controller
        .handle(&mut sink, &request, None, ErrorEnvelope::default())
        .unwrap()
        .render(Err::<(), _>(StatusError::new(
            StatusCode::NOT_FOUND,
            "no such profile",
        )));

    assert_eq!(sink.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&sink), json!({"message": "no such profile"}));
}

#[test]
fn accept_header_selects_form_encoding() {
    let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
    let request = http::Request::get("/")
        .header(ACCEPT, "application/x-www-form-urlencoded")
        .body(Bytes::new())
        .unwrap();
    let mut sink = ResponseRecorder::new();

    controller
        .handle(&mut sink, &request, None, ErrorEnvelope::default())
        .unwrap()
        .render(Ok::<_, BoxError>(json!({"foo": "bar", "bar": "foo"})));

    assert_eq!(sink.status(), StatusCode::OK);
    assert_eq!(sink.body_str(), Some("bar=foo&foo=bar"));
    assert_eq!(
        sink.header("content-type"),
        Some("application/x-www-form-urlencoded; charset=utf-8")
    );
}

#[test]
fn unencodable_output_renders_fallback() {
    let mut config = HermesConfig::default();
    config.egress.fallback_body = "something went wrong".to_string();
    let controller = controller_from_config(&config, None).unwrap();
    let request = http::Request::get("/")
        .header(ACCEPT, "application/x-www-form-urlencoded")
        .body(Bytes::new())
        .unwrap();
    let mut sink = ResponseRecorder::new();

    controller
        .handle(&mut sink, &request, None, ErrorEnvelope::default())
        .unwrap()
        .render(Ok::<_, BoxError>(json!(["not", "a", "form"])));

    assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(sink.header("content-type"), Some("text/plain; charset=utf-8"));
    assert_eq!(sink.body_str(), Some("something went wrong"));
}

#[test]
fn custom_step_runs_after_configured_steps() {
    let controller = controller_builder_from_config(&HermesConfig::default())
        .unwrap()
        .step(FnTransform::new("shout", |input, request, sink, next| {
            if let Some(profile) = input.downcast_mut::<Profile>() {
                profile.name = profile.name.to_uppercase();
            }
            next.run(input, request, sink)
        }))
        .build()
        .unwrap();
    let request = json_post("/?name=ada", "{}");
    let mut sink = ResponseRecorder::new();
    let mut profile = Profile::default();

    assert_eq!(
        controller.ingress().step_names().collect::<Vec<_>>(),
        ["query_decode", "body_decode", "shout"]
    );
    let responder =
        controller.handle(&mut sink, &request, Some(&mut profile), ErrorEnvelope::default());
    assert!(responder.is_some());
    assert_eq!(profile.name, "ADA");
}
