//! Ingress chain behaviour over a table of requests.

use bytes::Bytes;
use hermes_codec::{CodecDecoding, CodecStack, JsonCodec};
use hermes_core::{BoxError, Request, ResponseRecorder, ResponseSink};
use hermes_pipeline::{
    FnTransform, Ingress, IngressBuilder, IngressError, Input, Next, TypedValidator,
};
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TestInput {
    name: String,
    #[serde(rename = "json-image", alias = "form-image")]
    image: String,
}

fn input(name: &str, image: &str) -> TestInput {
    TestInput {
        name: name.to_string(),
        image: image.to_string(),
    }
}

fn early_error(
    _input: &mut dyn Input,
    _request: &Request,
    _sink: &mut dyn ResponseSink,
    _next: Next<'_>,
) -> Result<(), IngressError> {
    Err(IngressError::step("early_error", "early error"))
}

fn ascii_image(input: &TestInput) -> Result<(), BoxError> {
    if input.image.is_ascii() {
        Ok(())
    } else {
        Err("image must be ASCII".into())
    }
}

struct Case {
    name: &'static str,
    builder: fn() -> IngressBuilder,
    method: http::Method,
    uri: &'static str,
    content_type: Option<&'static str>,
    body: &'static str,
    expected_input: TestInput,
    expected_error: Option<&'static str>,
}

fn run(case: &Case) {
    let codecs = Arc::new(CodecStack::single(JsonCodec::new()).unwrap());
    let ingress: Ingress = (case.builder)().build(codecs).unwrap();

    let mut request = http::Request::builder().method(case.method.clone()).uri(case.uri);
    if let Some(content_type) = case.content_type {
        request = request.header(CONTENT_TYPE, content_type);
    }
    let request = request.body(Bytes::from_static(case.body.as_bytes())).unwrap();

    let mut actual = TestInput::default();
    let result = ingress.parse(&request, &mut ResponseRecorder::new(), Some(&mut actual));

    let actual_error = result.err().map(|e| e.to_string());
    assert_eq!(
        actual_error.as_deref(),
        case.expected_error,
        "{}: unexpected error",
        case.name
    );
    assert_eq!(actual, case.expected_input, "{}: unexpected input", case.name);
}

#[test]
fn default_parse_table() {
    let cases = [
        Case {
            name: "plain GET does not decode",
            builder: Ingress::builder,
            method: http::Method::GET,
            uri: "/",
            content_type: None,
            body: "",
            expected_input: input("", ""),
            expected_error: None,
        },
        Case {
            name: "GET with query does not decode without a query step",
            builder: Ingress::builder,
            method: http::Method::GET,
            uri: "/?name=foo",
            content_type: None,
            body: "",
            expected_input: input("", ""),
            expected_error: None,
        },
        Case {
            name: "POST with json decodes the body",
            builder: Ingress::builder,
            method: http::Method::POST,
            uri: "/",
            content_type: Some("application/json"),
            body: r#"{"json-image": "bar3"}"#,
            expected_input: input("", "bar3"),
            expected_error: None,
        },
        Case {
            name: "GET with query decodes with a query step",
            builder: || Ingress::builder().query_decode(CodecDecoding::form()),
            method: http::Method::GET,
            uri: "/?name=foo",
            content_type: None,
            body: "",
            expected_input: input("foo", ""),
            expected_error: None,
        },
        Case {
            name: "query after body overwrites partially",
            builder: || {
                Ingress::builder()
                    .body_decode()
                    .query_decode(CodecDecoding::form())
            },
            method: http::Method::POST,
            uri: "/?name=foo&form-image=overwritten",
            content_type: Some("application/json"),
            body: r#"{"json-image": "bar"}"#,
            expected_input: input("foo", "overwritten"),
            expected_error: None,
        },
        Case {
            name: "body after query overwrites partially",
            builder: || Ingress::builder().query_decode(CodecDecoding::form()),
            method: http::Method::POST,
            uri: "/?name=foo&form-image=overwritten",
            content_type: Some("application/json"),
            body: r#"{"json-image": "bar"}"#,
            expected_input: input("foo", "bar"),
            expected_error: None,
        },
        Case {
            name: "early error stops the chain",
            builder: || {
                Ingress::builder()
                    .step(FnTransform::new("early_error", early_error))
                    .query_decode(CodecDecoding::form())
            },
            method: http::Method::GET,
            uri: "/?name=foo",
            content_type: None,
            body: "",
            expected_input: input("", ""),
            expected_error: Some("early error"),
        },
        Case {
            name: "early error skips the body decode",
            builder: || Ingress::builder().step(FnTransform::new("early_error", early_error)),
            method: http::Method::POST,
            uri: "/",
            content_type: Some("application/json"),
            body: r#"{"json-image": "bar"}"#,
            expected_input: input("", ""),
            expected_error: Some("early error"),
        },
        Case {
            name: "form POST decodes through the decoder set",
            builder: || {
                Ingress::builder()
                    .decoder(CodecDecoding::form())
                    .body_decode()
                    .query_decode(CodecDecoding::form())
            },
            method: http::Method::POST,
            uri: "/?name=foo&form-image=overwritten",
            content_type: Some("application/x-www-form-urlencoded"),
            body: "form-image=bar",
            expected_input: input("foo", "overwritten"),
            expected_error: None,
        },
        Case {
            name: "form POST without a decoder is unsupported",
            builder: Ingress::builder,
            method: http::Method::POST,
            uri: "/",
            content_type: Some("application/x-www-form-urlencoded"),
            body: "form-image=bar",
            expected_input: input("", ""),
            expected_error: Some("unsupported media type: application/x-www-form-urlencoded"),
        },
        Case {
            name: "validation step sees the decoded body",
            builder: || Ingress::builder().body_decode().validate(TypedValidator::new(ascii_image)),
            method: http::Method::POST,
            uri: "/",
            content_type: Some("application/json"),
            body: r#"{"json-image": "Ïd"}"#,
            expected_input: input("", "Ïd"),
            expected_error: Some("image must be ASCII"),
        },
    ];

    for case in &cases {
        run(case);
    }
}

#[test]
fn parse_into_none_is_noop() {
    let codecs = Arc::new(CodecStack::single(JsonCodec::new()).unwrap());
    let ingress = Ingress::builder()
        .step(FnTransform::new("early_error", early_error))
        .build(codecs)
        .unwrap();
    let request = http::Request::get("/").body(Bytes::new()).unwrap();

    assert!(ingress
        .parse(&request, &mut ResponseRecorder::new(), None)
        .is_ok());
}

#[test]
fn malformed_json_reports_parser_message() {
    let codecs = Arc::new(CodecStack::single(JsonCodec::new()).unwrap());
    let ingress = Ingress::builder().build(codecs).unwrap();
    let body = r#"{"json-image": "bar"#;
    let request = http::Request::post("/")
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap();

    let mut actual = TestInput::default();
    let err = ingress
        .parse(&request, &mut ResponseRecorder::new(), Some(&mut actual))
        .unwrap_err();

    let expected = serde_json::from_str::<serde_json::Value>(body)
        .unwrap_err()
        .to_string();
    assert_eq!(err.to_string(), expected);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Toggle {
    name: String,
    active: bool,
}

fn parse_toggle(uri: &str, body: &'static str) -> Result<Toggle, IngressError> {
    let codecs = Arc::new(CodecStack::single(JsonCodec::new()).unwrap());
    let ingress = Ingress::builder()
        .query_decode(CodecDecoding::form())
        .build(codecs)
        .unwrap();
    let request = http::Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap();

    let mut toggle = Toggle {
        name: "initial".into(),
        active: false,
    };
    ingress.parse(&request, &mut ResponseRecorder::new(), Some(&mut toggle))?;
    Ok(toggle)
}

#[test]
fn body_resets_query_fields_to_empty_values() {
    let toggle = parse_toggle("/?name=foo&active=true", r#"{"name": "", "active": false}"#).unwrap();
    assert_eq!(
        toggle,
        Toggle {
            name: String::new(),
            active: false
        }
    );
}

#[test]
fn partial_body_keeps_query_fields() {
    let toggle = parse_toggle("/?name=foo&active=true", r#"{"active": false}"#).unwrap();
    assert_eq!(
        toggle,
        Toggle {
            name: "foo".into(),
            active: false
        }
    );
}

#[test]
fn unparsable_query_value_is_malformed() {
    let err = parse_toggle("/?active=maybe", "{}").unwrap_err();
    assert!(matches!(err, IngressError::MalformedQuery(_)), "{err:?}");
}
