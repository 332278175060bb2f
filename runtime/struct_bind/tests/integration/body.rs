use reqwest::StatusCode;
use struct_bind::{
    body_wrap, body_wrap_with,
    converter::SerdeConverter,
    request::{Request, body::BodySizeLimit},
    service::EndpointService,
    source::JsonBodyConfig,
};
use ubyte::ToByteUnit;

use crate::helpers::TestApi;

#[derive(serde::Deserialize)]
pub struct Listing {
    address: Address,
    price: u64,
}

#[derive(serde::Deserialize)]
pub struct Address {
    street: String,
    number: u32,
}

async fn sell(mut request: Request, listing: Listing) -> String {
    let raw_len = request.body().await.map(|b| b.len()).unwrap_or_default();
    format!(
        "{} {} for {} ({raw_len} bytes)",
        listing.address.number, listing.address.street, listing.price
    )
}

const LISTING: &str = r#"{"address": {"street": "Main St", "number": 7}, "price": 100}"#;

#[tokio::test]
async fn json_bodies_are_bound_to_the_handler_argument() {
    let api =
        TestApi::spawn(EndpointService::new(body_wrap(SerdeConverter::default()).wrap(sell)))
            .await;

    let response = api.post(LISTING, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        format!("7 Main St for 100 ({} bytes)", LISTING.len())
    );
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let api =
        TestApi::spawn(EndpointService::new(body_wrap(SerdeConverter::default()).wrap(sell)))
            .await;

    let response = api.post(r#"{"address": "#, None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn the_failing_field_is_reported() {
    let api =
        TestApi::spawn(EndpointService::new(body_wrap(SerdeConverter::default()).wrap(sell)))
            .await;

    let response = api
        .post(
            r#"{"address": {"street": "Main St", "number": "seven"}, "price": 100}"#,
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.contains("address.number"), "{body}");
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let service = EndpointService::new(body_wrap(SerdeConverter::default()).wrap(sell))
        .body_size_limit(BodySizeLimit::Enabled {
            max_size: 16.bytes(),
        });
    let api = TestApi::spawn(service).await;

    let response = api.post(LISTING, None).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn a_json_content_type_can_be_required() {
    let wrapper = body_wrap_with(
        SerdeConverter::default(),
        JsonBodyConfig {
            require_content_type: true,
        },
    );
    let api = TestApi::spawn(EndpointService::new(wrapper.wrap(sell))).await;

    let response = api.post(LISTING, None).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let response = api.post(LISTING, Some("text/plain")).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let response = api
        .post(LISTING, Some("application/json; charset=utf-8"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
