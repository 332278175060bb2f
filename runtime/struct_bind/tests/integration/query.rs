use reqwest::StatusCode;
use struct_bind::{
    converter::{ConverterConfig, SerdeConverter},
    query_wrap,
    request::Request,
    service::EndpointService,
};

use crate::helpers::TestApi;

#[derive(serde::Deserialize)]
pub struct Search {
    q: String,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    tag: Vec<String>,
}

async fn search(_request: Request, search: Search) -> String {
    format!(
        "q={} page={:?} tags={}",
        search.q,
        search.page,
        search.tag.join("|")
    )
}

async fn echo_path(request: Request) -> String {
    request.target().path().to_owned()
}

#[tokio::test]
async fn query_parameters_are_bound_to_the_handler_argument() {
    let api =
        TestApi::spawn(EndpointService::new(query_wrap(SerdeConverter::default()).wrap(search)))
            .await;

    let response = api.get("/?q=rust%20lang&page=2&tag=a&tag=b").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        "q=rust lang page=Some(2) tags=a|b"
    );
}

#[tokio::test]
async fn comma_separated_values_are_split() {
    let api =
        TestApi::spawn(EndpointService::new(query_wrap(SerdeConverter::default()).wrap(search)))
            .await;

    let response = api.get("/?q=x&tag=a,%20b,c&page=").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "q=x page=None tags=a|b|c");
}

#[tokio::test]
async fn comma_splitting_can_be_disabled() {
    let converter = SerdeConverter::new(ConverterConfig {
        split_comma_lists: false,
        ..ConverterConfig::default()
    });
    let api = TestApi::spawn(EndpointService::new(query_wrap(converter).wrap(search))).await;

    let response = api.get("/?q=x&tag=a,b").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "q=x page=None tags=a,b");
}

#[tokio::test]
async fn invalid_query_parameters_are_rejected() {
    let api =
        TestApi::spawn(EndpointService::new(query_wrap(SerdeConverter::default()).wrap(search)))
            .await;

    let response = api.get("/?q=x&page=first").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.starts_with("Failed to structure the request data.\npage:"), "{body}");
}

#[tokio::test]
async fn a_missing_query_string_is_rejected() {
    let api =
        TestApi::spawn(EndpointService::new(query_wrap(SerdeConverter::default()).wrap(search)))
            .await;

    let response = api.get("/").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to extract any data from the request."
    );
}

#[tokio::test]
async fn handlers_without_a_custom_parameter_get_the_request_only() {
    let api =
        TestApi::spawn(EndpointService::new(query_wrap(SerdeConverter::default()).wrap(echo_path)))
            .await;

    // No query string: nothing to bind, and nothing is needed.
    let response = api.get("/homes").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "/homes");
}
