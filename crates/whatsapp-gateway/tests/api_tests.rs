//! Integration tests for the gateway API.

mod common;

use axum::http::StatusCode;
use common::{call, json_request, multipart_request, test_app, Part};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use whatsapp_client::{BridgeClient, ClientError, MockMessagingClient};
use whatsapp_gateway::api::{create_router_with_rate_limit, AppState, RateLimitState};

const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47];

fn registered_client() -> MockMessagingClient {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().returning(|_| Ok(true));
    mock
}

#[tokio::test]
async fn test_send_message_success() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address()
        .withf(|address| address == "41999998888@c.us")
        .times(1)
        .returning(|_| Ok(true));
    mock.expect_send_text()
        .withf(|address, text| address == "41999998888@c.us" && text == "Olá")
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, json) = call(
        test_app(mock),
        json_request(
            "/api/send-message",
            json!({ "number": "41999998888", "message": "Olá" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "message": "Mensagem enviada com sucesso para 41999998888"
        })
    );
}

#[tokio::test]
async fn test_send_message_not_registered() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().returning(|_| Ok(false));
    mock.expect_send_text().never();

    let (status, json) = call(
        test_app(mock),
        json_request(
            "/api/send-message",
            json!({ "number": "41999998888", "message": "Olá" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        json!({
            "success": false,
            "message": "O número de telefone informado não está registrado no WhatsApp."
        })
    );
}

#[tokio::test]
async fn test_send_message_registration_check_error() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address()
        .returning(|_| Err(ClientError::Api("target closed".into())));
    mock.expect_send_text().never();

    let (status, json) = call(
        test_app(mock),
        json_request(
            "/api/send-message",
            json!({ "number": "41999998888", "message": "Olá" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    // Internal details stay in the logs
    assert!(!json.to_string().contains("target closed"));
}

#[tokio::test]
async fn test_send_message_send_error() {
    let mut mock = registered_client();
    mock.expect_send_text()
        .times(1)
        .returning(|_, _| Err(ClientError::SendFailed("connection lost".into())));

    let (status, json) = call(
        test_app(mock),
        json_request(
            "/api/send-message",
            json!({ "number": "41999998888", "message": "Olá" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({
            "success": false,
            "message": "Ocorreu um erro interno ao tentar enviar a mensagem."
        })
    );
}

#[tokio::test]
async fn test_send_message_validation_errors() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().never();

    let (status, json) = call(
        test_app(mock),
        json_request(
            "/api/send-message",
            json!({ "number": "123", "message": "a".repeat(1001) }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["path"], "number");
    assert_eq!(
        errors[0]["msg"],
        "Por favor, forneça um número de telefone válido no formato brasileiro (com DDD)."
    );
    assert_eq!(errors[1]["path"], "message");
    assert_eq!(
        errors[1]["msg"],
        "A mensagem deve ter no máximo 1000 caracteres."
    );
}

#[tokio::test]
async fn test_send_message_empty_message() {
    let (status, json) = call(
        test_app(MockMessagingClient::new()),
        json_request(
            "/api/send-message",
            json!({ "number": "41999998888", "message": "" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "A mensagem não pode estar vazia.");
}

#[tokio::test]
async fn test_send_message_malformed_json() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/send-message")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, json) = call(test_app(MockMessagingClient::new()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["path"], "body");
}

#[tokio::test]
async fn test_send_media_success() {
    let mut mock = registered_client();
    mock.expect_send_media()
        .withf(|address, media, options| {
            address == "41999998888@c.us"
                && media.mimetype == "image/png"
                && media.data == "iVBORw=="
                && media.filename.as_deref() == Some("pic.png")
                && options.caption == "Olha isso"
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (status, json) = call(
        test_app(mock),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "41999998888"),
                Part::Text("caption", "Olha isso"),
                Part::File {
                    name: "media",
                    file_name: "pic.png",
                    content_type: "image/png",
                    bytes: PNG,
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "message": "Mídia enviada com sucesso para 41999998888"
        })
    );
}

#[tokio::test]
async fn test_send_media_missing_file() {
    for number in ["41999998888", "invalid"] {
        let (status, json) = call(
            test_app(MockMessagingClient::new()),
            multipart_request("/api/send-media", &[Part::Text("number", number)]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            json!({
                "success": false,
                "message": "Nenhum arquivo foi enviado. Por favor, anexe um arquivo na chave \"media\"."
            })
        );
    }
}

#[tokio::test]
async fn test_send_media_json_body_has_no_file() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().never();

    let (status, json) = call(
        test_app(mock),
        json_request("/api/send-media", json!({ "number": "41999998888" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({
            "success": false,
            "message": "Nenhum arquivo foi enviado. Por favor, anexe um arquivo na chave \"media\"."
        })
    );
}

#[tokio::test]
async fn test_send_media_text_field_is_not_a_file() {
    let (status, json) = call(
        test_app(MockMessagingClient::new()),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "41999998888"),
                Part::Text("media", "not a file"),
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_send_media_invalid_number() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().never();

    let (status, json) = call(
        test_app(mock),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "12"),
                Part::File {
                    name: "media",
                    file_name: "pic.png",
                    content_type: "image/png",
                    bytes: PNG,
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "Número de telefone inválido.");
}

#[tokio::test]
async fn test_send_media_not_registered() {
    let mut mock = MockMessagingClient::new();
    mock.expect_is_registered_address().returning(|_| Ok(false));
    mock.expect_send_media().never();

    let (status, _) = call(
        test_app(mock),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "41999998888"),
                Part::File {
                    name: "media",
                    file_name: "doc.pdf",
                    content_type: "application/pdf",
                    bytes: b"%PDF-1.4",
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_media_send_error() {
    let mut mock = registered_client();
    mock.expect_send_media()
        .returning(|_, _, _| Err(ClientError::SendFailed("evaluation failed".into())));

    let (status, json) = call(
        test_app(mock),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "41999998888"),
                Part::File {
                    name: "media",
                    file_name: "pic.png",
                    content_type: "image/png",
                    bytes: PNG,
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json["message"],
        "Ocorreu um erro interno ao tentar enviar a mídia."
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut mock = MockMessagingClient::new();
    mock.expect_health_check().returning(|| true);

    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, json) = call(test_app(mock), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["messaging_client_healthy"], true);
}

#[tokio::test]
async fn test_rate_limiting() {
    let mut mock = registered_client();
    mock.expect_send_text().times(1).returning(|_, _| Ok(()));

    let state = AppState::new(Arc::new(mock));
    let app = create_router_with_rate_limit(state, RateLimitState::new(1), 1024 * 1024);
    let body = json!({ "number": "41999998888", "message": "Olá" });

    let (status, _) = call(app.clone(), json_request("/api/send-message", body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = call(app, json_request("/api/send-message", body)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_send_media_through_bridge() {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let bridge = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/contacts/5541999998888%40c.us/registered"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "registered": true })))
        .expect(1)
        .mount(&bridge)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages/media"))
        .and(body_json(json!({
            "chatId": "5541999998888@c.us",
            "media": { "mimetype": "image/png", "data": "iVBORw==", "filename": "pic.png" },
            "options": { "caption": "" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&bridge)
        .await;

    let client = BridgeClient::new(bridge.uri(), Duration::from_secs(5)).unwrap();

    let (status, json) = call(
        test_app(client),
        multipart_request(
            "/api/send-media",
            &[
                Part::Text("number", "+55 (41) 99999-8888"),
                Part::File {
                    name: "media",
                    file_name: "pic.png",
                    content_type: "image/png",
                    bytes: PNG,
                },
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["message"],
        "Mídia enviada com sucesso para +55 (41) 99999-8888"
    );
}
