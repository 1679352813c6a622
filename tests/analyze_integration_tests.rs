use std::sync::Arc;

use glimpse::core::action::{Action, Effect, FAILURE_NOTICE, Submission, update};
use glimpse::core::attachment::Attachment;
use glimpse::core::config::ResolvedConfig;
use glimpse::core::state::App;
use glimpse::inference::{
    AnalyzeBackend, AnalyzeRequest, BackendError, HttpAnalyzeBackend, ImagePayload, Role,
    StreamChunk, run_turn,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn cat_image() -> ImagePayload {
    ImagePayload {
        file_name: "cat.png".to_string(),
        mime: "image/png".to_string(),
        bytes: b"not-really-a-png".to_vec(),
    }
}

fn request<'a>(prompt: &'a str, image: Option<&'a ImagePayload>) -> AnalyzeRequest<'a> {
    AnalyzeRequest {
        prompt,
        image,
        default_prompt: "Describe this image",
        model: None,
    }
}

/// Collects fragments, asserting the stream opened with `Accepted`.
async fn collect_fragments(mut receiver: mpsc::Receiver<StreamChunk>) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut accepted = false;
    while let Some(chunk) = receiver.recv().await {
        match chunk {
            StreamChunk::Accepted => accepted = true,
            StreamChunk::Fragment(text) => {
                assert!(accepted, "fragment arrived before Accepted");
                fragments.push(text);
            }
        }
    }
    fragments
}

async fn mount_analyze(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn app_for(server: &MockServer) -> App {
    let config = ResolvedConfig {
        endpoint: server.uri(),
        model: None,
        default_prompt: "Describe this image".to_string(),
        require_image: true,
    };
    let backend: Arc<dyn AnalyzeBackend> = Arc::new(HttpAnalyzeBackend::new(server.uri()));
    App::new(backend, config)
}

/// Drives one submission through the real backend and applies every
/// resulting action, as the event loop would.
async fn drive_turn(app: &mut App, prompt: &str) {
    let attachment = Attachment::from_bytes("cat.png".to_string(), "image/png", b"abc".to_vec());
    update(app, Action::AttachmentLoaded(attachment));

    let submission: Submission = match update(app, Action::Submit(prompt.to_string())) {
        Effect::SpawnRequest(submission) => submission,
        other => panic!("expected SpawnRequest, got {other:?}"),
    };

    let (tx, rx) = std::sync::mpsc::channel();
    run_turn(app.backend.clone(), submission, tx).await;

    for action in rx.try_iter() {
        update(app, action);
    }
}

// ============================================================================
// HttpAnalyzeBackend Tests
// ============================================================================

#[tokio::test]
async fn test_analyze_streams_body_as_fragments() {
    let mock_server = MockServer::start().await;
    mount_analyze(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("It is a cat."),
    )
    .await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let image = cat_image();
    let (tx, rx) = mpsc::channel(100);
    let result = backend
        .stream_analysis(request("What is this?", Some(&image)), tx)
        .await;

    assert_ok!(result);
    let fragments = collect_fragments(rx).await;
    assert_eq!(fragments.concat(), "It is a cat.");
}

#[tokio::test]
async fn test_analyze_empty_success_body_yields_no_fragments() {
    let mock_server = MockServer::start().await;
    mount_analyze(&mock_server, ResponseTemplate::new(200)).await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let (tx, rx) = mpsc::channel(100);
    let result = backend.stream_analysis(request("hi", None), tx).await;

    assert_ok!(result);
    assert!(collect_fragments(rx).await.concat().is_empty());
}

#[tokio::test]
async fn test_analyze_api_error_response() {
    let mock_server = MockServer::start().await;
    mount_analyze(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("model crashed"),
    )
    .await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let (tx, _rx) = mpsc::channel(100);
    let result = backend.stream_analysis(request("hi", None), tx).await;

    match assert_err!(result) {
        BackendError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("model crashed"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_no_content_is_missing_body() {
    let mock_server = MockServer::start().await;
    mount_analyze(&mock_server, ResponseTemplate::new(204)).await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let (tx, _rx) = mpsc::channel(100);
    let result = backend.stream_analysis(request("hi", None), tx).await;

    assert!(matches!(result, Err(BackendError::MissingBody)));
}

#[tokio::test]
async fn test_analyze_unreachable_endpoint_is_network_error() {
    // Nothing listens on the discard port.
    let backend = HttpAnalyzeBackend::new("http://127.0.0.1:9");
    let (tx, _rx) = mpsc::channel(100);
    let result = backend.stream_analysis(request("hi", None), tx).await;

    assert!(matches!(result, Err(BackendError::Network(_))));
}

#[tokio::test]
async fn test_analyze_channel_closed_error() {
    let mock_server = MockServer::start().await;
    mount_analyze(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("It is a cat."),
    )
    .await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let (tx, rx) = mpsc::channel(100);
    drop(rx);
    let result = backend.stream_analysis(request("hi", None), tx).await;

    assert!(matches!(result, Err(BackendError::ChannelClosed)));
}

#[tokio::test]
async fn test_analyze_sends_prompt_and_image_parts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_string_contains("name=\"prompt\""))
        .and(body_string_contains("What breed?"))
        .and(body_string_contains("filename=\"cat.png\""))
        .and(body_string_contains("image/png"))
        .and(body_string_contains("not-really-a-png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("A tabby."))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let image = cat_image();
    let (tx, rx) = mpsc::channel(100);
    let result = backend
        .stream_analysis(request("What breed?", Some(&image)), tx)
        .await;

    assert_ok!(result);
    assert_eq!(collect_fragments(rx).await.concat(), "A tabby.");
}

#[tokio::test]
async fn test_analyze_blank_prompt_uses_default() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_string_contains("Describe this image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpAnalyzeBackend::new(mock_server.uri());
    let image = cat_image();
    let (tx, _rx) = mpsc::channel(100);
    let result = backend.stream_analysis(request("   ", Some(&image)), tx).await;

    assert_ok!(result);
}

#[tokio::test]
async fn test_analyze_forwards_model_field() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_string_contains("name=\"model\""))
        .and(body_string_contains("llava"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpAnalyzeBackend::new(format!("{}/", mock_server.uri()));
    let (tx, _rx) = mpsc::channel(100);
    let result = backend
        .stream_analysis(
            AnalyzeRequest {
                model: Some("llava"),
                ..request("hi", None)
            },
            tx,
        )
        .await;

    assert_ok!(result);
}

/// Serves one request with a 200 that promises more body than it sends,
/// then closes the connection. Returns the server origin.
async fn serve_truncated_body(partial: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // Drain the multipart request up to its closing boundary.
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.ends_with(b"--\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n",
            partial.len() + 64
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(partial.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_analyze_body_cut_short_is_network_error() {
    let origin = serve_truncated_body("It is a").await;

    let backend = HttpAnalyzeBackend::new(origin);
    let image = cat_image();
    let (tx, rx) = mpsc::channel(100);
    let result = backend
        .stream_analysis(request("What is this?", Some(&image)), tx)
        .await;

    assert!(matches!(result, Err(BackendError::Network(_))));
    assert_eq!(collect_fragments(rx).await.concat(), "It is a");
}

// ============================================================================
// Full Turn Tests (run_turn + update)
// ============================================================================

#[tokio::test]
async fn test_turn_success_updates_conversation() {
    let mock_server = MockServer::start().await;
    mount_analyze(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("It is a cat."),
    )
    .await;

    let mut app = app_for(&mock_server);
    drive_turn(&mut app, "What is this?").await;

    let messages = app.log.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "What is this?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "It is a cat.");
    assert!(!app.is_submitting());
    assert!(app.pending.is_none());
}

#[tokio::test]
async fn test_turn_failure_shows_notice_and_keeps_attachment() {
    let mock_server = MockServer::start().await;
    mount_analyze(
        &mock_server,
        ResponseTemplate::new(503).set_body_string("busy"),
    )
    .await;

    let mut app = app_for(&mock_server);
    drive_turn(&mut app, "What is this?").await;

    let messages = app.log.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, FAILURE_NOTICE);
    assert!(!app.is_submitting());
    assert!(app.pending.is_some());
}
