use super::*;
use crate::core::modes::{resolve, Mode};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

type CapturedRequests = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

async fn read_http_request(stream: &mut TcpStream) -> Result<(String, Vec<u8>), String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut content_length = 0_usize;
    for line in lines {
        let mut parts = line.splitn(2, ':');
        let Some(name) = parts.next() else {
            continue;
        };
        let value = parts.next().unwrap_or_default().trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length.saturating_sub(body.len())];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok((request_line, body))
}

/// Serve one canned response per entry, then stop accepting.
async fn spawn_responder(
    responses: Vec<(&'static str, String)>,
) -> (String, CapturedRequests, tokio::task::JoinHandle<Result<(), String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured: CapturedRequests = Arc::new(Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    let server = tokio::spawn(async move {
        for (status_line, body) in responses {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let request = read_http_request(&mut stream).await?;
            captured_for_server.lock().await.push(request);

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
        }
        Ok::<(), String>(())
    });

    (format!("http://{}", addr), captured, server)
}

fn test_backend(base_url: &str) -> HttpAgentBackend {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build");
    HttpAgentBackend::with_client(client, base_url)
}

fn sample_request() -> AgentRequest {
    AgentRequest {
        message: "What's the weather in Austin?".to_string(),
        thread_id: "demo-session".to_string(),
        user_id: "1".to_string(),
    }
}

#[tokio::test]
async fn send_posts_json_body_to_mode_endpoint() {
    let reply = json!({
        "punny_response": "Austin is looking sun-derful today.",
        "weather_conditions": {"conditions": "Clear"}
    });
    let (base_url, captured, server) =
        spawn_responder(vec![("200 OK", reply.to_string())]).await;

    let backend = test_backend(&base_url);
    let body = backend
        .send(resolve(Mode::Chat), &sample_request())
        .await
        .expect("request should succeed");
    assert_eq!(body, reply);

    server
        .await
        .expect("server task should join")
        .expect("server should succeed");

    let requests = captured.lock().await;
    assert_eq!(requests.len(), 1);
    let (request_line, request_body) = &requests[0];
    assert!(
        request_line.starts_with("POST /chat "),
        "unexpected request line: {request_line}"
    );
    let sent: Value = serde_json::from_slice(request_body).expect("request body is JSON");
    assert_eq!(
        sent,
        json!({
            "message": "What's the weather in Austin?",
            "thread_id": "demo-session",
            "user_id": "1"
        })
    );
}

#[tokio::test]
async fn document_qa_targets_sladocs_route() {
    let (base_url, captured, server) = spawn_responder(vec![(
        "200 OK",
        json!({"answer": "99.9% uptime", "sources": []}).to_string(),
    )])
    .await;

    let backend = test_backend(&format!("{base_url}/"));
    backend
        .send(resolve(Mode::DocumentQa), &sample_request())
        .await
        .expect("request should succeed");
    server
        .await
        .expect("server task should join")
        .expect("server should succeed");

    let requests = captured.lock().await;
    assert!(requests[0].0.starts_with("POST /sladocs "));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let (base_url, _captured, server) = spawn_responder(vec![(
        "500 Internal Server Error",
        json!({"detail": "bedrock throttled"}).to_string(),
    )])
    .await;

    let backend = test_backend(&base_url);
    let err = backend
        .send(resolve(Mode::Analyze), &sample_request())
        .await
        .expect_err("500 should fail");
    match &err {
        TransportError::Status { status, body } => {
            assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("bedrock throttled"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("backend returned 500"));
    server
        .await
        .expect("server task should join")
        .expect("server should succeed");
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (base_url, _captured, server) =
        spawn_responder(vec![("200 OK", "<html>gateway</html>".to_string())]).await;

    let backend = test_backend(&base_url);
    let err = backend
        .send(resolve(Mode::Extract), &sample_request())
        .await
        .expect_err("html should fail");
    assert!(matches!(err, TransportError::Decode(_)));
    assert!(err.source().is_some());
    server
        .await
        .expect("server task should join")
        .expect("server should succeed");
}

#[tokio::test]
async fn refused_connection_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);

    let backend = test_backend(&format!("http://{addr}"));
    let err = backend
        .send(resolve(Mode::Chat), &sample_request())
        .await
        .expect_err("closed port should fail");
    assert!(matches!(err, TransportError::Request(_)));
}

#[tokio::test]
async fn status_reads_health_route() {
    let (base_url, captured, server) = spawn_responder(vec![(
        "200 OK",
        json!({
            "status": "online",
            "endpoints": ["/chat", "/extract", "/analyze", "/sladocs"],
            "tech_stack": ["FastAPI", "LangChain"]
        })
        .to_string(),
    )])
    .await;

    let backend = test_backend(&base_url);
    let status = backend.status().await.expect("status should succeed");
    assert!(status.is_online());
    assert_eq!(status.endpoints.len(), 4);
    assert_eq!(status.tech_stack, vec!["FastAPI", "LangChain"]);

    server
        .await
        .expect("server task should join")
        .expect("server should succeed");
    assert!(captured.lock().await[0].0.starts_with("GET / "));
}

#[test]
fn endpoint_url_joins_without_double_slashes() {
    let backend = HttpAgentBackend::new("http://127.0.0.1:8000/");
    assert_eq!(
        backend.endpoint_url(resolve(Mode::Analyze)),
        "http://127.0.0.1:8000/analyze"
    );
}
