use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wallkit_communication::{
    HttpClientConfig, HttpPersistenceClient, Page, PersistenceService, PlanRequest,
};
use wallkit_core::{RemoteError, Wall};

/// Serves exactly one canned response and reports the request head and body.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break buf.len();
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[head_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send((head, request_body));
    });

    (format!("http://{}", addr), rx)
}

fn client(base_url: &str) -> HttpPersistenceClient {
    HttpPersistenceClient::new(
        HttpClientConfig::new(base_url).with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_create_wall_posts_json() {
    let (url, seen) = serve_once("201 Created", r#"{"id":3,"width":4.0,"height":3.0}"#).await;
    let record = client(&url)
        .create_wall(&Wall::new(4.0, 3.0).unwrap())
        .await
        .unwrap();
    assert_eq!(record.id, 3);

    let (head, body) = seen.await.unwrap();
    assert!(head.starts_with("POST /api/walls/ HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent, serde_json::json!({"width": 4.0, "height": 3.0}));
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let (url, _seen) = serve_once("404 Not Found", r#"{"detail":"Wall not found"}"#).await;
    let err = client(&url).get_wall(42).await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Status {
            status: 404,
            message: "Wall not found".to_string(),
        }
    );
}

#[tokio::test]
async fn test_error_without_detail_uses_status_line() {
    let (url, _seen) = serve_once("500 Internal Server Error", "oops").await;
    let err = client(&url).health().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Request failed with status 500: Internal Server Error"
    );
}

#[tokio::test]
async fn test_no_content_delete() {
    let (url, seen) = serve_once("204 No Content", "").await;
    client(&url).delete_trajectory(5).await.unwrap();
    let (head, _) = seen.await.unwrap();
    assert!(head.starts_with("DELETE /api/trajectories/5 HTTP/1.1"));
}

#[tokio::test]
async fn test_list_trajectories_sends_pagination() {
    let (url, seen) = serve_once("200 OK", "[]").await;
    let records = client(&url)
        .list_trajectories(2, Page { skip: 10, limit: 5 })
        .await
        .unwrap();
    assert!(records.is_empty());
    let (head, _) = seen.await.unwrap();
    assert!(head.starts_with("GET /api/trajectories/wall/2?skip=10&limit=5 HTTP/1.1"));
}

#[tokio::test]
async fn test_plan_request_path_and_response() {
    let (url, seen) = serve_once(
        "201 Created",
        r#"{"points":[{"x":0.25,"y":0.25},{"x":3.75,"y":0.25}]}"#,
    )
    .await;
    let wall = Wall::new(4.0, 3.0).unwrap();
    let request = PlanRequest::new(Some(1), &wall, Vec::new(), 0.5, 0.0);
    let response = client(&url)
        .plan_trajectory(&request, "Coverage Path")
        .await
        .unwrap();
    assert_eq!(response.trajectory().len(), 2);

    let (head, body) = seen.await.unwrap();
    assert!(head.starts_with("POST /api/trajectories/plan?name=Coverage+Path HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent["wall"]["id"], 1);
    assert_eq!(sent["robot_width"], 0.5);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .health()
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Transport { .. }));
    assert_eq!(err.status(), None);
}
