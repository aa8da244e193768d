//! Tests that bind real sockets.

use quorum_node::config::NodeConfig;
use quorum_node::readiness::{Readiness, ReadinessBoard};
use quorum_node::server::{launch_network, launch_node, LaunchError};
use quorum_types::{NodeIdentity, NodeState, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Sends a bare HTTP/1.1 GET and returns the raw response.
async fn http_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or_default()
}

#[tokio::test]
async fn test_launch_marks_ready_and_serves() {
    let board = Arc::new(ReadinessBoard::new(2));
    let config =
        NodeConfig::new(NodeIdentity::correct(1, 2, 0, Value::Zero)).with_base_port(0);

    let handle = launch_node(&config, board.clone()).await.unwrap();
    assert!(board.is_ready(1));
    assert!(!board.all_ready());

    let response = http_get(handle.addr, "/start").await;
    assert!(response.starts_with("HTTP/1.1 400"));
    assert!(body(&response).contains("Some nodes are not ready yet"));

    board.mark_ready(0);
    let response = http_get(handle.addr, "/start").await;
    assert!(response.starts_with("HTTP/1.1 200"));

    let response = http_get(handle.addr, "/getState").await;
    let state: NodeState = serde_json::from_str(body(&response)).unwrap();
    assert_eq!(
        state,
        NodeState {
            killed: false,
            x: Some(Value::One),
            decided: Some(true),
            k: Some(1),
        }
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stop_keeps_endpoint_open() {
    let board = Arc::new(ReadinessBoard::new(1));
    let config = NodeConfig::new(NodeIdentity::faulty(0, 1, 1)).with_base_port(0);
    let handle = launch_node(&config, board).await.unwrap();

    let response = http_get(handle.addr, "/stop").await;
    assert!(response.starts_with("HTTP/1.1 200"));

    let response = http_get(handle.addr, "/status").await;
    assert!(response.starts_with("HTTP/1.1 500"));
    assert_eq!(body(&response), "faulty");

    assert!(handle.node.state().killed);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_bind_does_not_mark_ready() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let board = Arc::new(ReadinessBoard::new(1));
    let config = NodeConfig::new(NodeIdentity::correct(0, 1, 0, Value::One)).with_base_port(port);

    let result = launch_node(&config, board.clone()).await;
    assert!(matches!(result, Err(LaunchError::Bind { .. })));
    assert!(!board.all_ready());
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let board = Arc::new(ReadinessBoard::new(1));
    let config = NodeConfig::new(NodeIdentity::correct(3, 1, 0, Value::One)).with_base_port(0);

    let result = launch_node(&config, board).await;
    assert!(matches!(result, Err(LaunchError::Config(_))));
}

#[tokio::test]
async fn test_network_launch_reaches_readiness() {
    let config = NodeConfig::new(NodeIdentity::correct(0, 4, 1, Value::Zero)).with_base_port(0);
    let handles = launch_network(&config.network(&[3]).unwrap()).await.unwrap();
    assert_eq!(handles.len(), 4);

    let response = http_get(handles[0].addr, "/start").await;
    assert!(response.starts_with("HTTP/1.1 200"));

    let response = http_get(handles[3].addr, "/start").await;
    assert!(response.starts_with("HTTP/1.1 400"));
    assert!(body(&response).contains("Node cannot start consensus"));

    let response = http_get(handles[0].addr, "/getState").await;
    let state: NodeState = serde_json::from_str(body(&response)).unwrap();
    assert_eq!(state.k, Some(1));

    for handle in handles {
        handle.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn test_network_launch_failure_releases_nodes() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let first = NodeConfig::new(NodeIdentity::correct(0, 2, 0, Value::One)).with_base_port(0);
    let second = NodeConfig::new(NodeIdentity::correct(1, 2, 0, Value::One)).with_base_port(port - 1);

    let result = launch_network(&[first, second]).await;
    assert!(matches!(result, Err(LaunchError::Bind { .. })));
}
