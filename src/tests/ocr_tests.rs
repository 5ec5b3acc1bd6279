use super::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

fn credentials() -> Credentials {
    Credentials {
        app_id: "test-id".to_string(),
        app_key: "test-key".to_string(),
    }
}

/// Captured request: lowercase header lines and body.
struct Captured {
    headers: Vec<String>,
    body: String,
}

/// Serves a single request on a loopback port and answers with `status` and `reply`.
fn serve_once(status: &'static str, reply: &'static str) -> (String, thread::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/v3/latex", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut headers = Vec::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(len) = line.strip_prefix("content-length:") {
                content_length = len.trim().parse().unwrap();
            }
            headers.push(line);
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        )
        .unwrap();
        stream.flush().unwrap();

        Captured {
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    });

    (url, handle)
}

#[test]
fn test_image_uri_is_labelled_jpg() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("eq.png");
    std::fs::write(&path, b"hello").unwrap();

    assert_eq!(image_uri(&path).unwrap(), "data:image/jpg;base64,aGVsbG8=");
}

#[test]
fn test_image_uri_missing_file() {
    let dir = tempdir().unwrap();
    assert!(image_uri(&dir.path().join("nope.png")).is_err());
}

#[test]
fn test_request_body_shape() {
    let request = OcrRequest {
        src: "data:image/jpg;base64,AA==".to_string(),
        formats: vec![OcrFormat::LatexStyled],
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"src": "data:image/jpg;base64,AA==", "formats": ["latex_styled"]})
    );
}

#[test]
fn test_result_parsing() {
    let ok: OcrResult =
        serde_json::from_str(r#"{"latex_simplified": "x^2", "latex_confidence": 1.0}"#).unwrap();
    assert_eq!(ok.error_message(), None);
    assert_eq!(ok.latex(OcrFormat::LatexSimplified), Some("x^2"));
    assert_eq!(ok.latex(OcrFormat::LatexStyled), None);
    assert_eq!(ok.raw()["latex_confidence"], 1.0);

    let err: OcrResult = serde_json::from_str(r#"{"error": "timeout"}"#).unwrap();
    assert_eq!(err.error_message().as_deref(), Some("timeout"));

    let structured: OcrResult =
        serde_json::from_str(r#"{"error": {"id": "image_no_content"}}"#).unwrap();
    assert_eq!(
        structured.error_message().as_deref(),
        Some(r#"{"id":"image_no_content"}"#)
    );
}

#[test]
fn test_null_error_is_no_error() {
    let reply: OcrResult =
        serde_json::from_str(r#"{"error": null, "latex_simplified": "x"}"#).unwrap();
    assert_eq!(reply.error_message(), None);
    assert_eq!(
        serde_json::to_string(&reply).unwrap(),
        r#"{"error":null,"latex_simplified":"x"}"#
    );
}

#[test]
fn test_reply_must_be_an_object() {
    assert!(serde_json::from_str::<OcrResult>(r#""busy""#).is_err());
    assert!(serde_json::from_str::<OcrResult>(r#"{"latex_simplified": 3}"#).is_err());
}

#[test]
fn test_header_dump() {
    let client = OcrClient::new(credentials(), DEFAULT_ENDPOINT, DEFAULT_TIMEOUT);
    assert_eq!(
        client.header_dump(),
        "Content-type: application/json\napp_id: test-id\napp_key: test-key"
    );
}

#[test]
fn test_format_names() {
    assert_eq!(OcrFormat::default(), OcrFormat::LatexSimplified);
    assert_eq!(OcrFormat::LatexSimplified.to_string(), "latex_simplified");
    assert_eq!(OcrFormat::LatexStyled.to_string(), "latex_styled");
}

#[test]
fn test_client_sends_headers_and_body() {
    let (url, server) = serve_once("200 OK", r#"{"latex_simplified": "\\frac{1}{2}"}"#);
    let dir = tempdir().unwrap();
    let image = dir.path().join("eq.png");
    std::fs::write(&image, b"png-bytes").unwrap();

    let client = OcrClient::new(credentials(), &url, Duration::from_secs(5));
    let result = request_ocr(&client, &image, OcrFormat::LatexSimplified).unwrap();
    assert_eq!(result.latex(OcrFormat::LatexSimplified), Some("\\frac{1}{2}"));

    let captured = server.join().unwrap();
    assert!(captured.headers[0].starts_with("post /v3/latex"));
    assert!(captured.headers.contains(&"app_id: test-id".to_string()));
    assert!(captured.headers.contains(&"app_key: test-key".to_string()));
    assert!(captured
        .headers
        .contains(&"content-type: application/json".to_string()));

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["formats"], serde_json::json!(["latex_simplified"]));
    assert_eq!(
        body["src"],
        format!("data:image/jpg;base64,{}", BASE64.encode(b"png-bytes"))
    );
}

#[test]
fn test_client_reads_error_status_body() {
    let (url, server) = serve_once("401 Unauthorized", r#"{"error": "Invalid credentials"}"#);
    let dir = tempdir().unwrap();
    let image = dir.path().join("eq.png");
    std::fs::write(&image, b"png-bytes").unwrap();

    let client = OcrClient::new(credentials(), &url, Duration::from_secs(5));
    let result = request_ocr(&client, &image, OcrFormat::LatexStyled).unwrap();
    assert_eq!(result.error_message().as_deref(), Some("Invalid credentials"));
    server.join().unwrap();
}

#[test]
fn test_client_connection_refused_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = OcrClient::new(
        credentials(),
        &format!("http://127.0.0.1:{}/v3/latex", port),
        Duration::from_secs(5),
    );
    let request = OcrRequest {
        src: "data:image/jpg;base64,AA==".to_string(),
        formats: vec![OcrFormat::LatexSimplified],
    };

    let err = client.submit(&request).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClipError>(),
        Some(ClipError::Network { .. })
    ));
}

#[test]
fn test_headers_listing() {
    let client = OcrClient::new(credentials(), DEFAULT_ENDPOINT, DEFAULT_TIMEOUT);
    assert_eq!(
        client.headers(),
        vec![
            ("Content-type", "application/json"),
            ("app_id", "test-id"),
            ("app_key", "test-key"),
        ]
    );
}
