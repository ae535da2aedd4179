use super::*;

fn client(base: &str) -> GitHubClient {
    GitHubClient::new(base, "octo", "servers", Session::default()).unwrap()
}

#[test]
fn endpoint_encodes_each_path_segment() {
    let c = client("https://api.github.com");
    let url = c.endpoint(&["contents", "cstrike/maps/de dust#2.bsp"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.github.com/repos/octo/servers/contents/cstrike/maps/de%20dust%232.bsp"
    );
}

#[test]
fn endpoint_keeps_enterprise_base_path() {
    let c = client("https://ghe.example.com/api/v3/");
    let url = c.endpoint(&["git", "trees", "abc"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://ghe.example.com/api/v3/repos/octo/servers/git/trees/abc"
    );
}

#[test]
fn new_rejects_missing_owner() {
    assert!(GitHubClient::new("https://api.github.com", " ", "r", Session::default()).is_err());
    assert!(GitHubClient::new("not a url", "o", "r", Session::default()).is_err());
}

#[test]
fn decode_blob_tolerates_line_breaks() {
    let blob = BlobResponse {
        sha: "x".to_string(),
        size: 11,
        content: "aGVsbG8g\nd29y\nbGQ=\n".to_string(),
        encoding: "base64".to_string(),
    };
    assert_eq!(decode_blob(&blob).unwrap(), b"hello world");
}

#[test]
fn decode_blob_rejects_unknown_encoding() {
    let blob = BlobResponse {
        sha: "x".to_string(),
        size: 1,
        content: "a".to_string(),
        encoding: "rot13".to_string(),
    };
    assert!(matches!(decode_blob(&blob), Err(TreeError::Decode(_))));
}

#[test]
fn missing_path_on_write_keeps_its_status() {
    use crate::remote::http_client::{Access, classify};

    let read = classify(StatusCode::NOT_FOUND, false, "gone".into(), "get blob", Access::Read);
    assert!(matches!(read, TreeError::NotFound(ref m) if m == "get blob: gone"));

    let write = classify(
        StatusCode::NOT_FOUND,
        false,
        "{\"message\":\"Not Found\"}".into(),
        "delete content",
        Access::Write,
    );
    assert_eq!(write.status(), Some(404));
    assert!(matches!(write, TreeError::RemoteError { status: 404, ref body } if body.contains("Not Found")));

    let limited = classify(StatusCode::FORBIDDEN, true, String::new(), "put content", Access::Write);
    assert!(matches!(limited, TreeError::RateLimited { status: 403, .. }));
}
