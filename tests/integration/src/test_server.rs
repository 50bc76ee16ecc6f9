//! Local server tests over HTTP.

#[cfg(test)]
mod tests {
    use crate::medialink_url;

    #[tokio::test]
    #[ignore = "requires running medialink server"]
    async fn test_should_report_healthy() {
        let resp = reqwest::get(medialink_url("/health")).await.expect("health");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running medialink server"]
    async fn test_should_reject_non_numeric_limit() {
        let resp = reqwest::get(medialink_url("/media?limit=abc"))
            .await
            .expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        let json: serde_json::Value = resp.json().await.expect("json");
        assert!(json["error"].as_str().is_some_and(|e| e.contains("limit")));
    }

    #[tokio::test]
    #[ignore = "requires running medialink server"]
    async fn test_should_return_not_found_for_unknown_route() {
        let resp = reqwest::get(medialink_url("/videos")).await.expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running medialink server"]
    async fn test_should_answer_preflight() {
        let resp = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, medialink_url("/media"))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-methods")
                .and_then(|v| v.to_str().ok()),
            Some("GET, OPTIONS")
        );
    }
}
