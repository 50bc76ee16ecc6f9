//! End-to-end gateway tests over an emulator bucket.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::StorageClass;
    use medialink_http::ApiGatewayRequest;

    use crate::{cleanup_bucket, create_test_bucket, gateway, put_object, s3_client, seed_bucket};

    fn body(resp: &medialink_http::ApiGatewayResponse) -> serde_json::Value {
        serde_json::from_str(&resp.body).expect("json body")
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_list_and_sign_prefix() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "gw-list").await;
        seed_bucket(
            &client,
            &bucket,
            &["photos/a.jpg", "photos/b.jpg", "photos/c.jpg"],
        )
        .await;

        let req = ApiGatewayRequest::get("/media")
            .with_query("prefix", "photos")
            .with_query("max", "2");
        let resp = gateway(&client, &bucket).handle(req).await;

        assert_eq!(resp.status_code, 200);
        let json = body(&resp);
        assert_eq!(json["message"], "success");
        let contents = json["contents"].as_array().expect("contents");
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["key"], "photos/a.jpg");
        assert!(
            contents[0]["url"]
                .as_str()
                .is_some_and(|u| u.contains("X-Amz-Expires=21600"))
        );
        assert!(json["nextContinuationToken"].is_string());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_skip_archived_and_empty_objects() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "gw-filter").await;
        put_object(&client, &bucket, "m/live.jpg", b"x", StorageClass::Standard).await;
        put_object(&client, &bucket, "m/cold.jpg", b"x", StorageClass::Glacier).await;
        put_object(&client, &bucket, "m/empty.jpg", b"", StorageClass::Standard).await;

        let req = ApiGatewayRequest::get("/media").with_query("prefix", "/m/");
        let resp = gateway(&client, &bucket).handle(req).await;

        assert_eq!(resp.status_code, 200);
        let json = body(&resp);
        let keys: Vec<_> = json["contents"]
            .as_array()
            .expect("contents")
            .iter()
            .filter_map(|c| c["key"].as_str())
            .collect();
        assert_eq!(keys, ["m/live.jpg"]);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_get_existing_and_reject_missing_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "gw-get").await;
        seed_bucket(&client, &bucket, &["abc.jpg"]).await;
        let gw = gateway(&client, &bucket);

        let resp = gw
            .handle(ApiGatewayRequest::get("/media/{key}").with_path_param("key", "abc.jpg"))
            .await;
        assert_eq!(resp.status_code, 200);
        let json = body(&resp);
        assert_eq!(json["key"], "abc.jpg");
        assert_eq!(json["expiresIn"], 86_400);

        let resp = gw
            .handle(ApiGatewayRequest::get("/media/{key}").with_path_param("key", "nope.jpg"))
            .await;
        assert_eq!(resp.status_code, 404);

        cleanup_bucket(&client, &bucket).await;
    }
}
