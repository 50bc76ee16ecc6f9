//! S3 object store integration tests.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aws_sdk_s3::types::StorageClass as S3StorageClass;
    use medialink_core::model::StorageClass;
    use medialink_core::store::{ListObjectsRequest, ObjectStore};

    use crate::{cleanup_bucket, create_test_bucket, put_object, s3_client, s3_store, seed_bucket};

    fn request(prefix: &str, max_keys: i32, token: Option<String>) -> ListObjectsRequest {
        ListObjectsRequest {
            prefix: prefix.to_owned(),
            max_keys,
            continuation_token: token,
        }
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_list_page_and_follow_continuation_token() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-list").await;
        seed_bucket(
            &client,
            &bucket,
            &["photos/a.jpg", "photos/b.jpg", "photos/c.jpg", "docs/x.txt"],
        )
        .await;
        let store = s3_store(&client, &bucket);

        let first = store
            .list_objects(request("photos/", 2, None))
            .await
            .expect("list");
        let keys: Vec<_> = first.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["photos/a.jpg", "photos/b.jpg"]);
        assert_eq!(first.objects[0].size, Some(5));
        assert_eq!(first.objects[0].storage_class, Some(StorageClass::Standard));
        let token = first.next_continuation_token.expect("more pages");

        let second = store
            .list_objects(request("photos/", 2, Some(token)))
            .await
            .expect("list");
        assert_eq!(second.objects.len(), 1);
        assert_eq!(second.objects[0].key, "photos/c.jpg");
        assert!(second.next_continuation_token.is_none());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_report_storage_class() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-class").await;
        put_object(&client, &bucket, "cold.jpg", b"x", S3StorageClass::Glacier).await;
        let store = s3_store(&client, &bucket);

        let listing = store.list_objects(request("", 10, None)).await.expect("list");
        assert_eq!(listing.objects[0].storage_class, Some(StorageClass::Glacier));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_check_existence() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-head").await;
        seed_bucket(&client, &bucket, &["abc.jpg"]).await;
        let store = s3_store(&client, &bucket);

        assert!(store.object_exists("abc.jpg").await.expect("head"));
        assert!(!store.object_exists("nope.jpg").await.expect("head"));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running S3 emulator"]
    async fn test_should_issue_downloadable_presigned_url() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "store-sign").await;
        seed_bucket(&client, &bucket, &["clips/intro.mp4"]).await;
        let store = s3_store(&client, &bucket);

        let url = store
            .presign_get("clips/intro.mp4", Duration::from_secs(600))
            .await
            .expect("presign");
        assert!(url.contains("X-Amz-Expires=600"));

        let body = reqwest::get(&url)
            .await
            .expect("download")
            .error_for_status()
            .expect("status")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "media");

        cleanup_bucket(&client, &bucket).await;
    }
}
