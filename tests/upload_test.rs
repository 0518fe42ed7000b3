//! Integration tests for `POST /upload`.

mod common;

use common::{upload, upload_form, TestHarness};
use ei_core::config::Config;
use reqwest::multipart::{Form, Part};

#[tokio::test]
async fn upload_creates_record_with_aligned_titles() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = upload(
        addr,
        "E1",
        &[("a.png", b"aaaa"), ("b.png", b"bbbb")],
        &["Photo A"],
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Files uploaded successfully");
    assert_eq!(body["employee"]["employeeId"], "E1");

    let images = body["employee"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["title"], "Photo A");
    assert_eq!(images[1]["title"], "Untitled");

    for (img, data) in images.iter().zip([b"aaaa", b"bbbb"]) {
        let path = img["path"].as_str().unwrap();
        assert!(path.starts_with("uploads/images-"), "{path}");
        assert!(path.ends_with(".png"), "{path}");
        assert_eq!(std::fs::read(h.blob_path(path)).unwrap(), data);
    }
}

#[tokio::test]
async fn repeated_uploads_append() {
    let (_h, addr) = TestHarness::with_server().await;

    upload(addr, "E1", &[("a.png", b"a")], &[]).await;
    let resp = upload(addr, "E1", &[("b.png", b"b"), ("c.png", b"c")], &["B"]).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let images = body["employee"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0]["title"], "Untitled");
    assert_eq!(images[1]["title"], "B");
    assert_eq!(images[2]["title"], "Untitled");
}

#[tokio::test]
async fn bracketed_titles_are_accepted() {
    let (_h, addr) = TestHarness::with_server().await;

    let form = Form::new()
        .text("employeeId", "E1")
        .text("titles[]", "First")
        .text("titles[]", "Second")
        .part("images", Part::bytes(b"a".to_vec()).file_name("a.jpg"))
        .part("images", Part::bytes(b"b".to_vec()).file_name("b.jpg"));

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["employee"]["images"][0]["title"], "First");
    assert_eq!(body["employee"]["images"][1]["title"], "Second");
}

#[tokio::test]
async fn concurrent_uploads_keep_every_entry() {
    let (_h, addr) = TestHarness::with_server().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        handles.push(tokio::spawn(async move {
            let name = format!("{i}.png");
            let resp = upload(addr, "E1", &[(name.as_str(), b"x")], &[]).await;
            assert_eq!(resp.status(), 200);
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/images/E1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["images"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn upload_without_files_is_400() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = upload(addr, "E1", &[], &["lonely title"]).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "No files uploaded");
    assert_eq!(body["code"], "no_files_provided");

    let resp = reqwest::get(format!("http://{addr}/images/E1")).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(h.blob_count(), 0);
}

#[tokio::test]
async fn upload_without_employee_id_is_400() {
    let (h, addr) = TestHarness::with_server().await;

    let form = Form::new().part("images", Part::bytes(b"a".to_vec()).file_name("a.png"));
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "validation_error");
    assert_eq!(h.blob_count(), 0);
}

#[tokio::test]
async fn images_text_field_is_not_a_file() {
    let (h, addr) = TestHarness::with_server().await;

    let form = upload_form("E1", &[("a.png", b"a")], &[]).text("images", "not a file");
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["employee"]["images"].as_array().unwrap().len(), 1);
    assert_eq!(h.blob_count(), 1);

    // Only text parts named `images`: nothing was uploaded.
    let form = Form::new().text("employeeId", "E2").text("images", "still text");
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "no_files_provided");
}

#[tokio::test]
async fn too_many_files_is_400() {
    let mut config = Config::default();
    config.storage.max_files = 2;
    let (h, addr) = TestHarness::with_server_config(config).await;

    let files: Vec<(&str, &[u8])> = vec![("a.png", b"a"), ("b.png", b"b"), ("c.png", b"c")];
    let resp = upload(addr, "E1", &files, &[]).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(h.blob_count(), 0);
}

#[tokio::test]
async fn unexpected_file_field_is_400() {
    let (_h, addr) = TestHarness::with_server().await;

    let form = upload_form("E1", &[("a.png", b"a")], &[])
        .part("avatar", Part::bytes(b"x".to_vec()).file_name("x.png"));
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("avatar"));
}

#[tokio::test]
async fn uploaded_files_are_served_statically() {
    let (_h, addr) = TestHarness::with_server().await;

    let body: serde_json::Value = upload(addr, "E1", &[("a.png", b"pixels")], &[])
        .await
        .json()
        .await
        .unwrap();
    let path = body["employee"]["images"][0]["path"].as_str().unwrap();

    let resp = reqwest::get(format!("http://{addr}/{path}")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"pixels");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = upload(addr, "E1", &[("a.png", b"a")], &[]).await;
    assert!(resp.headers().contains_key("x-request-id"));
}
