use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_audio_file(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/v1/audio/tts_missing.wav")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Audio file 'tts_missing.wav' does not exist");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_serve_files_outside_audio_directory(ctx: &TestContext) {
    // A file next to the audio directory must stay unreachable
    std::fs::create_dir_all(&ctx.audio_dir).unwrap();
    let outside = ctx.audio_dir.with_extension("secret");
    std::fs::write(&outside, b"secret").unwrap();
    let outside_name = outside.file_name().unwrap().to_string_lossy().into_owned();

    let response = ctx
        .client
        .get(&format!("/api/v1/audio/..%2F{}", outside_name))
        .await
        .unwrap();

    std::fs::remove_file(&outside).unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    assert_ne!(response.body_bytes, b"secret".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_serve_the_audio_directory_itself(ctx: &TestContext) {
    let response = ctx.client.get("/api/v1/audio/..").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_each_generated_file_by_name(ctx: &TestContext) {
    let mut filenames = Vec::new();
    for text in ["First clip", "Second clip"] {
        let response = ctx
            .client
            .post(
                "/api/v1/tts",
                &json!({ "text": text, "use_mistral": false, "return_audio": true }),
            )
            .await
            .unwrap();
        response.assert_status(StatusCode::OK);
        filenames.push(response.body()["audio_file"].as_str().unwrap().to_string());
    }

    assert_ne!(filenames[0], filenames[1]);

    for filename in &filenames {
        let response = ctx
            .client
            .get(&format!("/api/v1/audio/{}", filename))
            .await
            .unwrap();

        response
            .assert_status(StatusCode::OK)
            .assert_header("content-type", "audio/wav");
        let on_disk = std::fs::read(ctx.audio_dir.join(filename)).unwrap();
        assert_eq!(response.body_bytes, on_disk);
    }
}
