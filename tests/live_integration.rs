use huddle_http::{ClientOptions, HuddleApi, ServiceUrls};

/// Runs against real services only when their origins are configured.
fn live_api() -> Option<HuddleApi> {
    std::env::var("COMPOSITE_CHATBOT_SERVICE_URL").ok()?;
    let urls = ServiceUrls::from_env();
    let options = ClientOptions {
        timeout_ms: 10_000,
        max_retries: 1,
        retry_backoff_ms: 250,
    };
    match HuddleApi::new(&urls, options) {
        Ok(api) => Some(api),
        Err(err) => {
            eprintln!("skipping live test: invalid service urls: {err}");
            None
        }
    }
}

#[tokio::test]
async fn live_read_paths_never_fail() {
    let Some(api) = live_api() else {
        eprintln!("skipping live test: COMPOSITE_CHATBOT_SERVICE_URL not set");
        return;
    };

    let questions = api.get_question("live-test@example.com", "live-meeting:0").await;
    assert_eq!(questions.code, 200);
    assert!(!questions.questions.is_empty());

    // Either real records or an empty list; the call itself must not fail.
    let _ = api.get_transcriptions().await;
}
