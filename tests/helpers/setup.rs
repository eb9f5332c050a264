use lull_api::Application;
use lull_infra::{Config, InMemoryNotifier, LullContext, ScriptedLlmClient, StaticTimeSys};
use lull_sdk::LullSDK;
use std::sync::Arc;

/// 2026-01-31 10:00 in Shanghai
pub const NOW: i64 = 1_769_824_800_000;

pub struct TestApp {
    pub config: Config,
    pub ctx: LullContext,
    pub llm: Arc<ScriptedLlmClient>,
    pub notifier: Arc<InMemoryNotifier>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, LullSDK, String) {
    let llm = Arc::new(ScriptedLlmClient::new());
    let notifier = Arc::new(InMemoryNotifier::new());

    let mut ctx = LullContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.timezone = chrono_tz::Asia::Shanghai;
    ctx.sys = Arc::new(StaticTimeSys {
        timestamp_millis: NOW,
    });
    ctx.llm = llm.clone();
    ctx.notifier = notifier.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        ctx,
        llm,
        notifier,
    };
    let sdk = LullSDK::new(address.clone(), "ann@example.com");
    (app, sdk, address)
}
