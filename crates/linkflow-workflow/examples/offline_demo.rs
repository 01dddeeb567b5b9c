/*
[INPUT]:  Nothing; the backend URL points at a closed local port
[OUTPUT]: Console walkthrough of offline login and a simulated task run
[POS]:    Demo binary - exercises LinkflowApp without a running backend
[UPDATE]: When the public workflow surface changes
*/

use std::sync::Arc;

use anyhow::Result;
use linkflow_adapter::{ClientConfig, LinkflowClient};
use linkflow_workflow::telemetry::init_tracing;
use linkflow_workflow::{
    ChannelSink, Credentials, LinkflowApp, MemorySessionStore, OfflineConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info")?;

    let client = LinkflowClient::with_config_and_base_url(
        ClientConfig::default(),
        "http://127.0.0.1:9",
    )?;
    let offline = OfflineConfig {
        login: true,
        ..OfflineConfig::default()
    };
    let (sink, mut notifications) = ChannelSink::new();
    let app = LinkflowApp::new(
        Arc::new(client),
        Arc::new(MemorySessionStore::new()),
        Arc::new(sink),
        offline,
    );

    let session = app.login(&Credentials::login("demo", "demo")).await?;
    println!("session: {}", session.token);

    app.submit("https://example.com/report")?;
    let run = app.workflow().wait_until_settled().await;
    println!(
        "task {}: {:?} {}% {}",
        run.run_id,
        run.status,
        run.progress_percent,
        run.result_message.as_deref().unwrap_or("-")
    );

    app.logout()?;
    println!("authenticated after logout: {}", app.is_authenticated());

    while let Ok(notification) = notifications.try_recv() {
        println!("[{:?}] {}", notification.kind, notification.message);
    }
    Ok(())
}
