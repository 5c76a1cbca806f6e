//! Records a short macro against the built-in system component, then
//! replays it.
//!
//! ```sh
//! cargo run -p atrium-app --example record_replay
//! ```

use atrium_app::AtriumApp;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let app = AtriumApp::builder().with_memory_store().build().await?;

    // Watch what the replay will re-trigger.
    let _watch = app.subscribe_event("notification:show", |data| {
        println!("notification: {data}");
    });

    app.start_recording();
    app.execute_action("system", "notify", Some(json!({"message": "good morning"})))
        .await;
    app.execute_action("system", "launch_app", Some(json!({"appId": "mail"})))
        .await;
    let saved = app.stop_recording("morning routine", Some("notify, then open mail")).await?;
    println!("recorded '{}' with {} steps", saved.name, saved.steps.len());

    let report = app.run_macro(saved.id).await;
    println!(
        "replayed: {} of {} steps succeeded",
        report.succeeded(),
        report.results.len()
    );

    Ok(())
}
