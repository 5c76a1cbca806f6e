//! End-to-end tests over the assembled core.
//!
//! Everything here goes through the `AtriumApp` facade only, the way
//! an embedding host would.

use atrium_app::{
    handler_fn, ActionSchema, AtriumApp, AtriumConfig, Component, FileMacroStore, JsonRpcRequest,
    MacroStep, ParameterSpec, WaitOptions, ACTION_EXECUTED_EVENT,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn app() -> AtriumApp {
    AtriumApp::builder()
        .with_memory_store()
        .build()
        .await
        .expect("assemble core")
}

fn counter_component(id: &str) -> Component {
    Component::new(id, "plugin", "Counter").with_action(
        atrium_app::ActionSpec::new("add", "Add").with_parameter(ParameterSpec::required("n", "number")),
    )
}

#[tokio::test]
async fn isolated_instances_share_nothing() {
    let a = app().await;
    let b = app().await;

    a.register_component(counter_component("counter"));

    assert!(a.component("counter").is_some());
    assert!(b.component("counter").is_none());

    // Events on one bus never cross to the other.
    let crossed = Arc::new(Mutex::new(0));
    let _sub = b.subscribe_event("ping", {
        let crossed = Arc::clone(&crossed);
        move |_| *crossed.lock().unwrap() += 1
    });
    a.emit_event("ping", Value::Null);
    assert_eq!(*crossed.lock().unwrap(), 0);
}

#[tokio::test]
async fn component_snapshot_is_isolated_from_later_mutation() {
    let app = app().await;
    app.register_component(counter_component("one"));

    let snapshot = app.components();
    app.register_component(counter_component("two"));

    assert!(snapshot.iter().all(|c| c.id != "two"));
    assert!(app.components().iter().any(|c| c.id == "two"));
}

#[tokio::test]
async fn last_write_wins_component_registration() {
    let app = app().await;
    app.register_component(Component::new("dup", "plugin", "First"));
    app.register_component(Component::new("dup", "plugin", "Second"));

    assert_eq!(app.component("dup").map(|c| c.name), Some("Second".into()));
    assert_eq!(app.components().iter().filter(|c| c.id == "dup").count(), 1);
}

#[tokio::test]
async fn execute_unknown_action_fails_without_panicking() {
    let app = app().await;
    let result = app.execute_action("nope", "never", None).await;

    assert!(!result.success);
    assert_eq!(result.error_message(), "nope.never action not found");
}

#[tokio::test]
async fn dangerous_parameters_never_reach_handlers() {
    let app = app().await;
    let seen = Arc::new(Mutex::new(None));
    app.bind_action_handler("probe", "inspect", {
        let seen = Arc::clone(&seen);
        handler_fn(move |params| {
            *seen.lock().unwrap() = Some(params);
            async { Ok(Value::Null) }
        })
    });

    let _ = app
        .execute_action(
            "probe",
            "inspect",
            Some(json!({
                "deep": {"list": [{"constructor": "x", "ok": 1}]},
                "html": "careful <script>alert(1)</script> now",
                "url": "javascript:alert(2)",
            })),
        )
        .await;

    let params = seen.lock().unwrap().clone().expect("handler ran");
    assert_eq!(params["deep"]["list"][0], json!({"ok": 1}));
    assert_eq!(params["html"], json!("careful  now"));
    assert_eq!(params["url"], json!("alert(2)"));
}

#[tokio::test]
async fn schema_violations_report_every_problem_at_once() {
    let app = app().await;
    app.register_action_schema(
        "form",
        "submit",
        ActionSchema::object()
            .property("title", ActionSchema::string())
            .property("count", ActionSchema::number().range(0.0, 10.0))
            .require("title")
            .require("count"),
    );

    let result = app
        .execute_action("form", "submit", Some(json!({"count": 99})))
        .await;

    assert!(!result.success);
    let error = result.error_message();
    assert!(error.contains("$.title"), "missing required: {error}");
    assert!(error.contains("$.count"), "out of range: {error}");
}

#[tokio::test]
async fn waiter_resolves_from_a_system_action() {
    let app = Arc::new(app().await);

    let waiting = Arc::clone(&app);
    let wait = tokio::spawn(async move { waiting.wait_for_event("app:launch").await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = app
        .execute_action("system", "launch_app", Some(json!({"appId": "mail"})))
        .await;
    assert!(result.success);

    let payload = wait.await.unwrap().expect("event observed");
    assert_eq!(payload, json!({"appId": "mail"}));
}

#[tokio::test]
async fn wait_fans_out_to_every_concurrent_waiter() {
    let app = Arc::new(app().await);

    let mut waits = Vec::new();
    for _ in 0..3 {
        let app = Arc::clone(&app);
        waits.push(tokio::spawn(async move {
            app.wait_for_event_with("burst", WaitOptions::timeout(2_000)).await
        }));
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    app.emit_event("burst", json!({"n": 1}));

    for wait in waits {
        assert_eq!(wait.await.unwrap().expect("resolved"), json!({"n": 1}));
    }
}

#[tokio::test]
async fn wait_timeout_and_cancel_are_clean_errors() {
    let app = app().await;

    let timed_out = app
        .wait_for_event_with("never", WaitOptions::timeout(30))
        .await;
    assert!(timed_out.is_err());

    let app = Arc::new(app);
    let cancelled = {
        let app = Arc::clone(&app);
        tokio::spawn(async move {
            app.wait_for_event_with("doomed", WaitOptions::timeout(5_000)).await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(app.cancel_waits("doomed"), 1);
    assert!(cancelled.await.unwrap().is_err());
}

#[tokio::test]
async fn event_names_union_baseline_and_observed() {
    let app = app().await;
    app.emit_event("custom:thing", Value::Null);

    let names = app.event_names();
    assert!(names.contains(&"action:executed".to_string()));
    assert!(names.contains(&"custom:thing".to_string()));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn record_then_replay_through_the_facade() {
    let app = app().await;
    let notified = Arc::new(Mutex::new(Vec::new()));
    let _sub = app.subscribe_event("notification:show", {
        let notified = Arc::clone(&notified);
        move |data| notified.lock().unwrap().push(data.clone())
    });

    app.start_recording();
    let _ = app
        .execute_action("system", "notify", Some(json!({"message": "first"})))
        .await;
    let _ = app
        .execute_action("system", "notify", Some(json!({"message": "second"})))
        .await;
    let saved = app.stop_recording("two notes", None).await.expect("save");
    assert_eq!(saved.steps.len(), 2);

    let report = app.run_macro(saved.id).await;
    assert!(report.success);
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.success));

    // 2 live + 2 replayed notifications.
    assert_eq!(notified.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn failing_step_does_not_abort_replay() {
    let app = app().await;
    app.start_recording();
    let _ = app
        .execute_action("system", "notify", Some(json!({"message": "ok"})))
        .await;
    let _ = app.execute_action("ghost", "gone", None).await; // recorded as a failing step
    let _ = app
        .execute_action("system", "notify", Some(json!({"message": "still here"})))
        .await;
    let saved = app.stop_recording("resilient", None).await.expect("save");

    let report = app.run_macro(saved.id).await;
    assert!(report.success);
    assert_eq!(report.results.len(), 3);
    assert!(report.results[0].success);
    assert!(!report.results[1].success);
    assert!(report.results[2].success);
}

#[tokio::test]
async fn macro_table_survives_restart_via_file_store() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("macros.json");

    let saved = {
        let app = AtriumApp::builder()
            .with_store(Arc::new(FileMacroStore::new(path.clone()).unwrap()))
            .build()
            .await
            .unwrap();
        app.start_recording();
        let _ = app
            .execute_action("system", "notify", Some(json!({"message": "persisted"})))
            .await;
        app.stop_recording("durable", None).await.unwrap()
    };

    let reopened = AtriumApp::builder()
        .with_store(Arc::new(FileMacroStore::new(path).unwrap()))
        .build()
        .await
        .unwrap();

    let loaded = reopened.list_macros();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, saved.id);
    assert_eq!(loaded[0].steps, saved.steps);
}

#[tokio::test]
async fn recorder_misuse_is_an_error_not_a_crash() {
    let app = app().await;

    assert!(app.stop_recording("m", None).await.is_err());
    assert!(app.cancel_recording().is_err());

    app.start_recording();
    assert!(app.stop_recording("", None).await.is_err());
    assert!(app.is_recording(), "recording survives a bad name");
    assert_eq!(app.cancel_recording().unwrap(), 0);
}

#[tokio::test]
async fn rpc_request_drives_the_dispatcher() {
    let app = app().await;
    app.bind_action_handler(
        "mcp",
        "process_message",
        handler_fn(|params| async move {
            let method = params["message"]["method"].as_str().unwrap_or("").to_string();
            Ok(json!({"echoedMethod": method}))
        }),
    );

    let response = app
        .handle_rpc(JsonRpcRequest::new("tools/call", Some(json!({"name": "x"})), Some(json!(1))))
        .await;
    assert!(response.is_success());
    assert_eq!(response.result, Some(json!({"echoedMethod": "tools/call"})));

    let raw = app.handle_rpc_json("{broken").await;
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["error"]["code"], json!(-32700));
}

#[tokio::test]
async fn audit_trail_fires_for_every_dispatch() {
    let app = app().await;
    let audits = Arc::new(Mutex::new(0));
    let _sub = app.subscribe_event(ACTION_EXECUTED_EVENT, {
        let audits = Arc::clone(&audits);
        move |_| *audits.lock().unwrap() += 1
    });

    let _ = app
        .execute_action("system", "notify", Some(json!({"message": "hi"})))
        .await;
    let _ = app.execute_action("missing", "gone", None).await;
    let _ = app.execute_action("system", "notify", Some(json!({}))).await; // validation failure

    assert_eq!(*audits.lock().unwrap(), 3);
}

#[tokio::test]
async fn configured_default_timeout_applies() {
    let config = AtriumConfig::from_toml_str(
        r#"
        [events]
        default_timeout_ms = 40
        "#,
    )
    .unwrap();
    let app = AtriumApp::builder()
        .with_memory_store()
        .with_config(config)
        .build()
        .await
        .unwrap();

    let started = std::time::Instant::now();
    let result = app.wait_for_event("never:fires").await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn recorded_steps_carry_sanitized_parameters() {
    let app = app().await;
    app.bind_action_handler("p", "act", handler_fn(|_| async { Ok(Value::Null) }));

    app.start_recording();
    let _ = app
        .execute_action("p", "act", Some(json!({"__proto__": {"x": 1}, "keep": true})))
        .await;
    let saved = app.stop_recording("clean", None).await.unwrap();

    assert_eq!(saved.steps[0].parameters, Some(json!({"keep": true})));
    let step = MacroStep::new("p", "act");
    assert_eq!(step.component_id, "p");
}
