//! Built-in `system` component.
//!
//! The shell always hosts one component that is not a plugin: the
//! `system` component, exposing app launching, notifications, and
//! dialogs. Its handlers do nothing but emit the corresponding shell
//! event; whatever surface is listening (a desktop, a test harness)
//! decides what the event means.
//!
//! | Action        | Emits               | Returns         |
//! |---------------|---------------------|-----------------|
//! | `launch_app`  | `app:launch`        | `{launched}`    |
//! | `notify`      | `notification:show` | —               |
//! | `show_dialog` | `dialog:open`       | `{dialogId}`    |

use crate::dispatcher::{handler_fn, Dispatcher};
use crate::registry::ComponentRegistry;
use crate::schema::ActionSchema;
use atrium_event::EventBus;
use atrium_types::{ActionSpec, Component, ParameterSpec};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of the built-in component.
pub const SYSTEM_COMPONENT_ID: &str = "system";

/// Installer for the built-in `system` component.
pub struct SystemActions;

impl SystemActions {
    /// Registers the `system` component and binds its handlers.
    ///
    /// Safe to call more than once; registration and binding both
    /// overwrite.
    pub fn install(dispatcher: &Dispatcher, registry: &ComponentRegistry) {
        let component = Component::new(SYSTEM_COMPONENT_ID, "system", "System")
            .with_description("Built-in shell actions")
            .with_action(
                ActionSpec::new("launch_app", "Launch App")
                    .with_description("Open an application by id")
                    .with_parameter(ParameterSpec::required("appId", "string")),
            )
            .with_action(
                ActionSpec::new("notify", "Notify")
                    .with_description("Show a notification")
                    .with_parameter(ParameterSpec::required("message", "string"))
                    .with_parameter(ParameterSpec::new("severity", "string").with_allowed(vec![
                        json!("info"),
                        json!("warn"),
                        json!("error"),
                    ])),
            )
            .with_action(
                ActionSpec::new("show_dialog", "Show Dialog")
                    .with_description("Open a modal dialog")
                    .with_parameter(ParameterSpec::required("title", "string"))
                    .with_parameter(ParameterSpec::new("message", "string")),
            );
        registry.register(component);

        dispatcher.register_schema(
            SYSTEM_COMPONENT_ID,
            "launch_app",
            ActionSchema::object()
                .property("appId", ActionSchema::string())
                .require("appId"),
        );
        dispatcher.register_schema(
            SYSTEM_COMPONENT_ID,
            "notify",
            ActionSchema::object()
                .property("message", ActionSchema::string().max_length(500))
                .property(
                    "severity",
                    ActionSchema::string().one_of(vec![
                        json!("info"),
                        json!("warn"),
                        json!("error"),
                    ]),
                )
                .require("message"),
        );
        dispatcher.register_schema(
            SYSTEM_COMPONENT_ID,
            "show_dialog",
            ActionSchema::object()
                .property("title", ActionSchema::string())
                .property("message", ActionSchema::string())
                .require("title"),
        );

        let bus = Arc::clone(dispatcher.bus());
        dispatcher.bind_handler(SYSTEM_COMPONENT_ID, "launch_app", {
            let bus = Arc::clone(&bus);
            handler_fn(move |params: Value| {
                let bus = Arc::clone(&bus);
                async move {
                    let app_id = params["appId"].as_str().unwrap_or_default().to_string();
                    bus.emit("app:launch", json!({ "appId": app_id }));
                    Ok(json!({ "launched": app_id }))
                }
            })
        });

        dispatcher.bind_handler(SYSTEM_COMPONENT_ID, "notify", {
            let bus = Arc::clone(&bus);
            handler_fn(move |params: Value| {
                let bus = Arc::clone(&bus);
                async move {
                    let message = params["message"].as_str().unwrap_or_default().to_string();
                    let severity = params["severity"].as_str().unwrap_or("info").to_string();
                    bus.emit(
                        "notification:show",
                        json!({ "message": message, "severity": severity }),
                    );
                    Ok(Value::Null)
                }
            })
        });

        dispatcher.bind_handler(SYSTEM_COMPONENT_ID, "show_dialog", {
            let bus = Arc::clone(&bus);
            handler_fn(move |params: Value| {
                let bus = Arc::clone(&bus);
                async move {
                    let dialog_id = Uuid::new_v4().to_string();
                    bus.emit(
                        "dialog:open",
                        json!({
                            "dialogId": dialog_id,
                            "title": params["title"].clone(),
                            "message": params["message"].clone(),
                        }),
                    );
                    Ok(json!({ "dialogId": dialog_id }))
                }
            })
        });
    }
}
