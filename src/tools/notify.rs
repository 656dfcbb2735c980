//! Desktop notification tool.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use super::base::{require_str, Tool};

/// Tool to display a desktop notification.
///
/// Uses `osascript` on macOS and `notify-send` elsewhere. The command
/// blocks the round trip until it returns; a failing command becomes a
/// tool-result failure, not a crash.
pub struct NotifyTool;

impl NotifyTool {
    #[cfg(target_os = "macos")]
    fn command(title: &str, message: &str) -> Command {
        // AppleScript string literals only need double quotes and
        // backslashes escaped.
        let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            escape(message),
            escape(title)
        );
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        cmd
    }

    #[cfg(not(target_os = "macos"))]
    fn command(title: &str, message: &str) -> Command {
        let mut cmd = Command::new("notify-send");
        cmd.arg(title).arg(message);
        cmd
    }
}

#[async_trait]
impl Tool for NotifyTool {
    fn name(&self) -> &str {
        "notify"
    }

    fn description(&self) -> &str {
        "Display a notification on the user's desktop"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title of the notification"
                },
                "message": {
                    "type": "string",
                    "description": "The message content of the notification"
                }
            },
            "required": ["title", "message"]
        })
    }

    async fn execute(&self, args: HashMap<String, serde_json::Value>) -> Result<String> {
        let title = require_str(&args, "title")?;
        let message = require_str(&args, "message")?;

        let output = Self::command(title, message).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("notification command failed: {}", stderr.trim());
        }
        Ok("Notification displayed successfully".to_string())
    }
}
