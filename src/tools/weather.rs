//! Mock weather lookup tool.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::base::{require_str, Tool};

/// Canned weather report, useful for exercising the tool round trip
/// without any external service.
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The location to get the weather for, e.g. San Francisco, CA"
                },
                "format": {
                    "type": "string",
                    "description": "The format to return the weather in, e.g. celsius or fahrenheit",
                    "enum": ["celsius", "fahrenheit"]
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: HashMap<String, serde_json::Value>) -> Result<String> {
        let location = require_str(&args, "location")?;
        let format = args
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("celsius");
        Ok(format!("Today {} is sunny and 20 degrees {}", location, format))
    }
}
