use serde_json::{json, Value};
use tracing::info;

use super::{Tool, ToolSpec};
use crate::config_manager::AGENT_LOGGER_NAME;
use crate::error::ToolError;

pub const WEATHER_TOOL_NAME: &str = "get_weather";

pub const DEFAULT_WEATHER: &str =
    "Weather information not available for this location. Try a major city like New York, London, or Tokyo.";

const WEATHER_DATA: [(&str, &str); 6] = [
    (
        "new york",
        "Sunny, 72°F (22°C). Light breeze from the west at 8 mph. Perfect day for outdoor activities!",
    ),
    (
        "london",
        "Cloudy with light rain, 15°C (59°F). Humidity at 78%. Don't forget your umbrella!",
    ),
    (
        "tokyo",
        "Partly cloudy, 18°C (64°F). Cherry blossoms are in bloom. Great weather for sightseeing.",
    ),
    (
        "paris",
        "Overcast, 16°C (61°F). Light winds from the northwest. Ideal weather for museum visits.",
    ),
    (
        "sydney",
        "Sunny and warm, 25°C (77°F). Perfect beach weather with gentle ocean breeze.",
    ),
    (
        "san francisco",
        "Foggy morning clearing to sunny, 19°C (66°F). Classic San Francisco weather!",
    ),
];

/// Look up the simulated weather for a city.
/// Matching ignores case and surrounding whitespace.
pub fn get_weather(city: &str) -> &'static str {
    info!(target: AGENT_LOGGER_NAME, "--- Tool: get_weather called for city: {} ---", city);

    let normalized = city.trim().to_lowercase();
    WEATHER_DATA
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, report)| *report)
        .unwrap_or(DEFAULT_WEATHER)
}

/// Static weather lookup exposed as a tool
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherTool;

impl Tool for WeatherTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: WEATHER_TOOL_NAME.to_string(),
            description: "Get current weather information for a city.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name to get weather for."
                    }
                },
                "required": ["city"]
            }),
        }
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let city = args
            .get("city")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: WEATHER_TOOL_NAME.to_string(),
                reason: "expected a string field 'city'".to_string(),
            })?;
        Ok(Value::String(get_weather(city).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        assert_eq!(get_weather("  New York  "), get_weather("new york"));
        assert_eq!(get_weather("TOKYO"), get_weather("tokyo"));
        assert!(get_weather("new york").starts_with("Sunny, 72°F"));
    }

    #[test]
    fn test_unknown_city_gets_default() {
        assert_eq!(get_weather("Atlantis"), DEFAULT_WEATHER);
        assert_eq!(get_weather(""), DEFAULT_WEATHER);
    }

    #[test]
    fn test_every_known_city_resolves() {
        for (city, report) in WEATHER_DATA {
            assert_eq!(get_weather(&city.to_uppercase()), report);
        }
    }

    #[test]
    fn test_tool_call_requires_city() {
        let err = WeatherTool.call(json!({"town": "Paris"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        let out = WeatherTool.call(json!({"city": " san francisco"})).unwrap();
        assert_eq!(out.as_str(), Some(get_weather("San Francisco")));
    }
}
