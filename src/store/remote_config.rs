//! Remote config template checks shared by every store

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::StoreError;

/// Template returned before anything was published
pub fn empty_template() -> Value {
    json!({ "conditions": [], "parameters": {} })
}

/// Structural checks a template must pass before it can be published
pub fn validate_template(template: &Value) -> Result<(), StoreError> {
    let invalid = |msg: String| Err(StoreError::InvalidTemplate(msg));

    let Some(root) = template.as_object() else {
        return invalid("template must be a JSON object".to_string());
    };

    if let Some(parameters) = root.get("parameters") {
        let Some(parameters) = parameters.as_object() else {
            return invalid("'parameters' must be an object".to_string());
        };
        for (key, parameter) in parameters {
            let has_value = parameter
                .as_object()
                .is_some_and(|p| p.contains_key("defaultValue") || p.contains_key("conditionalValues"));
            if !has_value {
                return invalid(format!(
                    "parameter '{}' needs a 'defaultValue' or 'conditionalValues'",
                    key
                ));
            }
        }
    }

    if let Some(conditions) = root.get("conditions") {
        let Some(conditions) = conditions.as_array() else {
            return invalid("'conditions' must be an array".to_string());
        };
        for (index, condition) in conditions.iter().enumerate() {
            let field = |name: &str| condition.get(name).and_then(Value::as_str);
            if field("name").is_none() || field("expression").is_none() {
                return invalid(format!(
                    "condition #{} needs a string 'name' and 'expression'",
                    index
                ));
            }
        }
    }

    if root.get("parameterGroups").is_some_and(|g| !g.is_object()) {
        return invalid("'parameterGroups' must be an object".to_string());
    }

    Ok(())
}

/// Stamp the next version onto a template that is about to replace `previous`
pub fn stamp_version(mut template: Value, previous: Option<&Value>) -> Value {
    let previous_number = previous
        .and_then(|p| p.pointer("/version/versionNumber"))
        .and_then(version_number)
        .unwrap_or(0);

    if let Some(root) = template.as_object_mut() {
        let mut version = Map::new();
        version.insert(
            "versionNumber".to_string(),
            Value::String((previous_number + 1).to_string()),
        );
        version.insert(
            "updateTime".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        root.insert("version".to_string(), Value::Object(version));
    }
    template
}

// Version numbers are published as strings but older files may carry numbers
fn version_number(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        other => other.as_u64(),
    }
}
