use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One loosely-typed row of a collection response.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessDefinition {
    pub id: String,
    pub key: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub version: i64,
    pub resource: Option<String>,
    pub deployment_id: Option<String>,
    pub diagram: Option<String>,
    pub suspended: bool,
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessInstance {
    pub id: String,
    #[serde(alias = "processDefinitionId")]
    pub definition_id: Option<String>,
    pub business_key: Option<String>,
    pub case_instance_id: Option<String>,
    pub ended: bool,
    pub suspended: bool,
    pub tenant_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct VariableValue {
    value: Value,
    #[serde(rename = "type")]
    value_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CountResponse {
    pub(crate) count: Option<f64>,
}

/// Accepts both `{name: {value, type}}` and `[{name, value, type}]` bodies, sorted by name.
pub fn decode_variables(body: Value) -> Result<Vec<Variable>, String> {
    let mut variables = match body {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, raw)| {
                let parsed: VariableValue =
                    serde_json::from_value(raw).map_err(|e| format!("variable `{name}`: {e}"))?;
                Ok(Variable {
                    name,
                    value: parsed.value,
                    value_type: parsed.value_type.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, String>>()?,
        Value::Array(items) => items
            .into_iter()
            .map(|raw| serde_json::from_value::<Variable>(raw).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, String>>()?,
        Value::Null => Vec::new(),
        other => {
            return Err(format!(
                "expected an object or array of variables, got `{other}`"
            ))
        }
    };
    variables.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(variables)
}

/// Renders a JSON value as table cell text; strings are unquoted and null is empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn to_record<T: Serialize>(item: &T) -> Record {
    match serde_json::to_value(item) {
        Ok(Value::Object(map)) => map,
        _ => Record::new(),
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the value for a column name: exact, lower-case, camelCase, then any key that matches
/// ignoring case and separators. Missing values are `None`, never an error.
pub fn lookup_field<'a>(record: &'a Record, column: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(column) {
        return Some(value);
    }
    let lower = column.to_lowercase();
    if let Some(value) = record.get(&lower) {
        return Some(value);
    }
    if let Some(value) = record.get(&camel_case(&lower)) {
        return Some(value);
    }
    let wanted = squash(column);
    record
        .iter()
        .find(|(key, _)| squash(key) == wanted)
        .map(|(_, value)| value)
}

pub fn record_cell(record: &Record, column: &str) -> String {
    lookup_field(record, column)
        .map(display_value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variables_decode_from_map_bodies() {
        let variables = decode_variables(json!({
            "orderId": {"value": 42, "type": "Integer"},
            "approved": {"value": true, "type": "Boolean", "valueInfo": {}},
            "note": {"value": null, "type": "Null"}
        }))
        .expect("decode map");
        let names = variables.iter().map(|v| v.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["approved", "note", "orderId"]);
        assert_eq!(display_value(&variables[2].value), "42");
        assert_eq!(variables[2].value_type, "Integer");
        assert_eq!(display_value(&variables[1].value), "");
    }

    #[test]
    fn variables_decode_from_array_bodies() {
        let variables = decode_variables(json!([
            {"name": "customer", "value": "ACME", "type": "String"}
        ]))
        .expect("decode array");
        assert_eq!(display_value(&variables[0].value), "ACME");
    }

    #[test]
    fn variables_reject_scalar_bodies() {
        assert!(decode_variables(json!("nope")).is_err());
    }

    #[test]
    fn lookup_tries_fallback_spellings() {
        let record = to_record(&json!({
            "businessKey": "order-7",
            "ID": "abc",
            "start_time": "2026-01-01"
        }));
        assert_eq!(record_cell(&record, "businessKey"), "order-7");
        assert_eq!(record_cell(&record, "business_key"), "order-7");
        assert_eq!(record_cell(&record, "BUSINESSKEY"), "order-7");
        assert_eq!(record_cell(&record, "id"), "abc");
        assert_eq!(record_cell(&record, "startTime"), "2026-01-01");
        assert_eq!(record_cell(&record, "missing"), "");
    }

    #[test]
    fn instance_accepts_process_definition_id_spelling() {
        let instance: ProcessInstance = serde_json::from_value(json!({
            "id": "i-1",
            "processDefinitionId": "invoice:1:abc"
        }))
        .expect("decode instance");
        assert_eq!(instance.definition_id.as_deref(), Some("invoice:1:abc"));
        let record = to_record(&instance);
        assert_eq!(record_cell(&record, "definitionId"), "invoice:1:abc");
    }
}
