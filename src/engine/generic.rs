use super::client::{EngineClient, Filter, PageWindow};
use super::models::{to_record, ProcessDefinition, ProcessInstance, Record, Variable};
use super::resources::TypedResource;
use super::EngineError;

/// What a table fetch asks the engine for. Well-known collections take their typed path;
/// every other resource is listed generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Definitions,
    Instances { filter: Option<Filter> },
    Variables { instance_id: String },
    Collection { resource: String, filter: Option<Filter> },
}

impl FetchTarget {
    pub fn for_resource(resource: &str, filter: Option<Filter>) -> Self {
        match TypedResource::from_name(resource) {
            Some(TypedResource::Definitions) => Self::Definitions,
            Some(TypedResource::Instances) => Self::Instances { filter },
            Some(TypedResource::Variables) => Self::Variables {
                instance_id: filter.map(|f| f.value).unwrap_or_default(),
            },
            None => Self::Collection {
                resource: resource.trim_matches('/').to_string(),
                filter,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub environment: String,
    /// Table and paging key the result belongs to.
    pub resource: String,
    pub target: FetchTarget,
    pub window: PageWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Definitions(Vec<ProcessDefinition>),
    Instances(Vec<ProcessInstance>),
    Variables(Vec<Variable>),
    Records(Vec<Record>),
}

impl FetchPayload {
    pub fn len(&self) -> usize {
        match self {
            Self::Definitions(items) => items.len(),
            Self::Instances(items) => items.len(),
            Self::Variables(items) => items.len(),
            Self::Records(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<Record> {
        match self {
            Self::Definitions(items) => items.iter().map(to_record).collect(),
            Self::Instances(items) => items.iter().map(to_record).collect(),
            Self::Variables(items) => items
                .iter()
                .map(|variable| {
                    let mut record = Record::new();
                    record.insert("name".to_string(), variable.name.clone().into());
                    record.insert("value".to_string(), variable.value.clone());
                    record.insert("type".to_string(), variable.value_type.clone().into());
                    record
                })
                .collect(),
            Self::Records(items) => items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub resource: String,
    pub payload: FetchPayload,
    /// Total size of the collection when the count lookup succeeded.
    pub total: Option<u64>,
}

pub fn fetch(client: &EngineClient, request: &FetchRequest) -> Result<FetchOutcome, EngineError> {
    let (payload, total) = match &request.target {
        FetchTarget::Definitions => {
            let items = client.fetch_definitions(request.window)?;
            let total = client.count(TypedResource::Definitions.collection_path(), None);
            (FetchPayload::Definitions(items), total)
        }
        FetchTarget::Instances { filter } => {
            let items = client.fetch_instances(filter.as_ref(), request.window)?;
            let total = client.count(
                TypedResource::Instances.collection_path(),
                filter.as_ref(),
            );
            (FetchPayload::Instances(items), total)
        }
        FetchTarget::Variables { instance_id } => {
            let items = client.fetch_variables(instance_id)?;
            let total = Some(items.len() as u64);
            (FetchPayload::Variables(items), total)
        }
        FetchTarget::Collection { resource, filter } => {
            let items = client.fetch_collection(resource, filter.as_ref(), request.window)?;
            let total = client.count(resource, filter.as_ref());
            (FetchPayload::Records(items), total)
        }
    };
    Ok(FetchOutcome {
        resource: request.resource.clone(),
        payload,
        total,
    })
}

/// Column names for a collection without a table definition: the first record's keys, sorted.
pub fn inferred_column_names(records: &[Record]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let mut names = first.keys().cloned().collect::<Vec<_>>();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_known_resources_take_typed_targets() {
        assert_eq!(
            FetchTarget::for_resource("process-definitions", None),
            FetchTarget::Definitions
        );
        assert_eq!(
            FetchTarget::for_resource(
                "process-instance",
                Some(Filter::new("processDefinitionKey", "invoice"))
            ),
            FetchTarget::Instances {
                filter: Some(Filter::new("processDefinitionKey", "invoice"))
            }
        );
        assert_eq!(
            FetchTarget::for_resource("process-variables", Some(Filter::new("", "i-9"))),
            FetchTarget::Variables {
                instance_id: "i-9".to_string()
            }
        );
        assert_eq!(
            FetchTarget::for_resource("/task", None),
            FetchTarget::Collection {
                resource: "task".to_string(),
                filter: None
            }
        );
    }

    #[test]
    fn inferred_columns_are_sorted_keys_of_first_record() {
        let records = vec![
            to_record(&json!({"name": "Review", "id": "t1", "assignee": "kermit"})),
            to_record(&json!({"other": 1})),
        ];
        assert_eq!(
            inferred_column_names(&records),
            vec!["assignee", "id", "name"]
        );
        assert!(inferred_column_names(&[]).is_empty());
    }

    #[test]
    fn variable_payload_exposes_name_value_type_records() {
        let payload = FetchPayload::Variables(vec![Variable {
            name: "amount".to_string(),
            value: json!(12.5),
            value_type: "Double".to_string(),
        }]);
        let records = payload.records();
        assert_eq!(records[0]["name"], json!("amount"));
        assert_eq!(records[0]["value"], json!(12.5));
        assert_eq!(records[0]["type"], json!("Double"));
    }
}
