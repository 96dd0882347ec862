use super::models::{
    decode_variables, CountResponse, ProcessDefinition, ProcessInstance, Record, Variable,
};
use super::resources::TypedResource;
use super::EngineError;
use crate::config::Environment;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const COUNT_TIMEOUT: Duration = Duration::from_secs(5);

/// A single `param=value` restriction carried forward from a drilldown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub param: String,
    pub value: String,
}

impl Filter {
    pub fn new(param: &str, value: &str) -> Self {
        Self {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: usize,
}

#[derive(Clone)]
pub struct EngineClient {
    base_url: String,
    authorization: Option<String>,
    agent: ureq::Agent,
}

impl std::fmt::Debug for EngineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.authorization.is_some())
            .finish()
    }
}

fn query_pairs(filter: Option<&Filter>, window: Option<PageWindow>) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(filter) = filter.filter(|f| !f.param.is_empty() && !f.value.is_empty()) {
        query.push((filter.param.clone(), filter.value.clone()));
    }
    if let Some(window) = window.filter(|w| w.limit > 0) {
        query.push(("firstResult".to_string(), window.offset.to_string()));
        query.push(("maxResults".to_string(), window.limit.to_string()));
    }
    query
}

impl EngineClient {
    pub fn new(environment: &Environment) -> Self {
        let authorization = (!environment.username.is_empty()).then(|| {
            let credentials = format!("{}:{}", environment.username, environment.password);
            format!("Basic {}", STANDARD.encode(credentials))
        });
        Self {
            base_url: environment.url.trim().trim_end_matches('/').to_string(),
            authorization,
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    fn endpoint(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{encoded}");
        }
        url
    }

    fn request(&self, method: &str, url: &str, timeout: Duration) -> ureq::Request {
        let request = self
            .agent
            .request(method, url)
            .timeout(timeout)
            .set("Accept", "application/json");
        match &self.authorization {
            Some(value) => request.set("Authorization", value),
            None => request,
        }
    }

    fn call_error(url: &str, err: ureq::Error) -> EngineError {
        match err {
            ureq::Error::Status(status, response) => EngineError::Status {
                url: url.to_string(),
                status,
                body: response.into_string().unwrap_or_default().trim().to_string(),
            },
            ureq::Error::Transport(transport) => EngineError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, EngineError> {
        let response = self
            .request("GET", url, timeout)
            .call()
            .map_err(|err| Self::call_error(url, err))?;
        response.into_json::<T>().map_err(|e| EngineError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    pub fn fetch_definitions(
        &self,
        window: PageWindow,
    ) -> Result<Vec<ProcessDefinition>, EngineError> {
        let url = self.endpoint(
            TypedResource::Definitions.collection_path(),
            &query_pairs(None, Some(window)),
        );
        self.get_json(&url, REQUEST_TIMEOUT)
    }

    pub fn fetch_instances(
        &self,
        filter: Option<&Filter>,
        window: PageWindow,
    ) -> Result<Vec<ProcessInstance>, EngineError> {
        let url = self.endpoint(
            TypedResource::Instances.collection_path(),
            &query_pairs(filter, Some(window)),
        );
        self.get_json(&url, REQUEST_TIMEOUT)
    }

    pub fn fetch_variables(&self, instance_id: &str) -> Result<Vec<Variable>, EngineError> {
        if instance_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "missing process instance id".to_string(),
            ));
        }
        let path = format!(
            "process-instance/{}/variables",
            urlencoding::encode(instance_id)
        );
        let url = self.endpoint(&path, &[]);
        let body: Value = self.get_json(&url, REQUEST_TIMEOUT)?;
        decode_variables(body).map_err(|message| EngineError::Decode { url, message })
    }

    /// Lists an arbitrary collection as loosely-typed records.
    pub fn fetch_collection(
        &self,
        resource: &str,
        filter: Option<&Filter>,
        window: PageWindow,
    ) -> Result<Vec<Record>, EngineError> {
        let url = self.endpoint(resource, &query_pairs(filter, Some(window)));
        self.get_json(&url, REQUEST_TIMEOUT)
    }

    /// Best-effort `{collection}/count`; any failure yields `None`.
    pub fn count(&self, collection: &str, filter: Option<&Filter>) -> Option<u64> {
        let path = format!("{}/count", collection.trim_end_matches('/'));
        let url = self.endpoint(&path, &query_pairs(filter, None));
        let body: CountResponse = self.get_json(&url, COUNT_TIMEOUT).ok()?;
        body.count
            .filter(|count| count.is_finite() && *count >= 0.0)
            .map(|count| count as u64)
    }

    pub fn set_variable(
        &self,
        instance_id: &str,
        name: &str,
        value: &Value,
        type_name: &str,
    ) -> Result<(), EngineError> {
        if instance_id.trim().is_empty() || name.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "missing instance or variable name".to_string(),
            ));
        }
        let path = format!(
            "process-instance/{}/variables/{}",
            urlencoding::encode(instance_id),
            urlencoding::encode(name)
        );
        let url = self.endpoint(&path, &[]);
        let mut body = json!({ "value": value });
        if !type_name.is_empty() {
            body["type"] = Value::String(type_name.to_string());
        }
        self.request("PUT", &url, REQUEST_TIMEOUT)
            .send_json(body)
            .map_err(|err| Self::call_error(&url, err))?;
        Ok(())
    }

    pub fn delete_instance(&self, instance_id: &str) -> Result<(), EngineError> {
        if instance_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "missing process instance id".to_string(),
            ));
        }
        let path = format!("process-instance/{}", urlencoding::encode(instance_id));
        let url = self.endpoint(&path, &[]);
        self.request("DELETE", &url, REQUEST_TIMEOUT)
            .call()
            .map_err(|err| Self::call_error(&url, err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(url: &str, username: &str) -> Environment {
        Environment {
            url: url.to_string(),
            username: username.to_string(),
            password: "secret".to_string(),
            ui_color: None,
        }
    }

    #[test]
    fn endpoint_joins_base_and_encodes_query() {
        let client = EngineClient::new(&environment("http://engine:8080/engine-rest/", ""));
        let url = client.endpoint(
            "process-instance",
            &query_pairs(
                Some(&Filter::new("businessKey", "a b&c")),
                Some(PageWindow {
                    offset: 20,
                    limit: 10,
                }),
            ),
        );
        assert_eq!(
            url,
            "http://engine:8080/engine-rest/process-instance?businessKey=a%20b%26c&firstResult=20&maxResults=10"
        );
    }

    #[test]
    fn empty_filters_and_zero_limits_are_omitted() {
        assert!(query_pairs(Some(&Filter::new("processDefinitionKey", "")), None).is_empty());
        assert!(query_pairs(
            None,
            Some(PageWindow {
                offset: 5,
                limit: 0
            })
        )
        .is_empty());
    }

    #[test]
    fn basic_auth_is_only_sent_with_a_username() {
        let anonymous = EngineClient::new(&environment("http://engine", ""));
        assert!(anonymous.authorization.is_none());

        let client = EngineClient::new(&environment("http://engine", "demo"));
        assert_eq!(
            client.authorization.as_deref(),
            Some("Basic ZGVtbzpzZWNyZXQ=")
        );
    }
}
