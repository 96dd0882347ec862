use super::table::TableData;
use crate::engine::{Filter, TypedResource, RESOURCE_INSTANCES, RESOURCE_VARIABLES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Definitions,
    Instances,
    Variables,
    Generic,
}

impl ViewMode {
    pub fn for_resource(resource: &str) -> Self {
        match TypedResource::from_name(resource) {
            Some(TypedResource::Definitions) => Self::Definitions,
            Some(TypedResource::Instances) => Self::Instances,
            Some(TypedResource::Variables) => Self::Variables,
            None => Self::Generic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Definitions => "definitions",
            Self::Instances => "instances",
            Self::Variables => "variables",
            Self::Generic => "generic",
        }
    }
}

/// One navigable screen, restorable without refetching.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Table and paging key of the view.
    pub resource: String,
    pub breadcrumb: Vec<String>,
    pub header: String,
    pub selected_definition_key: Option<String>,
    pub selected_instance_id: Option<String>,
    /// Filter the instances were listed with.
    pub instance_filter: Option<Filter>,
    pub table: TableData,
}

impl ViewState {
    /// Well-known collections are keyed by their canonical name whatever spelling was used.
    pub fn root(resource: &str) -> Self {
        let resource = TypedResource::from_name(resource)
            .map(TypedResource::resource_name)
            .unwrap_or(resource);
        Self {
            mode: ViewMode::for_resource(resource),
            resource: resource.to_string(),
            breadcrumb: vec![resource.to_string()],
            header: resource.to_string(),
            selected_definition_key: None,
            selected_instance_id: None,
            instance_filter: None,
            table: TableData::default(),
        }
    }

    /// The child view for a drill into instances, keeping this view's table on screen.
    pub fn instances_of(&self, key: &str, filter: Option<Filter>) -> Self {
        let mut breadcrumb = self.breadcrumb.clone();
        breadcrumb.push(RESOURCE_INSTANCES.to_string());
        Self {
            mode: ViewMode::Instances,
            resource: RESOURCE_INSTANCES.to_string(),
            breadcrumb,
            header: format!("{RESOURCE_INSTANCES}({key})"),
            selected_definition_key: Some(key.to_string()),
            selected_instance_id: None,
            instance_filter: filter,
            table: self.table.clone(),
        }
    }

    pub fn variables_of(&self, instance_id: &str) -> Self {
        let mut breadcrumb = self.breadcrumb.clone();
        breadcrumb.push(RESOURCE_VARIABLES.to_string());
        Self {
            mode: ViewMode::Variables,
            resource: RESOURCE_VARIABLES.to_string(),
            breadcrumb,
            header: format!("{RESOURCE_INSTANCES}({instance_id})"),
            selected_definition_key: self.selected_definition_key.clone(),
            selected_instance_id: Some(instance_id.to_string()),
            instance_filter: self.instance_filter.clone(),
            table: self.table.clone(),
        }
    }

    pub fn level(&self) -> usize {
        self.breadcrumb.len().saturating_sub(1)
    }
}

/// Views left behind by drilling in, most recent last.
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    states: Vec<ViewState>,
}

impl NavigationStack {
    pub fn push(&mut self, state: ViewState) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<ViewState> {
        self.states.pop()
    }

    pub fn get(&self, index: usize) -> Option<&ViewState> {
        self.states.get(index)
    }

    /// Keeps the first `len` states.
    pub fn truncate(&mut self, len: usize) {
        self.states.truncate(len);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
