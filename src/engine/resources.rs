//! Resource names used in breadcrumbs and the engine paths behind them.

pub const RESOURCE_DEFINITIONS: &str = "process-definitions";
pub const RESOURCE_INSTANCES: &str = "process-instances";
pub const RESOURCE_VARIABLES: &str = "process-variables";

/// Root contexts offered by the selector even when no table is configured for them.
pub const BUILTIN_ROOTS: [&str; 6] = [
    RESOURCE_DEFINITIONS,
    RESOURCE_INSTANCES,
    RESOURCE_VARIABLES,
    "task",
    "job",
    "external-task",
];

pub fn is_definition_resource(name: &str) -> bool {
    matches!(name, "process-definition" | "process-definitions")
}

pub fn is_instance_resource(name: &str) -> bool {
    matches!(name, "process-instance" | "process-instances")
}

pub fn is_variable_resource(name: &str) -> bool {
    matches!(
        name,
        "process-variables" | "variables" | "variable-instance" | "variable-instances"
    )
}

/// Collections with a schema-specific fetch path. Everything else is generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedResource {
    Definitions,
    Instances,
    Variables,
}

impl TypedResource {
    pub fn from_name(name: &str) -> Option<Self> {
        if is_definition_resource(name) {
            Some(Self::Definitions)
        } else if is_instance_resource(name) {
            Some(Self::Instances)
        } else if is_variable_resource(name) {
            Some(Self::Variables)
        } else {
            None
        }
    }

    /// Breadcrumb and paging key.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Definitions => RESOURCE_DEFINITIONS,
            Self::Instances => RESOURCE_INSTANCES,
            Self::Variables => RESOURCE_VARIABLES,
        }
    }

    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Definitions => "process-definition",
            Self::Instances | Self::Variables => "process-instance",
        }
    }

    pub fn is_paged(self) -> bool {
        !matches!(self, Self::Variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_resources_accept_singular_and_plural_names() {
        assert_eq!(
            TypedResource::from_name("process-definition"),
            Some(TypedResource::Definitions)
        );
        assert_eq!(
            TypedResource::from_name("process-instances"),
            Some(TypedResource::Instances)
        );
        assert_eq!(
            TypedResource::from_name("variable-instance"),
            Some(TypedResource::Variables)
        );
        assert_eq!(TypedResource::from_name("task"), None);
    }
}
