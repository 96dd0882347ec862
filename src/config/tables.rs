use super::ConfigError;
use crate::engine::resources::{is_instance_resource, is_variable_resource};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DRILL_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    #[serde(alias = "double", alias = "float")]
    Number,
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "boolean")]
    Bool,
    Json,
    User,
    Auto,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Json => "json",
            Self::User => "user",
            Self::Auto => "auto",
        }
    }
}

/// Column width as configured: a share of the table width, or auto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthSpec {
    Percent(u32),
    Auto,
}

impl WidthSpec {
    /// `"25%"` is a percentage; anything else, including `"0%"`, is auto.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return Self::Auto;
        };
        let Some(number) = raw.strip_suffix('%') else {
            return Self::Auto;
        };
        match number.trim().parse::<u32>() {
            Ok(percent) if percent > 0 => Self::Percent(percent),
            _ => Self::Auto,
        }
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub input_type: InputType,
}

impl ColumnDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            width: None,
            align: Align::Left,
            editable: false,
            input_type: InputType::Text,
        }
    }

    pub fn width_spec(&self) -> WidthSpec {
        WidthSpec::parse(self.width.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DrillDownDef {
    pub target: String,
    #[serde(default)]
    pub param: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl DrillDownDef {
    pub fn source_column(&self) -> &str {
        match self.column.as_deref().map(str::trim) {
            Some(column) if !column.is_empty() => column,
            _ => DEFAULT_DRILL_COLUMN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drilldown: Vec<DrillDownDef>,
}

impl TableDef {
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|column| column.visible).collect()
    }
}

/// Where a drilldown leads, resolved once when the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillTarget {
    Instances,
    Variables,
    Unsupported(String),
}

impl DrillTarget {
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        if is_instance_resource(target) {
            Self::Instances
        } else if is_variable_resource(target) {
            Self::Variables
        } else {
            Self::Unsupported(target.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillRule {
    pub target: DrillTarget,
    pub target_name: String,
    pub param: String,
    pub column: String,
}

impl DrillRule {
    pub fn new(target_name: &str, param: &str, column: &str) -> Self {
        Self {
            target: DrillTarget::parse(target_name),
            target_name: target_name.to_string(),
            param: param.to_string(),
            column: column.to_string(),
        }
    }

    fn from_def(def: &DrillDownDef) -> Self {
        Self::new(&def.target, def.param.trim(), def.source_column())
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    table: TableDef,
    drill_rules: Vec<DrillRule>,
}

/// Read-only view over the configured tables with tolerant name lookup.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    entries: Vec<CatalogEntry>,
}

impl TableCatalog {
    pub fn new(tables: Vec<TableDef>) -> Self {
        let entries = tables
            .into_iter()
            .map(|table| CatalogEntry {
                drill_rules: table.drilldown.iter().map(DrillRule::from_def).collect(),
                table,
            })
            .collect();
        Self { entries }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.table.name.trim().is_empty() {
                return Err(ConfigError::Tables(format!(
                    "table #{} must have a non-empty name",
                    index + 1
                )));
            }
            if let Some(column) = entry
                .table
                .columns
                .iter()
                .find(|column| column.name.trim().is_empty())
            {
                return Err(ConfigError::Tables(format!(
                    "table `{}` has a column with an empty name (width={:?})",
                    entry.table.name, column.width
                )));
            }
            if let Some(drill) = entry
                .table
                .drilldown
                .iter()
                .find(|drill| drill.target.trim().is_empty())
            {
                return Err(ConfigError::Tables(format!(
                    "table `{}` has a drilldown without target (param=`{}`)",
                    entry.table.name, drill.param
                )));
            }
        }
        Ok(())
    }

    /// Drill rules whose target has no view, as `(table, target)` pairs.
    pub fn unsupported_drill_targets(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry.drill_rules.iter().filter_map(|rule| match &rule.target {
                    DrillTarget::Unsupported(target) => {
                        Some((entry.table.name.clone(), target.clone()))
                    }
                    _ => None,
                })
            })
            .collect()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.table.name.clone())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&TableDef> {
        self.find_entry(name).map(|entry| &entry.table)
    }

    pub fn drill_rules(&self, name: &str) -> &[DrillRule] {
        self.find_entry(name)
            .map(|entry| entry.drill_rules.as_slice())
            .unwrap_or(&[])
    }

    fn find_entry(&self, name: &str) -> Option<&CatalogEntry> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.table.name == name) {
            return Some(entry);
        }

        let variant = match name.strip_suffix('s') {
            Some(singular) => singular.to_string(),
            None => format!("{name}s"),
        };
        if let Some(entry) = self.entries.iter().find(|entry| entry.table.name == variant) {
            return Some(entry);
        }

        let base = name.strip_suffix('s').unwrap_or(name);
        if base.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.table.name.starts_with(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_from_yaml(raw: &str) -> TableCatalog {
        let tables: Vec<TableDef> = serde_yaml::from_str(raw).expect("parse tables");
        TableCatalog::new(tables)
    }

    #[test]
    fn width_spec_parses_percentages_and_falls_back_to_auto() {
        assert_eq!(WidthSpec::parse(Some("25%")), WidthSpec::Percent(25));
        assert_eq!(WidthSpec::parse(Some(" 40 % ")), WidthSpec::Percent(40));
        assert_eq!(WidthSpec::parse(Some("0%")), WidthSpec::Auto);
        assert_eq!(WidthSpec::parse(Some("20")), WidthSpec::Auto);
        assert_eq!(WidthSpec::parse(Some("wide%")), WidthSpec::Auto);
        assert_eq!(WidthSpec::parse(None), WidthSpec::Auto);
    }

    #[test]
    fn column_defaults_apply_when_fields_are_omitted() {
        let column: ColumnDef = serde_yaml::from_str("name: key").expect("parse column");
        assert!(column.visible);
        assert!(!column.editable);
        assert_eq!(column.input_type, InputType::Text);
        assert_eq!(column.width_spec(), WidthSpec::Auto);

        let column: ColumnDef =
            serde_yaml::from_str("name: value\ninput_type: boolean\neditable: true")
                .expect("parse column");
        assert_eq!(column.input_type, InputType::Bool);
        assert!(column.editable);
    }

    #[test]
    fn drill_source_column_defaults_to_id() {
        let drill: DrillDownDef =
            serde_yaml::from_str("target: process-instance\nparam: processDefinitionId")
                .expect("parse drill");
        assert_eq!(drill.source_column(), "id");
    }

    #[test]
    fn lookup_accepts_singular_plural_and_prefix_variants() {
        let catalog = catalog_from_yaml(
            r#"
- name: process-definition
  columns: [{name: key}]
- name: process-instances
  columns: [{name: id}]
- name: task
  columns: [{name: id}]
"#,
        );
        assert_eq!(
            catalog.find("process-definitions").map(|t| t.name.as_str()),
            Some("process-definition")
        );
        assert_eq!(
            catalog.find("process-instance").map(|t| t.name.as_str()),
            Some("process-instances")
        );
        assert_eq!(catalog.find("tasks").map(|t| t.name.as_str()), Some("task"));
        assert!(catalog.find("job").is_none());
    }

    #[test]
    fn drill_targets_resolve_when_catalog_is_built() {
        let catalog = catalog_from_yaml(
            r#"
- name: process-definitions
  columns: [{name: key}]
  drilldown:
    - {target: process-instance, param: processDefinitionKey, column: key}
    - {target: incident, param: processDefinitionId}
- name: process-instances
  columns: [{name: id}]
  drilldown:
    - {target: variable-instances, param: processInstanceIdIn}
"#,
        );
        let rules = catalog.drill_rules("process-definitions");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].target, DrillTarget::Instances);
        assert_eq!(rules[0].column, "key");
        assert_eq!(
            rules[1].target,
            DrillTarget::Unsupported("incident".to_string())
        );
        assert_eq!(rules[1].column, "id");
        assert_eq!(
            catalog.drill_rules("process-instances")[0].target,
            DrillTarget::Variables
        );
        assert_eq!(
            catalog.unsupported_drill_targets(),
            vec![("process-definitions".to_string(), "incident".to_string())]
        );
    }

    #[test]
    fn visible_columns_skip_hidden_ones() {
        let table: TableDef = serde_yaml::from_str(
            r#"
name: process-instances
columns:
  - {name: id, visible: false}
  - {name: businessKey, align: right}
  - {name: assignee, input_type: user}
"#,
        )
        .expect("parse table");
        let visible = table.visible_columns();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].align, Align::Right);
        assert_eq!(visible[1].input_type, InputType::User);
    }

    #[test]
    fn validation_rejects_nameless_tables() {
        let catalog = catalog_from_yaml("- name: ''\n  columns: []");
        let err = catalog.validate().expect_err("empty name must fail");
        assert!(err.to_string().contains("non-empty name"));
    }
}
