use crate::config::{DrillRule, DrillTarget};
use crate::engine::{RESOURCE_INSTANCES, RESOURCE_VARIABLES};

use super::navigation::ViewMode;

/// Where a confirmed row leads and what it carries along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillDecision {
    pub target: DrillTarget,
    pub target_name: String,
    pub param: String,
    pub value: String,
}

/// Rules for tables without drilldown configuration: definitions lead to their instances by
/// key, instances to their variables by id.
pub fn default_rules(mode: ViewMode) -> Vec<DrillRule> {
    match mode {
        ViewMode::Definitions => vec![DrillRule::new(
            RESOURCE_INSTANCES,
            "processDefinitionKey",
            "key",
        )],
        ViewMode::Instances => vec![DrillRule::new(RESOURCE_VARIABLES, "", "id")],
        ViewMode::Variables | ViewMode::Generic => Vec::new(),
    }
}

/// Picks the first rule whose source column is visible and inside the row, falling back to
/// the first rule. The carried value is that column's cell, or the first cell when the column
/// cannot be resolved.
pub fn resolve<F>(rules: &[DrillRule], row: &[String], column_index: F) -> Option<DrillDecision>
where
    F: Fn(&str) -> Option<usize>,
{
    let (rule, index) = rules
        .iter()
        .find_map(|rule| {
            column_index(&rule.column)
                .filter(|index| *index < row.len())
                .map(|index| (rule, Some(index)))
        })
        .or_else(|| rules.first().map(|rule| (rule, None)))?;

    let value = index
        .and_then(|index| row.get(index))
        .or_else(|| row.first())
        .cloned()
        .unwrap_or_default();

    Some(DrillDecision {
        target: rule.target.clone(),
        target_name: rule.target_name.clone(),
        param: rule.param.clone(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn lookup(columns: &'static [&'static str]) -> impl Fn(&str) -> Option<usize> {
        move |name| columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    #[test]
    fn definition_key_rule_carries_the_key_cell() {
        let rules = vec![DrillRule::new(
            "process-instance",
            "processDefinitionKey",
            "key",
        )];
        let decision = resolve(&rules, &row(&["k1", "One"]), lookup(&["key", "name"]))
            .expect("decision");
        assert_eq!(decision.target, DrillTarget::Instances);
        assert_eq!(decision.target_name, "process-instance");
        assert_eq!(decision.param, "processDefinitionKey");
        assert_eq!(decision.value, "k1");
    }

    #[test]
    fn first_rule_with_a_visible_column_wins() {
        let rules = vec![
            DrillRule::new("process-instance", "processDefinitionId", "id"),
            DrillRule::new("process-instance", "processDefinitionKey", "key"),
        ];
        let decision = resolve(&rules, &row(&["One", "k1"]), lookup(&["name", "key"]))
            .expect("decision");
        assert_eq!(decision.param, "processDefinitionKey");
        assert_eq!(decision.value, "k1");
    }

    #[test]
    fn unresolvable_columns_fall_back_to_first_rule_and_first_cell() {
        let rules = vec![
            DrillRule::new("process-variables", "", "id"),
            DrillRule::new("incident", "processInstanceId", "instance"),
        ];
        let decision =
            resolve(&rules, &row(&["i-7", "order"]), lookup(&["businessKey", "state"]))
                .expect("decision");
        assert_eq!(decision.target, DrillTarget::Variables);
        assert_eq!(decision.value, "i-7");
    }

    #[test]
    fn columns_past_the_end_of_the_row_are_skipped() {
        let rules = vec![
            DrillRule::new("process-instance", "businessKey", "businessKey"),
            DrillRule::new("process-variables", "", "id"),
        ];
        let decision = resolve(&rules, &row(&["i-1"]), lookup(&["id", "businessKey"]))
            .expect("decision");
        assert_eq!(decision.target, DrillTarget::Variables);
        assert_eq!(decision.value, "i-1");
    }

    #[test]
    fn unsupported_targets_are_still_resolved() {
        let rules = vec![DrillRule::new("incident", "processInstanceId", "id")];
        let decision = resolve(&rules, &row(&["i-1"]), lookup(&["id"])).expect("decision");
        assert_eq!(
            decision.target,
            DrillTarget::Unsupported("incident".to_string())
        );
    }

    #[test]
    fn no_rules_means_no_decision() {
        assert!(resolve(&[], &row(&["x"]), lookup(&["id"])).is_none());
        assert!(default_rules(ViewMode::Variables).is_empty());
        assert_eq!(default_rules(ViewMode::Definitions)[0].column, "key");
        assert_eq!(
            default_rules(ViewMode::Instances)[0].target,
            DrillTarget::Variables
        );
    }
}
