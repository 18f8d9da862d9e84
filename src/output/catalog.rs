use comfy_table::Cell;

use crate::analyzer::{Category, Rule};

use super::tables::{category_cell, create_table, cyan_header};

/// Prints the rule catalog in evaluation order with each rule's penalty.
pub fn print_rule_catalog() {
    println!("{}", render_rule_catalog());
}

fn render_rule_catalog() -> String {
    let mut table = create_table();
    table.set_header(cyan_header(&["#", "Rule", "Category", "Penalty"]));
    for (idx, rule) in Rule::ALL.into_iter().enumerate() {
        let penalty = match (rule.category(), rule.penalty()) {
            (Category::Suggestion, 0) => "-".to_string(),
            (_, points) => format!("-{points}"),
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(rule_id(rule)),
            category_cell(rule.category()),
            Cell::new(penalty),
        ]);
    }
    table.to_string()
}

/// The rule's stable identifier, as it appears in serialized output.
pub fn rule_id(rule: Rule) -> String {
    serde_json::to_value(rule)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{rule:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_ids_are_kebab_case() {
        assert_eq!(rule_id(Rule::MissingArtifactPaths), "missing-artifact-paths");
        assert_eq!(rule_id(Rule::TooManyJobs), "too-many-jobs");
    }

    #[test]
    fn test_catalog_lists_every_rule() {
        let output = render_rule_catalog();
        for rule in Rule::ALL {
            assert!(output.contains(&rule_id(rule)), "{rule:?} missing from catalog");
        }
        assert!(output.contains("-10"));
    }
}
