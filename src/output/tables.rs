use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::analyzer::Category;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_score_cell(score: u8) -> Cell {
    let text = format!("{score}/100");
    if score >= 80 {
        Cell::new(text).fg(TableColor::Green)
    } else if score >= 50 {
        Cell::new(text).fg(TableColor::Yellow)
    } else {
        Cell::new(text).fg(TableColor::Red)
    }
}

pub fn category_cell(category: Category) -> Cell {
    match category {
        Category::Warning => Cell::new("warning").fg(TableColor::Red),
        Category::Suggestion => Cell::new("suggestion").fg(TableColor::Yellow),
    }
}
