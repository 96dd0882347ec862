use crate::config::{Align, ColumnDef, InputType, WidthSpec};
use ratatui::text::Span;

pub const MIN_COLUMN_WIDTH: usize = 3;
/// Appended to the header title of editable columns. Cells are never marked.
pub const EDITABLE_MARKER: &str = " ✎";

/// A concrete, rendered table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    /// Field name the cells are looked up by.
    pub key: String,
    pub width: u16,
    pub align: Align,
    pub editable: bool,
    pub input_type: InputType,
}

pub fn column_title(def: &ColumnDef) -> String {
    let mut title = def.name.to_uppercase();
    if def.editable {
        title.push_str(EDITABLE_MARKER);
    }
    title
}

fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Whole-number percentage per column. Specified shares are scaled down when they add up to
/// more than 100; whatever is left is split evenly across auto columns.
pub fn normalize_percentages(defs: &[ColumnDef]) -> Vec<u32> {
    let specified = defs
        .iter()
        .map(|def| match def.width_spec() {
            WidthSpec::Percent(percent) => Some(percent),
            WidthSpec::Auto => None,
        })
        .collect::<Vec<_>>();

    let specified_total: u32 = specified.iter().flatten().sum();
    let mut percents = specified
        .iter()
        .map(|percent| percent.unwrap_or(0))
        .collect::<Vec<_>>();
    if specified_total > 100 {
        for percent in percents.iter_mut() {
            *percent = *percent * 100 / specified_total;
        }
    }

    let used: u32 = percents.iter().sum();
    let remaining = 100u32.saturating_sub(used);
    let auto_count = specified.iter().filter(|percent| percent.is_none()).count() as u32;
    if auto_count > 0 {
        let share = remaining / auto_count;
        for (percent, spec) in percents.iter_mut().zip(&specified) {
            if spec.is_none() {
                *percent = share;
            }
        }
    }
    percents
}

/// Width the columns are laid out against: the available width, but never less than
/// the minimum width for every column.
pub fn content_width(column_count: usize, total_width: u16) -> usize {
    usize::from(total_width).max(column_count * MIN_COLUMN_WIDTH)
}

/// Turns visible column definitions into fixed widths that add up to the content width.
/// Columns whose title does not fit their width are left out; rounding leftovers and the
/// space of dropped columns go to the last column.
pub fn layout_columns(defs: &[ColumnDef], total_width: u16) -> Vec<Column> {
    if defs.is_empty() {
        return Vec::new();
    }
    let content = content_width(defs.len(), total_width);
    let mut widths = normalize_percentages(defs)
        .into_iter()
        .map(|percent| (content * percent as usize / 100).max(MIN_COLUMN_WIDTH))
        .collect::<Vec<_>>();
    shrink_to_fit(&mut widths, content);

    let mut kept = defs
        .iter()
        .zip(&widths)
        .filter_map(|(def, width)| {
            let title = column_title(def);
            (display_width(&title) <= *width).then(|| (def, title, *width))
        })
        .collect::<Vec<_>>();
    if kept.is_empty() {
        kept.push((&defs[0], column_title(&defs[0]), widths[0]));
    }

    let used: usize = kept.iter().map(|(_, _, width)| width).sum();
    if let Some(last) = kept.last_mut() {
        last.2 += content.saturating_sub(used);
    }

    kept.into_iter()
        .map(|(def, title, width)| Column {
            title,
            key: def.name.clone(),
            width: u16::try_from(width).unwrap_or(u16::MAX),
            align: def.align,
            editable: def.editable,
            input_type: def.input_type,
        })
        .collect()
}

/// The minimum-width bump can push the total past the content width; take the excess from
/// the widest columns.
fn shrink_to_fit(widths: &mut [usize], content: usize) {
    let mut total: usize = widths.iter().sum();
    while total > content {
        let Some((index, _)) = widths
            .iter()
            .enumerate()
            .filter(|(_, width)| **width > MIN_COLUMN_WIDTH)
            .max_by_key(|(index, width)| (**width, std::cmp::Reverse(*index)))
        else {
            return;
        };
        widths[index] -= 1;
        total -= 1;
    }
}

/// Placeholder columns `COL1..COLn` splitting the width evenly.
pub fn default_columns(count: usize, total_width: u16) -> Vec<Column> {
    let count = count.max(1);
    let defs = (1..=count)
        .map(|index| ColumnDef::new(&format!("col{index}")))
        .collect::<Vec<_>>();
    layout_columns(&defs, total_width)
}

/// Pads or truncates every row to `column_count` cells. An empty row set becomes a single
/// empty row so the table always has something to select.
pub fn normalize_rows(rows: Vec<Vec<String>>, column_count: usize) -> Vec<Vec<String>> {
    if column_count == 0 {
        return rows;
    }
    if rows.is_empty() {
        return vec![vec![String::new(); column_count]];
    }
    rows.into_iter()
        .map(|mut row| {
            row.resize(column_count, String::new());
            row
        })
        .collect()
}
