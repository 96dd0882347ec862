pub mod actions;
pub mod controller;
pub mod drilldown;
pub mod edit;
pub mod layout;
pub mod navigation;
pub mod paging;
pub mod table;

pub use actions::{fit_key_hints, key_hints, table_action_from_key, Action, KeyHint};
pub use controller::{
    Controller, Effect, Footer, FooterKind, Msg, Overlay, AUTO_REFRESH_INTERVAL, DEFAULT_ROOT,
};
pub use drilldown::{default_rules, resolve, DrillDecision};
pub use edit::{resolve_edit_types, suggest_users, EditColumn, EditSession};
pub use layout::{
    default_columns, layout_columns, normalize_percentages, normalize_rows, Column,
    EDITABLE_MARKER, MIN_COLUMN_WIDTH,
};
pub use navigation::{NavigationStack, ViewMode, ViewState};
pub use paging::{PageState, PaginationManager};
pub use table::{column_defs_for, TableData};
