use super::actions::{
    edit_action_from_key, is_delete_key, is_quit_key, selector_action_from_key,
    table_action_from_key, Action, EditAction, SelectorAction,
};
use super::drilldown::{default_rules, resolve};
use super::edit::{suggest_users, EditSession};
use super::navigation::{NavigationStack, ViewMode, ViewState};
use super::paging::{PageState, PaginationManager};
use super::table::column_defs_for;
use crate::config::{DrillTarget, TableCatalog};
use crate::engine::{
    record_cell, DeleteRequest, EngineError, EngineJob, EngineReply, FetchOutcome, FetchPayload,
    FetchRequest, FetchTarget, Filter, ProcessDefinition, SetVariableRequest, TypedResource,
    BUILTIN_ROOTS, RESOURCE_DEFINITIONS,
};
use crate::shared::{parse_input_value, Logger};
use crossterm::event::KeyEvent;
use std::time::{Duration, Instant};

pub const DEFAULT_ROOT: &str = RESOURCE_DEFINITIONS;
pub const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const ERROR_FOOTER_TTL: Duration = Duration::from_secs(4);
pub const DRILL_ERROR_FOOTER_TTL: Duration = Duration::from_secs(3);
pub const INFO_FOOTER_TTL: Duration = Duration::from_secs(2);

/// Frame columns around the table content: borders and padding.
pub const TABLE_CHROME_WIDTH: u16 = 4;
pub const MIN_TABLE_WIDTH: u16 = 10;
/// Rows that are not table rows: header lines, borders, the column header and the footer.
pub const VIEWPORT_CHROME_ROWS: u16 = 6;
pub const MIN_PAGE_SIZE: u16 = 3;

const DEFINITION_ID_PARAM: &str = "processDefinitionId";

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    Engine(EngineReply),
    ClearFooter(u64),
    AutoRefreshTick(u64),
    EnvironmentPersisted {
        environment: String,
        result: Result<(), String>,
    },
}

/// Work the runtime carries out on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Engine(EngineJob),
    /// Deliver `msg` back after `delay`.
    Schedule { delay: Duration, msg: Msg },
    PersistActiveEnvironment(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub kind: FooterKind,
    pub text: String,
    token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ConfirmDelete { instance_id: String },
    Edit(EditSession),
    ContextSelector { input: String },
}

/// Owns the view state and turns input and engine replies into state changes plus effects.
/// Nothing in here blocks or touches the network.
#[derive(Debug)]
pub struct Controller {
    catalog: TableCatalog,
    environments: Vec<String>,
    environment: String,
    roots: Vec<String>,
    logger: Logger,
    current: ViewState,
    stack: NavigationStack,
    pagination: PaginationManager,
    overlay: Overlay,
    footer: Option<Footer>,
    footer_token: u64,
    generation: u64,
    auto_refresh: bool,
    refresh_epoch: u64,
    definitions: Vec<ProcessDefinition>,
    users: Vec<String>,
    /// Dispatch time of the table fetch still in flight.
    fetch_started: Option<Instant>,
    last_latency: Option<Duration>,
    table_width: u16,
    quit: bool,
}

impl Controller {
    pub fn new(
        catalog: TableCatalog,
        environments: Vec<String>,
        environment: String,
        logger: Logger,
    ) -> Self {
        for (table, target) in catalog.unsupported_drill_targets() {
            logger.warn(
                "config.drill_target",
                &format!("table `{table}` drills into `{target}`, which has no view"),
            );
        }
        let mut roots = BUILTIN_ROOTS
            .iter()
            .map(|root| root.to_string())
            .collect::<Vec<_>>();
        for name in catalog.table_names() {
            let name = TypedResource::from_name(&name)
                .map(|typed| typed.resource_name().to_string())
                .unwrap_or(name);
            if !roots.contains(&name) {
                roots.push(name);
            }
        }
        Self {
            catalog,
            environments,
            environment,
            roots,
            logger,
            current: ViewState::root(DEFAULT_ROOT),
            stack: NavigationStack::default(),
            pagination: PaginationManager::default(),
            overlay: Overlay::None,
            footer: None,
            footer_token: 0,
            generation: 0,
            auto_refresh: false,
            refresh_epoch: 0,
            definitions: Vec::new(),
            users: Vec::new(),
            fetch_started: None,
            last_latency: None,
            table_width: 80 - TABLE_CHROME_WIDTH,
            quit: false,
        }
    }

    /// Names offered while editing `user` inputs.
    pub fn with_users(mut self, users: Vec<String>) -> Self {
        self.users = users;
        self
    }

    /// Effects for the first screen.
    pub fn start(&mut self) -> Vec<Effect> {
        self.logger.info(
            "dashboard.start",
            &format!("environment={} root={}", self.environment, DEFAULT_ROOT),
        );
        self.fetch_current()
    }

    pub fn view(&self) -> &ViewState {
        &self.current
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn has_history(&self) -> bool {
        !self.stack.is_empty()
    }

    /// True while the table fetch for the current view has not answered yet.
    pub fn is_loading(&self) -> bool {
        self.fetch_started.is_some()
    }

    /// Dispatch-to-reply time of the last table fetch that was applied.
    pub fn last_latency(&self) -> Option<Duration> {
        self.last_latency
    }

    /// Suggestions for the open edit form when its column takes a user name.
    pub fn user_suggestions(&self) -> Vec<&str> {
        match &self.overlay {
            Overlay::Edit(session) if session.is_user_input() => {
                suggest_users(&self.users, &session.input)
            }
            _ => Vec::new(),
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn has_editable_columns(&self) -> bool {
        self.current
            .table
            .columns()
            .iter()
            .any(|column| column.editable)
    }

    pub fn page_state(&self) -> PageState {
        self.pagination.state(&self.current.resource)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.resize(width, height);
                Vec::new()
            }
            Msg::Engine(reply) => self.apply_reply(reply),
            Msg::ClearFooter(token) => {
                if self.footer.as_ref().map(|footer| footer.token) == Some(token) {
                    self.footer = None;
                }
                Vec::new()
            }
            Msg::AutoRefreshTick(epoch) => self.auto_refresh_tick(epoch),
            Msg::EnvironmentPersisted {
                environment,
                result,
            } => match result {
                Ok(()) => {
                    self.logger
                        .debug("config.persist", &format!("active={environment}"));
                    Vec::new()
                }
                Err(err) => {
                    self.logger.error("config.persist_failed", &err);
                    self.error(format!("Could not save active environment: {err}"))
                }
            },
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.table_width = width
            .saturating_sub(TABLE_CHROME_WIDTH)
            .max(MIN_TABLE_WIDTH);
        let page_size = height
            .saturating_sub(VIEWPORT_CHROME_ROWS)
            .max(MIN_PAGE_SIZE);
        self.pagination.set_page_size(usize::from(page_size));
        self.relayout_if_needed();
    }

    fn relayout_if_needed(&mut self) {
        if self.current.table.width() != self.table_width {
            self.current.table.relayout(self.table_width);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if is_quit_key(&key) {
            self.quit = true;
            return vec![Effect::Quit];
        }
        match std::mem::replace(&mut self.overlay, Overlay::None) {
            Overlay::None => match table_action_from_key(key) {
                Some(action) => self.handle_action(action),
                None => Vec::new(),
            },
            Overlay::Help => Vec::new(),
            Overlay::ConfirmDelete { instance_id } => {
                if is_delete_key(&key) {
                    self.dispatch_delete(instance_id)
                } else {
                    self.info("Cancelled")
                }
            }
            Overlay::Edit(session) => self.handle_edit_key(session, key),
            Overlay::ContextSelector { input } => self.handle_selector_key(input, key),
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        self.logger.debug("dashboard.action", action.as_str());
        match action {
            Action::MoveUp => {
                self.current.table.move_cursor(-1);
                Vec::new()
            }
            Action::MoveDown => {
                self.current.table.move_cursor(1);
                Vec::new()
            }
            Action::Top => {
                self.current.table.set_cursor(0);
                Vec::new()
            }
            Action::Bottom => {
                self.current.table.cursor_to_end();
                Vec::new()
            }
            Action::DrillIn => self.drill_in(),
            Action::Back => self.back(),
            Action::PageForward => self.change_page(true),
            Action::PageBack => self.change_page(false),
            Action::JumpTo(level) => self.jump_to(level),
            Action::SwitchEnvironment => self.switch_environment(),
            Action::ToggleAutoRefresh => self.toggle_auto_refresh(),
            Action::Edit => self.start_edit(),
            Action::Delete => self.start_delete(),
            Action::OpenContextSelector => {
                self.overlay = Overlay::ContextSelector {
                    input: String::new(),
                };
                Vec::new()
            }
            Action::Help => {
                self.overlay = Overlay::Help;
                Vec::new()
            }
        }
    }

    fn flash(&mut self, kind: FooterKind, text: String, ttl: Duration) -> Vec<Effect> {
        self.footer_token += 1;
        self.footer = Some(Footer {
            kind,
            text,
            token: self.footer_token,
        });
        vec![Effect::Schedule {
            delay: ttl,
            msg: Msg::ClearFooter(self.footer_token),
        }]
    }

    fn info(&mut self, text: impl Into<String>) -> Vec<Effect> {
        self.flash(FooterKind::Info, text.into(), INFO_FOOTER_TTL)
    }

    fn error(&mut self, text: impl Into<String>) -> Vec<Effect> {
        self.flash(FooterKind::Error, text.into(), ERROR_FOOTER_TTL)
    }

    fn drill_error(&mut self, text: impl Into<String>) -> Vec<Effect> {
        self.flash(FooterKind::Error, text.into(), DRILL_ERROR_FOOTER_TTL)
    }

    /// Shows the empty table of the current resource with its proper columns.
    fn preseed(&mut self) {
        let defs = column_defs_for(&self.catalog, &self.current.resource, &[]);
        self.current
            .table
            .load(defs, Vec::new(), self.table_width, 0);
    }

    /// Issues the fetch for the current view. Any result still in flight becomes stale.
    fn fetch_current(&mut self) -> Vec<Effect> {
        self.generation += 1;
        let resource = self.current.resource.clone();
        let target = match self.current.mode {
            ViewMode::Variables => match &self.current.selected_instance_id {
                Some(instance_id) => FetchTarget::Variables {
                    instance_id: instance_id.clone(),
                },
                None => {
                    self.fetch_started = None;
                    self.preseed();
                    return self.info("No instance selected to show variables");
                }
            },
            _ => FetchTarget::for_resource(&resource, self.current.instance_filter.clone()),
        };
        let window = self.pagination.window(&resource);
        self.logger.debug(
            "fetch.dispatch",
            &format!(
                "generation={} resource={} offset={} limit={}",
                self.generation, resource, window.offset, window.limit
            ),
        );
        self.fetch_started = Some(Instant::now());
        vec![Effect::Engine(EngineJob::Fetch(FetchRequest {
            generation: self.generation,
            environment: self.environment.clone(),
            resource,
            target,
            window,
        }))]
    }

    fn apply_reply(&mut self, reply: EngineReply) -> Vec<Effect> {
        match reply {
            EngineReply::Fetched { generation, result } => self.apply_fetch(generation, result),
            EngineReply::VariableSaved { request, result } => {
                self.apply_variable_saved(request, result)
            }
            EngineReply::InstanceDeleted {
                instance_id,
                result,
            } => self.apply_deleted(instance_id, result),
        }
    }

    fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<FetchOutcome, EngineError>,
    ) -> Vec<Effect> {
        if generation != self.generation {
            self.logger.debug(
                "fetch.stale",
                &format!("generation={generation} latest={}", self.generation),
            );
            return Vec::new();
        }
        if let Some(started) = self.fetch_started.take() {
            self.last_latency = Some(started.elapsed());
        }
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.pagination.clear_pending_cursor();
                self.logger.error("fetch.failed", &err.to_string());
                return self.error(err.to_string());
            }
        };

        self.pagination
            .record_total(&outcome.resource, outcome.total);
        if let FetchPayload::Definitions(definitions) = &outcome.payload {
            self.definitions = definitions.clone();
        }
        if outcome.payload.is_empty() {
            self.logger.debug(
                "table.placeholder",
                &format!("resource={} returned no rows", outcome.resource),
            );
        }
        let records = outcome.payload.records();
        let defs = column_defs_for(&self.catalog, &outcome.resource, &records);
        let cursor = self.current.table.cursor();
        self.current
            .table
            .load(defs, records, self.table_width, generation);
        let row_count = self.current.table.rows().len();
        let cursor = self
            .pagination
            .take_pending_cursor(row_count)
            .unwrap_or(cursor);
        self.current.table.set_cursor(cursor);
        self.logger.info(
            "fetch.applied",
            &format!(
                "generation={generation} resource={} rows={} total={:?} latency_ms={}",
                outcome.resource,
                outcome.payload.len(),
                outcome.total,
                self.last_latency.map_or(0, |latency| latency.as_millis())
            ),
        );
        Vec::new()
    }

    fn definition_filter_value(&self, param: &str, value: &str) -> String {
        if param == DEFINITION_ID_PARAM {
            if let Some(definition) = self.definitions.iter().find(|d| d.key == value) {
                return definition.id.clone();
            }
        }
        value.to_string()
    }

    fn drill_in(&mut self) -> Vec<Effect> {
        let Some(row) = self.current.table.selected_row().map(<[String]>::to_vec) else {
            return self.drill_error("No row selected");
        };
        let configured = self.catalog.drill_rules(&self.current.resource);
        let rules = if configured.is_empty() {
            default_rules(self.current.mode)
        } else {
            configured.to_vec()
        };
        let table = &self.current.table;
        let Some(decision) = resolve(&rules, &row, |name| table.column_index(name)) else {
            let message = format!("No drilldown for {}", self.current.resource);
            return self.drill_error(message);
        };
        if decision.value.is_empty() {
            return self.drill_error("Selected row has no value to drill into");
        }

        match decision.target {
            DrillTarget::Unsupported(target) => {
                self.logger.warn(
                    "drill.unsupported",
                    &format!("resource={} target={target}", self.current.resource),
                );
                self.drill_error(format!("Drill target not supported: {target}"))
            }
            DrillTarget::Instances => {
                let filter = (!decision.param.is_empty()).then(|| {
                    let value = self.definition_filter_value(&decision.param, &decision.value);
                    Filter::new(&decision.param, &value)
                });
                let next = self.current.instances_of(&decision.value, filter);
                self.enter(next)
            }
            DrillTarget::Variables => {
                let next = self.current.variables_of(&decision.value);
                self.enter(next)
            }
        }
    }

    fn enter(&mut self, next: ViewState) -> Vec<Effect> {
        let previous = std::mem::replace(&mut self.current, next);
        self.stack.push(previous);
        self.pagination.reset(&self.current.resource);
        self.pagination.clear_pending_cursor();
        self.preseed();
        self.logger.info(
            "nav.drill",
            &format!("breadcrumb={}", self.current.breadcrumb.join(" > ")),
        );
        self.fetch_current()
    }

    /// Puts a saved view back on screen: columns, then rows, then the cursor.
    fn restore(&mut self, mut state: ViewState) {
        let snapshot = std::mem::take(&mut state.table);
        self.current = state;
        self.current.table.restore(snapshot);
        self.relayout_if_needed();
    }

    fn back(&mut self) -> Vec<Effect> {
        let Some(previous) = self.stack.pop() else {
            return Vec::new();
        };
        self.generation += 1;
        self.fetch_started = None;
        self.pagination.clear_pending_cursor();
        self.restore(previous);
        self.logger.info(
            "nav.back",
            &format!("breadcrumb={}", self.current.breadcrumb.join(" > ")),
        );
        if self.current.table.is_empty() && self.current.table.generation() == 0 {
            return self.fetch_current();
        }
        Vec::new()
    }

    fn jump_to(&mut self, level: usize) -> Vec<Effect> {
        if level > self.current.level() {
            return self.error("Invalid breadcrumb index");
        }
        let target = if level < self.stack.len() {
            self.stack.get(level).cloned()
        } else {
            Some(self.current.clone())
        };
        let Some(target) = target else {
            return self.error("Invalid breadcrumb index");
        };
        match target.mode {
            ViewMode::Variables if target.selected_instance_id.is_none() => {
                return self.drill_error("No instance selected to show variables");
            }
            ViewMode::Instances if level > 0 && target.selected_definition_key.is_none() => {
                return self.drill_error("No definition selected to show instances");
            }
            _ => {}
        }

        let cursor = target.table.cursor();
        self.stack.truncate(level);
        self.restore(target);
        self.pagination.request_cursor(cursor);
        self.logger.info(
            "nav.jump",
            &format!("level={level} breadcrumb={}", self.current.breadcrumb.join(" > ")),
        );
        self.fetch_current()
    }

    /// Replaces the whole history with a single root view.
    pub fn switch_root(&mut self, resource: &str) -> Vec<Effect> {
        self.stack.clear();
        let mut table = std::mem::take(&mut self.current.table);
        table.set_cursor(0);
        self.current = ViewState::root(resource);
        self.current.table = table;
        let resource = self.current.resource.clone();
        self.pagination.reset(&resource);
        self.pagination.clear_pending_cursor();
        self.logger.info("nav.root", &format!("root={resource}"));
        self.fetch_current()
    }

    fn change_page(&mut self, forward: bool) -> Vec<Effect> {
        let paged = TypedResource::from_name(&self.current.resource)
            .map_or(true, TypedResource::is_paged);
        if !paged {
            return self.info("Variables are not paged");
        }
        let resource = self.current.resource.clone();
        let cursor = self.current.table.cursor();
        let moved = if forward {
            self.pagination.page_forward(&resource, cursor)
        } else {
            self.pagination.page_back(&resource, cursor)
        };
        if !moved {
            return self.info(if forward {
                "Already on the last page"
            } else {
                "Already on the first page"
            });
        }
        self.fetch_current()
    }

    fn switch_environment(&mut self) -> Vec<Effect> {
        if self.environments.is_empty() {
            return self.error("No environments configured");
        }
        let next = self
            .environments
            .iter()
            .position(|name| *name == self.environment)
            .map(|index| (index + 1) % self.environments.len())
            .unwrap_or(0);
        self.environment = self.environments[next].clone();
        self.pagination.reset_all();
        self.definitions.clear();
        self.logger
            .info("env.switch", &format!("environment={}", self.environment));

        let root = self
            .current
            .breadcrumb
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_ROOT.to_string());
        let mut effects = vec![Effect::PersistActiveEnvironment(self.environment.clone())];
        effects.extend(self.info(format!("Environment: {}", self.environment)));
        effects.extend(self.switch_root(&root));
        effects
    }

    fn toggle_auto_refresh(&mut self) -> Vec<Effect> {
        self.auto_refresh = !self.auto_refresh;
        self.refresh_epoch += 1;
        if !self.auto_refresh {
            return self.info("Auto-refresh off");
        }
        let mut effects = self.info("Auto-refresh on");
        effects.push(self.schedule_refresh());
        effects
    }

    fn schedule_refresh(&self) -> Effect {
        Effect::Schedule {
            delay: AUTO_REFRESH_INTERVAL,
            msg: Msg::AutoRefreshTick(self.refresh_epoch),
        }
    }

    fn auto_refresh_tick(&mut self, epoch: u64) -> Vec<Effect> {
        if !self.auto_refresh || epoch != self.refresh_epoch {
            return Vec::new();
        }
        let mut effects = Vec::new();
        let idle_variables = self.current.mode == ViewMode::Variables
            && self.current.selected_instance_id.is_none();
        if !idle_variables {
            self.pagination.request_cursor(self.current.table.cursor());
            effects.extend(self.fetch_current());
        }
        effects.push(self.schedule_refresh());
        effects
    }

    fn start_edit(&mut self) -> Vec<Effect> {
        let Some(cells) = self.current.table.selected_row().map(<[String]>::to_vec) else {
            return self.error("No row selected");
        };
        let variable_type = match self.current.mode {
            ViewMode::Variables => self
                .current
                .table
                .selected_record()
                .map(|record| record_cell(record, "type"))
                .unwrap_or_default(),
            _ => String::new(),
        };
        let session = EditSession::open(
            self.current.table.columns(),
            &cells,
            self.current.table.cursor(),
            self.current.table.generation(),
            &variable_type,
        );
        match session {
            Some(session) => {
                self.overlay = Overlay::Edit(session);
                Vec::new()
            }
            None => self.error("No editable columns"),
        }
    }

    fn handle_edit_key(&mut self, mut session: EditSession, key: KeyEvent) -> Vec<Effect> {
        let cells = self
            .current
            .table
            .rows()
            .get(session.row)
            .cloned()
            .unwrap_or_default();
        match edit_action_from_key(key) {
            Some(EditAction::Cancel) => return Vec::new(),
            Some(EditAction::Save) => return self.save_edit(session),
            Some(EditAction::NextColumn) => session.cycle(true, &cells),
            Some(EditAction::PrevColumn) => session.cycle(false, &cells),
            Some(EditAction::Toggle) => {
                if !session.toggle() {
                    session.push(' ');
                }
            }
            Some(EditAction::Backspace) => session.backspace(),
            Some(EditAction::Input(ch)) => session.push(ch),
            None => {}
        }
        self.overlay = Overlay::Edit(session);
        Vec::new()
    }

    fn save_edit(&mut self, mut session: EditSession) -> Vec<Effect> {
        let Some(column) = session.current().cloned() else {
            return Vec::new();
        };
        let value = match parse_input_value(&session.input, column.input_type) {
            Ok(value) => value,
            Err(err) => {
                session.error = Some(err.to_string());
                self.overlay = Overlay::Edit(session);
                return Vec::new();
            }
        };
        if self.current.mode != ViewMode::Variables {
            return self.error("Editing not supported for this table");
        }
        let Some(instance_id) = self.current.selected_instance_id.clone() else {
            return self.error("No instance selected");
        };
        let name = self
            .current
            .table
            .record(session.row)
            .map(|record| record_cell(record, "name"))
            .unwrap_or_default();
        if name.is_empty() {
            return self.error("Selected row has no variable name");
        }

        self.logger.info(
            "edit.dispatch",
            &format!(
                "instance={instance_id} variable={name} type={}",
                column.type_name
            ),
        );
        vec![Effect::Engine(EngineJob::SetVariable(SetVariableRequest {
            environment: self.environment.clone(),
            instance_id,
            name,
            value,
            type_name: column.type_name,
            generation: session.generation,
            row: session.row,
            column: column.index,
        }))]
    }

    fn apply_variable_saved(
        &mut self,
        request: SetVariableRequest,
        result: Result<(), EngineError>,
    ) -> Vec<Effect> {
        if let Err(err) = result {
            self.logger.error(
                "edit.failed",
                &format!("variable={} error={err}", request.name),
            );
            return self.error(format!("Save failed: {err}"));
        }
        let same_table = self.current.mode == ViewMode::Variables
            && self.current.table.generation() == request.generation;
        let key = self
            .current
            .table
            .columns()
            .get(request.column)
            .map(|column| column.key.clone());
        match key {
            Some(key) if same_table => {
                self.current
                    .table
                    .update_cell(request.row, &key, request.value.clone());
            }
            _ => self.logger.debug(
                "edit.table_replaced",
                &format!("variable={} saved after table changed", request.name),
            ),
        }
        self.logger
            .info("edit.saved", &format!("variable={}", request.name));
        self.info("Saved")
    }

    fn start_delete(&mut self) -> Vec<Effect> {
        if self.current.mode != ViewMode::Instances {
            return self.error("Delete is only available for process instances");
        }
        let instance_id = self
            .current
            .table
            .selected_record()
            .map(|record| record_cell(record, "id"))
            .unwrap_or_default();
        if instance_id.is_empty() {
            return self.error("No instance selected");
        }
        self.overlay = Overlay::ConfirmDelete { instance_id };
        Vec::new()
    }

    fn dispatch_delete(&mut self, instance_id: String) -> Vec<Effect> {
        self.logger
            .info("delete.dispatch", &format!("instance={instance_id}"));
        vec![Effect::Engine(EngineJob::DeleteInstance(DeleteRequest {
            environment: self.environment.clone(),
            instance_id,
        }))]
    }

    fn apply_deleted(
        &mut self,
        instance_id: String,
        result: Result<(), EngineError>,
    ) -> Vec<Effect> {
        if let Err(err) = result {
            self.logger.error(
                "delete.failed",
                &format!("instance={instance_id} error={err}"),
            );
            return self.error(format!("Delete failed: {err}"));
        }
        if self.current.mode == ViewMode::Instances {
            self.current.table.remove_where("id", &instance_id);
        }
        self.logger
            .info("delete.done", &format!("instance={instance_id}"));
        self.info(format!("Deleted {instance_id}"))
    }

    fn handle_selector_key(&mut self, mut input: String, key: KeyEvent) -> Vec<Effect> {
        match selector_action_from_key(key) {
            Some(SelectorAction::Cancel) => return Vec::new(),
            Some(SelectorAction::Submit) => {
                let name = input.trim().to_string();
                if self.roots.iter().any(|root| *root == name) {
                    return self.switch_root(&name);
                }
                self.overlay = Overlay::ContextSelector { input };
                return self.error(format!("Unknown context: {name}"));
            }
            Some(SelectorAction::Complete) => {
                let prefix = input.trim().to_string();
                if let Some(root) = self.roots.iter().find(|root| root.starts_with(&prefix)) {
                    input = root.clone();
                }
            }
            Some(SelectorAction::Backspace) => {
                input.pop();
            }
            Some(SelectorAction::Input(ch)) => input.push(ch),
            None => {}
        }
        self.overlay = Overlay::ContextSelector { input };
        Vec::new()
    }
}
