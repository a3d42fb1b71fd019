//! The list-and-create screen shared by every record type.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::Theme;
use crate::commands::{CreateRecordCmd, FetchListCmd};
use crate::config::{FormAction, KeyResolver};
use crate::form::{CacheState, EntitySchema, FieldKind, FormController, RefreshRequest, Refreshed, Severity};
use crate::remote::{EntityService, RemoteError};
use crate::screen::{Screen, UpdateResult};
use crate::ui::{ChoiceField, Component, EventResult, Keybinding, Spinner, Table, TableRow, TextField};

const SCROLL_STEP: usize = 5;

/// Messages processed by [`EntityScreen::update`].
#[derive(Debug)]
pub enum EntityMsg<R> {
    /// Issue the list query created with the controller.
    Initialize,
    FieldEdited { field: &'static str, value: String },
    Submit,
    Reload,
    Created(Result<R, RemoteError>),
    ListLoaded(Refreshed<R>),
}

enum Input {
    Text(TextField),
    Choice(ChoiceField),
}

impl Input {
    fn set_focused(&mut self, focused: bool) {
        match self {
            Self::Text(f) => f.set_focused(focused),
            Self::Choice(f) => f.set_focused(focused),
        }
    }

    fn set_value(&mut self, value: &str) {
        match self {
            Self::Text(f) => f.set_value(value),
            Self::Choice(f) => f.set_value(value),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<EventResult<String>> {
        match self {
            Self::Text(f) => f.handle_key(key),
            Self::Choice(f) => f.handle_key(key),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        match self {
            Self::Text(f) => f.render(frame, area, theme),
            Self::Choice(f) => f.render(frame, area, theme),
        }
    }
}

/// A form for one record type above the list of existing records.
pub struct EntityScreen<S: EntitySchema>
where
    S::Record: TableRow,
{
    controller: FormController<S>,
    initial_request: Option<RefreshRequest>,
    inputs: Vec<(&'static str, Input)>,
    focus: usize,
    table: Table<S::Record>,
    spinner: Spinner,
    service: Arc<dyn EntityService<S>>,
    resolver: Arc<KeyResolver>,
    msg_tx: UnboundedSender<EntityMsg<S::Record>>,
    msg_rx: UnboundedReceiver<EntityMsg<S::Record>>,
}

impl<S> EntityScreen<S>
where
    S: EntitySchema,
    S::Record: TableRow,
{
    pub fn new(service: Arc<dyn EntityService<S>>, resolver: Arc<KeyResolver>) -> Self {
        let (controller, initial_request) = FormController::new();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let inputs = S::fields()
            .iter()
            .map(|def| {
                let input = match def.kind {
                    FieldKind::Choice(options) => {
                        Input::Choice(ChoiceField::new(def.label, options, resolver.clone()))
                    }
                    FieldKind::Text | FieldKind::Decimal | FieldKind::Date => {
                        let field = TextField::new(def.label).required(def.required);
                        Input::Text(match def.placeholder {
                            Some(p) => field.with_placeholder(p),
                            None => field,
                        })
                    }
                };
                (def.name, input)
            })
            .collect();

        let mut screen = Self {
            controller,
            initial_request: Some(initial_request),
            inputs,
            focus: 0,
            table: Table::new(format!(" {} ", S::PLURAL)),
            spinner: Spinner::new(format!("Loading {}...", S::PLURAL.to_lowercase())),
            service,
            resolver,
            msg_tx,
            msg_rx,
        };
        screen.set_focus(0);
        screen
    }

    fn queue(&self, msg: EntityMsg<S::Record>) {
        let _ = self.msg_tx.send(msg);
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index;
        for (i, (_, input)) in self.inputs.iter_mut().enumerate() {
            input.set_focused(i == index);
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.inputs.len();
        if len == 0 {
            return;
        }
        let next = if forward { (self.focus + 1) % len } else { (self.focus + len - 1) % len };
        self.set_focus(next);
    }

    /// Push draft values back into the widgets, e.g. after a reset.
    fn sync_inputs(&mut self) {
        let draft = self.controller.draft();
        for (name, input) in &mut self.inputs {
            input.set_value(draft.value(name));
        }
    }

    fn fetch(&self, request: RefreshRequest) -> UpdateResult {
        FetchListCmd::new(self.service.clone(), request, self.msg_tx.clone()).into()
    }

    fn process_message(&mut self, msg: EntityMsg<S::Record>) -> UpdateResult {
        match msg {
            EntityMsg::Initialize => match self.initial_request.take() {
                Some(request) => self.fetch(request),
                None => UpdateResult::Idle,
            },

            // Edits are dropped until the submit settles.
            EntityMsg::FieldEdited { field, .. } if self.controller.is_submitting() => {
                debug!(entity = S::ENTITY, field, "Ignoring edit while submitting");
                self.sync_inputs();
                UpdateResult::Idle
            }

            EntityMsg::FieldEdited { field, value } => match self.controller.update_field(field, value) {
                Ok(()) => UpdateResult::Idle,
                Err(e) => UpdateResult::error(e.to_string()),
            },

            EntityMsg::Submit => match self.controller.begin_submit() {
                Ok(payload) => CreateRecordCmd::new(self.service.clone(), payload, self.msg_tx.clone()).into(),
                Err(reason) => {
                    debug!(entity = S::ENTITY, %reason, "Submit rejected");
                    UpdateResult::Idle
                }
            },

            EntityMsg::Reload => {
                let request = self.controller.cache_mut().request_refresh();
                self.fetch(request)
            }

            EntityMsg::Created(outcome) => match self.controller.complete_submit(outcome) {
                Some(request) => {
                    self.sync_inputs();
                    self.set_focus(0);
                    self.fetch(request)
                }
                None => UpdateResult::Idle,
            },

            EntityMsg::ListLoaded(refreshed) => {
                if self.controller.cache_mut().apply(refreshed) {
                    self.table.set_items(self.controller.cache().records().to_vec());
                }
                UpdateResult::Idle
            }
        }
    }

    fn render_form(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()))
            .title(format!(" New {} ", S::ENTITY))
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut rows: Vec<Constraint> = vec![Constraint::Length(1); self.inputs.len()];
        rows.extend([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)]);
        let areas = Layout::vertical(rows).split(inner);

        for ((_, input), row) in self.inputs.iter_mut().zip(areas.iter()) {
            input.render(frame, *row, theme);
        }

        let n = self.inputs.len();
        frame.render_widget(Paragraph::new(self.submit_line(theme)), areas[n + 1]);

        let status = self.controller.status();
        let color = match status.severity() {
            Severity::Success => theme.green(),
            Severity::Error => theme.red(),
            Severity::None => theme.text(),
        };
        let status_line = Paragraph::new(status.text().to_string())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true });
        frame.render_widget(status_line, areas[n + 2]);
    }

    fn submit_line(&self, theme: &Theme) -> Line<'static> {
        let key = self.resolver.display_form(FormAction::Submit);
        let (label, style) = if self.controller.is_submitting() {
            (
                format!("Adding {}...", S::ENTITY.to_lowercase()),
                Style::default().fg(theme.yellow()),
            )
        } else if self.controller.can_submit() {
            (
                format!("[ Add {} ]", S::ENTITY),
                Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
            )
        } else {
            (format!("[ Add {} ]", S::ENTITY), Style::default().fg(theme.surface2()))
        };
        Line::from(vec![
            Span::raw(" ".repeat(crate::ui::LABEL_WIDTH + 2)),
            Span::styled(label, style),
            Span::styled(format!("  {key}"), Style::default().fg(theme.overlay0())),
        ])
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        match self.controller.cache().current() {
            CacheState::Pending => self.spinner.render(frame, area, theme),
            CacheState::Errored(message) => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.red()))
                    .title(format!(" {} ", S::PLURAL));
                let text = format!("Could not load {}: {message}", S::PLURAL.to_lowercase());
                let paragraph = Paragraph::new(text)
                    .style(Style::default().fg(theme.red()))
                    .wrap(Wrap { trim: true })
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            CacheState::Ready(_) => {
                let refreshing = if self.controller.cache().is_stale() { " ⟳" } else { "" };
                self.table
                    .set_title(format!(" {} ({}){refreshing} ", S::PLURAL, self.table.len()));
                self.table.render(frame, area, theme);
            }
        }
    }
}

impl<S> Screen for EntityScreen<S>
where
    S: EntitySchema,
    S::Record: TableRow,
{
    fn init(&mut self) {
        self.queue(EntityMsg::Initialize);
    }

    fn handle_tick(&mut self) {
        if matches!(self.controller.cache().current(), CacheState::Pending) {
            self.spinner.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let resolver = &self.resolver;
        if resolver.matches_form(&key, FormAction::Submit) {
            self.queue(EntityMsg::Submit);
            return true;
        }
        if resolver.matches_form(&key, FormAction::Reload) {
            self.queue(EntityMsg::Reload);
            return true;
        }
        if resolver.matches_form(&key, FormAction::NextField) {
            self.move_focus(true);
            return true;
        }
        if resolver.matches_form(&key, FormAction::PrevField) {
            self.move_focus(false);
            return true;
        }
        if resolver.matches_form(&key, FormAction::ScrollDown) {
            self.table.scroll_down(SCROLL_STEP);
            return true;
        }
        if resolver.matches_form(&key, FormAction::ScrollUp) {
            self.table.scroll_up(SCROLL_STEP);
            return true;
        }

        let Some((field, input)) = self.inputs.get_mut(self.focus) else {
            return false;
        };
        match input.handle_key(key) {
            Ok(EventResult::Event(value)) => {
                let field = *field;
                self.queue(EntityMsg::FieldEdited { field, value });
                true
            }
            Ok(EventResult::Consumed) => true,
            Ok(EventResult::Ignored) => false,
            Err(e) => {
                debug!(error = %e, "Input rejected key");
                false
            }
        }
    }

    fn update(&mut self) -> UpdateResult {
        let mut result = UpdateResult::Idle;
        while let Ok(msg) = self.msg_rx.try_recv() {
            result = result.merge(self.process_message(msg));
        }
        result
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [form_column, list_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);
        // fields + blank + submit + status + borders
        let form_height = u16::try_from(self.inputs.len() + 5).unwrap_or(u16::MAX);
        let [form_area, _] =
            Layout::vertical([Constraint::Length(form_height), Constraint::Min(0)]).areas(form_column);
        self.render_form(frame, form_area, theme);
        self.render_list(frame, list_area, theme);
    }

    fn title(&self) -> &'static str {
        S::PLURAL
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = vec![
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_form(FormAction::NextField),
                    r.display_form(FormAction::PrevField)
                ),
                "Next/prev field",
            ),
            Keybinding::new(r.display_form(FormAction::Submit), format!("Add {}", S::ENTITY.to_lowercase())),
            Keybinding::new(r.display_form(FormAction::Reload), "Reload"),
        ];
        if matches!(self.inputs.get(self.focus), Some((_, Input::Choice(_)))) {
            bindings.push(Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_form(FormAction::PrevOption),
                    r.display_form(FormAction::NextOption)
                ),
                "Choose",
            ));
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::BackendConfig;
    use crate::entity::{ContactSchema, ExpenseSchema};
    use crate::remote::SandboxBackend;

    fn backend() -> Arc<SandboxBackend> {
        let config = BackendConfig {
            latency_ms: 0,
            data_file: None,
        };
        Arc::new(SandboxBackend::open(&config).unwrap())
    }

    fn press(screen: &mut impl Screen, code: KeyCode) -> bool {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(screen: &mut impl Screen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    /// Run `update()` and every command it spawns until the screen settles.
    async fn settle(screen: &mut impl Screen) {
        loop {
            match screen.update() {
                UpdateResult::Idle => return,
                UpdateResult::Commands(commands) => {
                    for command in commands {
                        command.execute().await.unwrap();
                    }
                }
                UpdateResult::Error { message, .. } => panic!("screen reported error: {message}"),
            }
        }
    }

    #[tokio::test]
    async fn init_loads_the_list() {
        let mut screen = EntityScreen::<ContactSchema>::new(backend(), Arc::new(KeyResolver::default()));
        assert_eq!(screen.controller.cache().current(), &CacheState::Pending);

        screen.init();
        settle(&mut screen).await;
        assert_eq!(screen.controller.cache().current(), &CacheState::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn typing_and_submitting_adds_a_contact() {
        let mut screen = EntityScreen::<ContactSchema>::new(backend(), Arc::new(KeyResolver::default()));
        screen.init();
        settle(&mut screen).await;

        type_str(&mut screen, "Jane");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "jane@x.io");
        settle(&mut screen).await;
        assert_eq!(screen.controller.draft().value("email"), "jane@x.io");

        press(&mut screen, KeyCode::Enter);
        settle(&mut screen).await;

        let controller = &screen.controller;
        assert_eq!(controller.status().text(), "Contact added successfully!");
        assert!(controller.draft().is_pristine());
        assert_eq!(controller.cache().records().len(), 1);
        assert_eq!(controller.cache().records()[0].name, "Jane");
        assert_eq!(screen.focus, 0);
    }

    #[tokio::test]
    async fn edits_during_submit_are_dropped() {
        let mut screen = EntityScreen::<ContactSchema>::new(backend(), Arc::new(KeyResolver::default()));
        screen.init();
        settle(&mut screen).await;

        type_str(&mut screen, "Jane");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "jane@x.io");
        settle(&mut screen).await;

        press(&mut screen, KeyCode::Enter);
        type_str(&mut screen, "m");
        let UpdateResult::Commands(commands) = screen.update() else {
            panic!("expected the create command");
        };
        assert!(screen.controller.is_submitting());
        assert_eq!(screen.controller.draft().value("email"), "jane@x.io");
        let Input::Text(email) = &screen.inputs[1].1 else {
            panic!("email is a text field");
        };
        assert_eq!(email.value(), "jane@x.io");

        for command in commands {
            command.execute().await.unwrap();
        }
        settle(&mut screen).await;
        assert_eq!(screen.controller.cache().records()[0].email, "jane@x.io");
        assert!(screen.controller.draft().is_pristine());
    }

    #[tokio::test]
    async fn enter_on_incomplete_form_spawns_nothing() {
        let mut screen = EntityScreen::<ContactSchema>::new(backend(), Arc::new(KeyResolver::default()));
        assert!(press(&mut screen, KeyCode::Enter));
        assert!(matches!(screen.update(), UpdateResult::Idle));
        assert!(!screen.controller.is_submitting());
    }

    #[tokio::test]
    async fn choice_field_feeds_the_draft() {
        let mut screen = EntityScreen::<ExpenseSchema>::new(backend(), Arc::new(KeyResolver::default()));
        for _ in 0..3 {
            press(&mut screen, KeyCode::Tab);
        }
        assert!(press(&mut screen, KeyCode::Right));
        settle(&mut screen).await;
        assert_eq!(screen.controller.draft().value("category"), "Travel");
    }

    #[tokio::test]
    async fn invalid_amount_is_reported_without_remote_call() {
        let mut screen = EntityScreen::<ExpenseSchema>::new(backend(), Arc::new(KeyResolver::default()));
        screen.init();
        settle(&mut screen).await;

        type_str(&mut screen, "Lunch");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "abc");
        press(&mut screen, KeyCode::Tab);
        type_str(&mut screen, "2024-05-01");
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Right);
        settle(&mut screen).await;

        press(&mut screen, KeyCode::Enter);
        assert!(matches!(screen.update(), UpdateResult::Idle));
        assert_eq!(
            screen.controller.status().text(),
            "Error adding expense: Amount must be a number"
        );
        assert_eq!(screen.controller.draft().value("amount"), "abc");
    }
}
