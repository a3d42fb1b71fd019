use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::Theme;
use crate::commands::EchoCmd;
use crate::config::{FormAction, KeyResolver};
use crate::form::EchoController;
use crate::remote::{GreetingService, RemoteError};
use crate::screen::{Screen, UpdateResult};
use crate::ui::{Component, EventResult, Keybinding, LABEL_WIDTH, TextField};

#[derive(Debug)]
pub enum GreetingMsg {
    NameEdited(String),
    Submit,
    Replied(Result<String, RemoteError>),
}

/// Single input that asks the service to greet a name.
pub struct GreetingScreen {
    controller: EchoController,
    input: TextField,
    failed: bool,
    service: Arc<dyn GreetingService>,
    resolver: Arc<KeyResolver>,
    msg_tx: UnboundedSender<GreetingMsg>,
    msg_rx: UnboundedReceiver<GreetingMsg>,
}

impl GreetingScreen {
    pub fn new(service: Arc<dyn GreetingService>, resolver: Arc<KeyResolver>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let mut input = TextField::new("Name").with_placeholder("Your name");
        input.set_focused(true);
        Self {
            controller: EchoController::new(),
            input,
            failed: false,
            service,
            resolver,
            msg_tx,
            msg_rx,
        }
    }

    fn queue(&self, msg: GreetingMsg) {
        let _ = self.msg_tx.send(msg);
    }

    fn process_message(&mut self, msg: GreetingMsg) -> UpdateResult {
        match msg {
            GreetingMsg::NameEdited(name) => {
                self.controller.update_name(name);
                UpdateResult::Idle
            }
            GreetingMsg::Submit => match self.controller.begin_echo() {
                Some(name) => {
                    self.failed = false;
                    EchoCmd::new(self.service.clone(), name, self.msg_tx.clone()).into()
                }
                None => UpdateResult::Idle,
            },
            GreetingMsg::Replied(outcome) => {
                self.failed = outcome.is_err();
                self.controller.complete_echo(outcome);
                UpdateResult::Idle
            }
        }
    }
}

impl Screen for GreetingScreen {
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.resolver.matches_form(&key, FormAction::Submit) {
            self.queue(GreetingMsg::Submit);
            return true;
        }
        match self.input.handle_key(key) {
            Ok(EventResult::Event(name)) => {
                self.queue(GreetingMsg::NameEdited(name));
                true
            }
            Ok(result) => result.is_consumed(),
            Err(_) => false,
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
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()))
            .title(" Greeting ")
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));
        let [form_area, _] = Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(area);
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let [input_area, _, button_area, reply_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        self.input.render(frame, input_area, theme);

        let indent = Span::raw(" ".repeat(LABEL_WIDTH + 2));
        let button = if self.controller.is_submitting() {
            Span::styled("Waiting for reply...", Style::default().fg(theme.yellow()))
        } else {
            Span::styled("[ Say hello ]", Style::default().fg(theme.green()).add_modifier(Modifier::BOLD))
        };
        let key = Span::styled(
            format!("  {}", self.resolver.display_form(FormAction::Submit)),
            Style::default().fg(theme.overlay0()),
        );
        frame.render_widget(Paragraph::new(Line::from(vec![indent.clone(), button, key])), button_area);

        let reply_color = if self.failed { theme.red() } else { theme.blue() };
        let reply = Paragraph::new(Line::from(vec![
            indent,
            Span::styled(
                self.controller.greeting().to_string(),
                Style::default().fg(reply_color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .wrap(Wrap { trim: false });
        frame.render_widget(reply, reply_area);
    }

    fn title(&self) -> &'static str {
        "Greeting"
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::new(self.resolver.display_form(FormAction::Submit), "Say hello")]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::BackendConfig;
    use crate::remote::SandboxBackend;

    fn screen() -> GreetingScreen {
        let config = BackendConfig {
            latency_ms: 0,
            data_file: None,
        };
        let backend = Arc::new(SandboxBackend::open(&config).unwrap());
        GreetingScreen::new(backend, Arc::new(KeyResolver::default()))
    }

    async fn submit(screen: &mut GreetingScreen) {
        assert!(screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        let UpdateResult::Commands(commands) = screen.update() else {
            panic!("expected an echo command");
        };
        assert!(screen.controller.is_submitting());
        for command in commands {
            command.execute().await.unwrap();
        }
        assert!(matches!(screen.update(), UpdateResult::Idle));
    }

    #[tokio::test]
    async fn greets_the_typed_name() {
        let mut screen = screen();
        for c in "Ada".chars() {
            screen.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        submit(&mut screen).await;
        assert_eq!(screen.controller.greeting(), "Hello, Ada!");
        assert!(!screen.failed);
    }

    #[tokio::test]
    async fn empty_name_shows_server_error() {
        let mut screen = screen();
        submit(&mut screen).await;
        assert!(screen.controller.greeting().starts_with("Error: "));
        assert!(screen.failed);
    }
}
