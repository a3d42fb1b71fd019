use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Tabs};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::commands::Command;
use crate::config::{GlobalAction, KeyResolver};
use crate::entity::{ContactSchema, ExpenseSchema};
use crate::remote::SandboxBackend;
use crate::screen::{EntityScreen, GreetingScreen, Screen, UpdateResult};
use crate::tui::{Event, Tui};
use crate::ui::{Component, StatusBar, Toast, ToastManager};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

/// Identifies a spawned command while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

/// Messages sent back to the App by spawned commands.
#[derive(Debug)]
pub enum AppMessage {
    CommandCompleted {
        id: CommandId,
        /// Screen that returned the command; it is updated afterwards.
        screen: usize,
        error: Option<String>,
    },
}

enum Step {
    Event(Option<Event>),
    Message(AppMessage),
}

pub struct App {
    screens: Vec<Box<dyn Screen>>,
    active: usize,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    status_bar: StatusBar,
    toasts: ToastManager,
    running: HashMap<CommandId, String>,
    next_command_id: u64,
    msg_tx: UnboundedSender<AppMessage>,
    msg_rx: UnboundedReceiver<AppMessage>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    /// Build the App with one tab per form, all talking to `backend`.
    pub fn new(backend: &Arc<SandboxBackend>, resolver: Arc<KeyResolver>, theme: Theme, initial_tab: usize) -> Self {
        let screens: Vec<Box<dyn Screen>> = vec![
            Box::new(EntityScreen::<ContactSchema>::new(backend.clone(), resolver.clone())),
            Box::new(EntityScreen::<ExpenseSchema>::new(backend.clone(), resolver.clone())),
            Box::new(GreetingScreen::new(backend.clone(), resolver.clone())),
        ];
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            active: initial_tab.min(screens.len() - 1),
            screens,
            status_bar: StatusBar::new(resolver.clone()),
            resolver,
            theme,
            toasts: ToastManager::new(),
            running: HashMap::new(),
            next_command_id: 0,
            msg_tx,
            msg_rx,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        for index in 0..self.screens.len() {
            self.screens[index].init();
            self.update_screen(index);
        }

        while !self.should_quit {
            let step = tokio::select! {
                event = tui.next_event() => Step::Event(event),
                Some(msg) = self.msg_rx.recv() => Step::Message(msg),
            };

            match step {
                Step::Event(Some(event)) => self.handle_event(&mut tui, event)?,
                Step::Event(None) => break,
                Step::Message(msg) => self.handle_message(msg),
            }

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.enter()?;
                tui.clear()?;
            }
        }

        tui.exit()?;
        info!("Exiting");
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => {
                for screen in &mut self.screens {
                    screen.handle_tick();
                }
                self.toasts.handle_tick();
            }
            Event::Render => self.draw(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.draw(tui)?;
            }
            Event::Key(key) => self.handle_key(key),
            Event::Error(e) => {
                error!(error = %e, "Terminal event error");
                self.toasts.show(Toast::error(e));
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let resolver = &self.resolver;
        if resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
        } else if resolver.matches_global(&key, GlobalAction::NextTab) {
            self.active = (self.active + 1) % self.screens.len();
        } else if resolver.matches_global(&key, GlobalAction::PrevTab) {
            self.active = (self.active + self.screens.len() - 1) % self.screens.len();
        } else if self.screens[self.active].handle_key(key) {
            self.update_screen(self.active);
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::CommandCompleted { id, screen, error } => {
                let name = self.running.remove(&id).unwrap_or_default();
                if let Some(e) = error {
                    warn!(command = %name, error = %e, "Command failed");
                    self.toasts.show(Toast::error(format!("{name} failed: {e}")));
                } else {
                    debug!(command = %name, "Command finished");
                }
                self.update_screen(screen);
            }
        }
    }

    /// Drain a screen's queue and act on the result.
    fn update_screen(&mut self, index: usize) {
        match self.screens[index].update() {
            UpdateResult::Idle => {}
            UpdateResult::Commands(commands) => {
                for command in commands {
                    self.spawn(index, command);
                }
            }
            UpdateResult::Error { message, commands } => {
                error!(screen = self.screens[index].title(), error = %message, "Screen update failed");
                self.toasts.show(Toast::error(message));
                for command in commands {
                    self.spawn(index, command);
                }
            }
        }
    }

    fn spawn(&mut self, screen: usize, command: Box<dyn Command>) {
        let id = CommandId(self.next_command_id);
        self.next_command_id += 1;

        let name = command.name();
        info!(command = %name, "Spawning command");
        self.running.insert(id, name);

        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let error = command.execute().await.err().map(|e| e.to_string());
            let _ = tx.send(AppMessage::CommandCompleted { id, screen, error });
        });
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let [tabs_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .areas(frame.area());

        let titles: Vec<Line> = self.screens.iter().map(|s| Line::from(s.title())).collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(theme.subtext1()))
            .highlight_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .divider(" │ ")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.surface1())),
            );
        frame.render_widget(tabs, tabs_area);

        let screen = &mut self.screens[self.active];
        screen.render(frame, body_area, &theme);

        let keybindings = screen.keybindings();
        let title = screen.title();
        self.status_bar
            .render(frame, status_area, &theme, title, self.running.len(), &keybindings);

        self.toasts.render(frame, body_area, &theme);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::BackendConfig;

    fn app(initial_tab: usize) -> App {
        let config = BackendConfig {
            latency_ms: 0,
            data_file: None,
        };
        let backend = Arc::new(SandboxBackend::open(&config).unwrap());
        App::new(&backend, Arc::new(KeyResolver::default()), Theme::default(), initial_tab)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn tabs_wrap_in_both_directions() {
        let mut app = app(0);
        app.handle_key(ctrl('p'));
        assert_eq!(app.active, 2);
        app.handle_key(ctrl('n'));
        assert_eq!(app.active, 0);
    }

    #[tokio::test]
    async fn initial_tab_is_clamped() {
        assert_eq!(app(7).active, 2);
    }

    #[tokio::test]
    async fn quit_and_suspend_keys() {
        let mut app = app(0);
        app.handle_key(ctrl('z'));
        assert!(app.should_suspend);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn completed_commands_update_their_screen() {
        let mut app = app(0);
        app.screens[0].init();
        app.update_screen(0);
        assert_eq!(app.running.len(), 1);

        let msg = app.msg_rx.recv().await.unwrap();
        app.handle_message(msg);
        assert!(app.running.is_empty());
        assert!(app.toasts.visible().next().is_none());
    }
}
