use super::render::{accent_color, draw_dashboard};
use crate::config::{persist_active_environment, EnvConfig, FlowscopeConfig};
use crate::dashboard::{Controller, Effect, Msg};
use crate::engine::{spawn_job, EngineClient, EngineReply};
use crate::shared::Logger;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);

#[derive(Debug)]
struct Timer {
    due: Instant,
    msg: Msg,
}

/// Carries out controller effects: engine jobs on worker threads, delayed messages, and
/// environment file writes.
#[derive(Debug)]
pub struct EffectRunner {
    env: EnvConfig,
    env_path: PathBuf,
    logger: Logger,
    reply_tx: Sender<EngineReply>,
    reply_rx: Receiver<EngineReply>,
    timers: Vec<Timer>,
    quit: bool,
}

impl EffectRunner {
    pub fn new(env: EnvConfig, env_path: PathBuf, logger: Logger) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            env,
            env_path,
            logger,
            reply_tx,
            reply_rx,
            timers: Vec::new(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn ui_color(&self, environment: &str) -> Option<&str> {
        self.env
            .environments
            .get(environment)
            .and_then(|env| env.ui_color.as_deref())
    }

    /// Runs `effects` and every effect produced by messages fed back along the way.
    pub fn run(&mut self, controller: &mut Controller, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Engine(job) => {
                    let Some(environment) = self.env.environments.get(job.environment()) else {
                        self.logger.error(
                            "engine.environment_missing",
                            &format!("environment={}", job.environment()),
                        );
                        continue;
                    };
                    spawn_job(EngineClient::new(environment), job, self.reply_tx.clone());
                }
                Effect::Schedule { delay, msg } => self.timers.push(Timer {
                    due: Instant::now() + delay,
                    msg,
                }),
                Effect::PersistActiveEnvironment(environment) => {
                    let result =
                        persist_active_environment(&self.env_path, &mut self.env, &environment)
                            .map_err(|e| e.to_string());
                    queue.extend(controller.update(Msg::EnvironmentPersisted {
                        environment,
                        result,
                    }));
                }
                Effect::Quit => self.quit = true,
            }
        }
    }

    /// Feeds finished engine jobs and due timers into the controller.
    pub fn pump(&mut self, controller: &mut Controller) {
        while let Ok(reply) = self.reply_rx.try_recv() {
            let effects = controller.update(Msg::Engine(reply));
            self.run(controller, effects);
        }
        let now = Instant::now();
        let (due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers)
                .into_iter()
                .partition(|timer| timer.due <= now);
        self.timers = pending;
        for timer in due {
            let effects = controller.update(timer.msg);
            self.run(controller, effects);
        }
    }

    /// Blocks until a reply arrives or `timeout` passes; used where no terminal drives the loop.
    pub fn wait_for_reply(&mut self, controller: &mut Controller, timeout: Duration) -> bool {
        match self.reply_rx.recv_timeout(timeout) {
            Ok(reply) => {
                let effects = controller.update(Msg::Engine(reply));
                self.run(controller, effects);
                true
            }
            Err(_) => false,
        }
    }
}

pub fn run_dashboard(config: FlowscopeConfig, env_path: PathBuf, logger: Logger) -> Result<(), String> {
    let environment = config
        .env
        .initial_environment()
        .ok_or_else(|| "no environments configured".to_string())?;
    let mut controller = Controller::new(
        config.app.catalog(),
        config.env.names(),
        environment,
        logger.clone(),
    )
    .with_users(config.app.users);
    let mut runner = EffectRunner::new(config.env, env_path, logger);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut controller, &mut runner);
    teardown_terminal(&mut terminal)?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    controller: &mut Controller,
    runner: &mut EffectRunner,
) -> Result<(), String> {
    let size = terminal
        .size()
        .map_err(|e| format!("failed to read terminal size: {e}"))?;
    controller.update(Msg::Resize {
        width: size.width,
        height: size.height,
    });
    let effects = controller.start();
    runner.run(controller, effects);

    loop {
        runner.pump(controller);
        if runner.should_quit() {
            break;
        }

        let accent = accent_color(runner.ui_color(controller.environment()));
        terminal
            .draw(|frame| draw_dashboard(frame, controller, accent))
            .map_err(|e| format!("failed to render dashboard: {e}"))?;

        if !event::poll(UI_POLL_INTERVAL).map_err(|e| format!("failed to poll events: {e}"))? {
            continue;
        }

        let msg = match event::read().map_err(|e| format!("failed to read event: {e}"))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Msg::Key(key),
            Event::Resize(width, height) => Msg::Resize { width, height },
            _ => continue,
        };
        let effects = controller.update(msg);
        runner.run(controller, effects);
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, String> {
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)
        .map_err(|e| format!("failed to enter alternate screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| format!("failed to initialize terminal: {e}"))
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), String> {
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(|e| format!("failed to leave alternate screen: {e}"))?;
    terminal
        .show_cursor()
        .map_err(|e| format!("failed to restore cursor: {e}"))?;
    Ok(())
}
