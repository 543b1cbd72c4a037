//! Event loop and input routing for the dashboard.
//!
//! Responsibilities:
//! - Own the terminal lifecycle (raw mode, alternate screen).
//! - Forward crossterm events from a dedicated reader task over a channel.
//! - Translate keys into `Msg`s appropriate for the current wizard step.
//! - Turn `Effect`s into spawned execution tasks and feed their outcomes
//!   back as `Msg::ExecCompleted`.
//!
//! Ticking is adaptive: a fast interval drives the spinner while an attempt
//! is in flight, a slow one keeps the loop nearly idle otherwise.

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use triptest_api::AutomationClient;
use triptest_types::{Effect, ExecutionOutcome, Msg, WizardStep};

use crate::app::App;
use crate::ui;

/// What a key press means once translated for the current step.
enum KeyAction {
    Msg(Msg),
    Quit,
    None,
}

/// Spawn a task that blocks on terminal input and forwards events over a
/// channel, keeping poll/read on one task for reliable delivery.
fn spawn_input_task() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(100);
    tokio::task::spawn_blocking(move || {
        loop {
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if sender.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("failed to read terminal event: {e}");
                        break;
                    }
                },
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to poll terminal events: {e}");
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Translate a key press for the current wizard step.
///
/// Ctrl+C always quits. Plain characters are only treated as shortcuts on
/// steps without a text field; on Configure they feed the focused field.
fn translate_key(app: &App, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    match app.step {
        WizardStep::Select => match key.code {
            KeyCode::Up => KeyAction::Msg(Msg::ModeUp),
            KeyCode::Down => KeyAction::Msg(Msg::ModeDown),
            KeyCode::Enter => KeyAction::Msg(Msg::ModeChosen),
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        },
        WizardStep::Configure => match key.code {
            KeyCode::Up | KeyCode::BackTab => KeyAction::Msg(Msg::FieldUp),
            KeyCode::Down | KeyCode::Tab => KeyAction::Msg(Msg::FieldDown),
            KeyCode::Left => KeyAction::Msg(Msg::FieldCycleLeft),
            KeyCode::Right => KeyAction::Msg(Msg::FieldCycleRight),
            KeyCode::Enter => KeyAction::Msg(Msg::SubmitForm),
            KeyCode::Backspace => KeyAction::Msg(Msg::FieldBackspace),
            KeyCode::Esc => KeyAction::Msg(Msg::NewTest),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyAction::Msg(Msg::FieldChar(c))
            }
            _ => KeyAction::None,
        },
        WizardStep::Execute => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => KeyAction::Msg(Msg::Run),
            KeyCode::Char('b') => KeyAction::Msg(Msg::BackToConfigure),
            KeyCode::Esc => KeyAction::Msg(Msg::NewTest),
            KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::None,
        },
        WizardStep::Results => match key.code {
            KeyCode::Up => KeyAction::Msg(Msg::ResultsScroll(-1)),
            KeyCode::Down => KeyAction::Msg(Msg::ResultsScroll(1)),
            KeyCode::PageUp => KeyAction::Msg(Msg::ResultsScroll(-10)),
            KeyCode::PageDown => KeyAction::Msg(Msg::ResultsScroll(10)),
            KeyCode::Char('n') | KeyCode::Esc => KeyAction::Msg(Msg::NewTest),
            KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::None,
        },
    }
}

/// Turn effects into background execution tasks. Only one attempt can be in
/// flight because `App::update` refuses `Run` while `executing` is set.
fn process_effects(
    client: &AutomationClient,
    effects: Vec<Effect>,
    pending: &mut FuturesUnordered<JoinHandle<ExecutionOutcome>>,
) {
    for effect in effects {
        match effect {
            Effect::ExecuteRequested { mode, record } => {
                let client = client.clone();
                pending.push(tokio::spawn(async move { client.execute_test(mode, record).await }));
            }
        }
    }
}

/// Entry point: terminal setup, event processing, teardown.
pub async fn run_app(client: AutomationClient) -> Result<()> {
    let mut input = spawn_input_task();
    let mut app = App::new();
    let mut terminal = setup_terminal()?;

    let mut pending: FuturesUnordered<JoinHandle<ExecutionOutcome>> = FuturesUnordered::new();

    let fast_interval = Duration::from_millis(125);
    let idle_interval = Duration::from_millis(1000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    loop {
        let target = if app.executing { fast_interval } else { idle_interval };
        if target != current_interval {
            current_interval = target;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input.recv() => {
                let Some(ev) = maybe_event else { break };
                match ev {
                    Event::Key(key) => match translate_key(&app, key) {
                        KeyAction::Quit => break,
                        KeyAction::Msg(msg) => {
                            let effects = app.update(msg);
                            process_effects(&client, effects, &mut pending);
                            needs_render = true;
                        }
                        KeyAction::None => {}
                    },
                    Event::Resize(w, h) => {
                        app.update(Msg::Resize(w, h));
                        needs_render = true;
                    }
                    _ => {}
                }
            }

            _ = ticker.tick() => {
                app.update(Msg::Tick);
                needs_render = app.executing;
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecutionOutcome::TransportError {
                    message: format!("execution task failed: {error}"),
                    timeout: false,
                });
                let effects = app.update(Msg::ExecCompleted(Box::new(outcome)));
                process_effects(&client, effects, &mut pending);
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}
