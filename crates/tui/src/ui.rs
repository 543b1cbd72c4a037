//! Rendering for the four wizard stages.
//!
//! Pure projection of [`App`] state into ratatui widgets; no state changes
//! happen here. Each stage has its own draw function, plus a shared header
//! with the progress indicator and a status log at the bottom.

use ratatui::{prelude::*, widgets::*};
use triptest_types::{BookingMode, ExecutionOutcome, FieldKind, WizardStep};

use crate::app::App;
use crate::theme;

const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(1), // progress indicator
            Constraint::Min(5),    // stage body
            Constraint::Length(1), // key hints
            Constraint::Length(4), // status log
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);
    draw_progress(f, app, chunks[1]);
    match app.step {
        WizardStep::Select => draw_select(f, app, chunks[2]),
        WizardStep::Configure => draw_configure(f, app, chunks[2]),
        WizardStep::Execute => draw_execute(f, app, chunks[2]),
        WizardStep::Results => draw_results(f, app, chunks[2]),
    }
    draw_hints(f, app, chunks[3]);
    draw_logs(f, app, chunks[4]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let subtitle = match app.mode {
        Some(mode) => format!("Travel booking test automation — {} run", mode.title()),
        None => "Travel booking test automation".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).border_style(theme::border_style(false));
    let text = vec![Line::from(vec![
        Span::styled("Triptest Dashboard", theme::title_style().fg(theme::ACCENT)),
        Span::raw("  "),
        Span::styled(subtitle, theme::text_muted()),
    ])];
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, step) in WizardStep::ALL.iter().enumerate() {
        let style = if *step == app.step {
            theme::title_style().fg(theme::ACCENT)
        } else if step.index() < app.step.index() {
            theme::ok_style()
        } else {
            theme::text_muted()
        };
        spans.push(Span::styled(format!("({}) {}", i + 1, step.label()), style));
        if i + 1 < WizardStep::ALL.len() {
            spans.push(Span::styled(" ── ", theme::text_muted()));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_select(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Select Booking Mode", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(true));

    let items: Vec<ListItem> = BookingMode::ALL
        .iter()
        .map(|mode| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8}", mode.title()), theme::text_style()),
                Span::styled(mode.blurb(), theme::text_muted()),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.mode_cursor));
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::list_highlight_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_configure(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else { return };
    let title = match app.mode {
        Some(mode) => format!("{} Test Configuration", mode.title()),
        None => "Test Configuration".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(true));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);
    let splits = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // Keep the selected row visible on small terminals.
    let visible = splits[0].height as usize;
    let first = form.selected.saturating_sub(visible.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;
    for (row, (spec, value)) in form.specs.iter().zip(&form.values).enumerate().skip(first).take(visible) {
        let focused = row == form.selected;
        let label = format!("{:<24}", spec.label);
        let mut spans = vec![Span::styled(label, if focused { theme::text_style() } else { theme::text_muted() })];
        match spec.kind {
            FieldKind::Select => {
                let shown = if value.is_empty() { "(choose with ←/→)" } else { value.as_str() };
                spans.push(Span::styled("◂ ", theme::text_muted()));
                spans.push(Span::styled(shown.to_string(), theme::text_style()));
                spans.push(Span::styled(" ▸", theme::text_muted()));
            }
            _ => {
                if value.is_empty() {
                    if let Some(placeholder) = &spec.placeholder {
                        spans.push(Span::styled(placeholder.clone(), theme::text_muted()));
                    }
                } else {
                    spans.push(Span::styled(value.clone(), theme::text_style()));
                }
                if focused {
                    let y = splits[0].y + (row - first) as u16;
                    // Long values would otherwise push the cursor past the pane.
                    let x = (splits[0].x + 24 + value.chars().count() as u16)
                        .min(splits[0].right().saturating_sub(1));
                    cursor = Some((x, y));
                }
            }
        }
        let mut line = Line::from(spans);
        if focused {
            line = line.style(theme::highlight_style());
        }
        lines.push(line);
    }
    f.render_widget(Paragraph::new(lines), splits[0]);

    if let Some(description) = &form.selected_spec().description {
        f.render_widget(
            Paragraph::new(Span::styled(description.clone(), theme::text_muted())),
            splits[1],
        );
    }
    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }
}

fn draw_execute(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Ready to Execute Test", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(true));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled("Mode            ", theme::text_muted()),
        Span::styled(
            app.mode.map(|m| m.title()).unwrap_or("—"),
            theme::text_style(),
        ),
    ])];
    for (key, value) in app.record.iter() {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<16}"), theme::text_muted()),
            Span::styled(value.display(), theme::text_style()),
        ]));
    }
    lines.push(Line::default());

    if app.executing {
        lines.push(Line::from(vec![
            Span::styled(THROBBER[app.throbber_idx % THROBBER.len()], theme::ok_style()),
            Span::styled(" Executing test...", theme::text_style()),
        ]));
    } else if let Some(outcome) = app.outcome.as_ref() {
        lines.extend(error_panel(outcome));
    } else {
        lines.push(Line::from(Span::styled(
            "The service will resolve locators from its repository and drive the booking flow.",
            theme::text_muted(),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Inline error display for a failed attempt, with remediation guidance.
/// A timeout points at the browser driver; anything else at the service.
fn error_panel(outcome: &ExecutionOutcome) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match outcome {
        ExecutionOutcome::Success(_) => {}
        ExecutionOutcome::ApplicationFailure { message } => {
            lines.push(Line::from(vec![
                Span::styled("Test execution failed: ", theme::warn_style()),
                Span::styled(message.clone(), theme::text_style()),
            ]));
            lines.push(Line::from(Span::styled(
                "Check that the test case exists for this mode and the test data is complete.",
                theme::text_muted(),
            )));
        }
        ExecutionOutcome::TransportError { message, timeout } => {
            lines.push(Line::from(vec![
                Span::styled("Transport error: ", theme::warn_style()),
                Span::styled(message.clone(), theme::text_style()),
            ]));
            if *timeout {
                lines.push(Line::from(Span::styled(
                    "The request hit the 120s ceiling. Check that the automation driver can launch the browser.",
                    theme::text_muted(),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "Verify the automation service is running and TRIPTEST_API_BASE points at it.",
                    theme::text_muted(),
                )));
            }
        }
    }
    if !lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Enter to retry or 'b' to reconfigure.",
            theme::text_muted(),
        )));
    }
    lines
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Test Results", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(true));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let Some(report) = app.report() else {
        f.render_widget(
            Paragraph::new(Span::styled("No results to display.", theme::text_muted())),
            inner,
        );
        return;
    };

    let splits = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let test_id = if report.test_id.is_empty() { "(no id)" } else { report.test_id.as_str() };
    let status = if report.status.is_empty() { "unknown" } else { report.status.as_str() };
    let summary = vec![
        Line::from(vec![
            Span::styled("Test ", theme::text_muted()),
            Span::styled(test_id.to_string(), theme::text_style()),
            Span::raw("  "),
            Span::styled(status.to_uppercase(), theme::status_style(status)),
        ]),
        Line::from(vec![
            Span::styled(format!("{} steps  ", report.total_steps), theme::text_style()),
            Span::styled(format!("{} passed  ", report.passed_steps), theme::ok_style()),
            Span::styled(format!("{} failed  ", report.failed_steps), theme::warn_style()),
            Span::styled(
                report.execution_time.clone().unwrap_or_else(|| "duration n/a".into()),
                theme::text_muted(),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(summary), splits[0]);

    if report.step_results.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No step results reported.", theme::text_muted())),
            splits[1],
        );
        return;
    }

    let rows: Vec<Row> = report
        .step_results
        .iter()
        .skip(app.results_offset)
        .map(|step| {
            let detail = step
                .error
                .as_deref()
                .or(step.message.as_deref())
                .unwrap_or_default()
                .to_string();
            Row::new(vec![
                Cell::from(step.step_number.to_string()),
                Cell::from(step.element_name.clone()),
                Cell::from(step.action_type.clone()),
                Cell::from(step.test_value.clone().unwrap_or_default()),
                Cell::from(Span::styled(step.status.clone(), theme::status_style(&step.status))),
                Cell::from(detail),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(18),
            Constraint::Length(22),
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["#", "Element", "Action", "Value", "Status", "Detail"]).style(theme::title_style()),
    );
    f.render_widget(table, splits[1]);
}

fn draw_hints(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.step {
        WizardStep::Select => &[("↑/↓", "choose"), ("Enter", "configure"), ("q", "quit")],
        WizardStep::Configure => &[
            ("↑/↓", "field"),
            ("←/→", "options"),
            ("Enter", "submit"),
            ("Esc", "start over"),
        ],
        WizardStep::Execute => &[("Enter", "run"), ("b", "back"), ("Esc", "start over")],
        WizardStep::Results => &[("↑/↓", "scroll"), ("n", "new test"), ("q", "quit")],
    };
    let mut spans = vec![Span::styled(" Hints: ", theme::text_muted())];
    for (key, action) in hints {
        spans.push(Span::styled(*key, theme::title_style().fg(theme::ACCENT)));
        spans.push(Span::styled(format!(" {action}  "), theme::text_muted()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Status", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));
    let visible = block.inner(area).height as usize;
    let first = app.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = app.logs[first..]
        .iter()
        .map(|entry| Line::from(Span::styled(entry.clone(), theme::text_muted())))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use triptest_types::Msg;

    use super::*;

    #[test]
    fn configure_cursor_is_clamped_to_the_form_pane() {
        let mut app = App::new();
        app.update(Msg::ModeChosen);
        for ch in "a city name far too long for a narrow pane".chars() {
            app.update(Msg::FieldChar(ch));
        }

        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("test terminal");
        terminal.draw(|frame| draw(frame, &mut app)).expect("draw configure");

        let pos = terminal.get_cursor_position().expect("cursor position");
        assert!(pos.x < 40, "cursor column {} escaped the terminal", pos.x);
    }
}
