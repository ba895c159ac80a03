//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(14),   // charts + controls
            Constraint::Length(6), // notifications
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // sliders
            Constraint::Length(8), // stats
            Constraint::Length(3), // satisfaction
        ])
        .split(body[1]);

    render_header(frame, app, chunks[0]);
    render_load_chart(frame, app, charts[0]);
    render_price_chart(frame, app, charts[1]);
    render_sliders(frame, app, side[0]);
    render_stats(frame, app, side[1]);
    render_satisfaction(frame, app, side[2]);
    render_log(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Header bar: preset, clock, upcoming price, auto-play state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.preview;
    let (state_icon, state_label) = if app.paused {
        ("‖", "MANUAL")
    } else {
        ("▶", "AUTO")
    };

    let mut spans = vec![
        Span::styled(
            " DR-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ Day {} {:02}:00 │ ${:.3}/kWh │ {:.2} kW │ {}ms │ {} {} ",
            p.day,
            p.hour,
            p.price,
            p.base_load_kw,
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ];
    if let Some(event) = p.event {
        spans.push(Span::styled(
            format!("│ {event} "),
            Style::default()
                .fg(style::EVENT_ACTIVE)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hourly_points(values: &[f64; 24]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(h, &v)| (h as f64, v))
        .collect()
}

/// Today's base load vs load after realized curtailment.
fn render_load_chart(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.preview;
    let base = hourly_points(&p.loads);
    let used: Vec<(f64, f64)> = p
        .loads
        .iter()
        .zip(p.curtailed.iter())
        .enumerate()
        .take(p.hour)
        .map(|(h, (&load, &cut))| (h as f64, load - cut))
        .collect();

    let y_bounds = style::auto_bounds_y(&[base.as_slice(), used.as_slice()]);

    let datasets = vec![
        Dataset::default()
            .name("Base load")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::LOAD_COLOR))
            .data(&base),
        Dataset::default()
            .name("With DR")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::CURTAIL_COLOR))
            .data(&used),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Load Profile (today) ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("hour")
                .bounds([0.0, 23.0])
                .labels(vec!["0".to_string(), "12".to_string(), "23".to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Today's price series under the running plan.
fn render_price_chart(frame: &mut Frame, app: &App, area: Rect) {
    let prices = hourly_points(&app.preview.prices);
    let y_bounds = style::auto_bounds_y(&[prices.as_slice()]);

    let datasets = vec![
        Dataset::default()
            .name("$/kWh")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::PRICE_COLOR))
            .data(&prices),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().title(" Price ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, 23.0])
                .labels(vec!["0".to_string(), "12".to_string(), "23".to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("$")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.2}", y_bounds[0]),
                    format!("{:.2}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Overall dial and per-technology sliders with the DR status indicator.
fn render_sliders(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = app
        .sliders
        .dials
        .iter()
        .enumerate()
        .map(|(i, dial)| {
            let marker = if i == app.sliders.selected { "▸" } else { " " };
            let text = format!(
                "{marker} {:<22} {:>5.1}% / {:>3.0}%",
                dial.label, dial.value, dial.max
            );
            if i == app.sliders.selected {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(style::SELECTED)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    lines.push(Line::from(format!(
        "  Technical potential: {:.1} kW",
        app.technical_potential_kw()
    )));
    let status = app.dr_status();
    lines.push(Line::from(vec![
        Span::raw("  DR status: "),
        Span::styled(
            status.to_string(),
            Style::default()
                .fg(style::dr_status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let block = Block::default()
        .title(" Curtailment ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Running totals and the latest hour.
fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if let Some(s) = app.state() {
        let mut lines = vec![
            Line::from(format!(
                "  cost today=${:.2}  saved today=${:.2}",
                s.cost_today, s.savings_today
            )),
            Line::from(format!(
                "  total saved=${:.2}  CO2={:.1} kg",
                s.cumulative_savings, s.emissions_saved_kg
            )),
            Line::from(format!(
                "  events today={}  achievements={}",
                s.events_today.len(),
                s.unlocked_achievements.len()
            )),
        ];
        if let Some(r) = app.sliders.last_outcome.as_ref().map(|o| &o.record) {
            lines.push(Line::from(format!(
                "  last {:02}:00 curtail={:.1}% ({:.2} kW)",
                r.hour, r.effective_curtailment_pct, r.curtailed_kw
            )));
            lines.push(Line::from(format!(
                "  cost=${:.3} saved=${:.3} penalty={}",
                r.cost, r.savings, r.comfort_penalty
            )));
        }
        lines
    } else {
        vec![Line::from("  No simulation running")]
    };

    let block = Block::default().title(" Totals ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_satisfaction(frame: &mut Frame, app: &App, area: Rect) {
    let sat = app.state().map_or(0, |s| s.satisfaction);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Satisfaction ")
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(style::satisfaction_color(sat)))
        .ratio((f64::from(sat) / 100.0).clamp(0.0, 1.0))
        .label(format!("{sat}%"));
    frame.render_widget(gauge, area);
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let height = usize::from(area.height.saturating_sub(2));
    let skip = app.sliders.log.len().saturating_sub(height);
    let lines: Vec<Line> = app
        .sliders
        .log
        .iter()
        .skip(skip)
        .map(|l| Line::from(format!("  {l}")))
        .collect();
    let block = Block::default()
        .title(" Notifications ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints, or the last error.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = match &app.error {
        Some(e) => Span::styled(format!(" error: {e}"), Style::default().fg(style::ERROR_FG)),
        None => Span::styled(
            " q:Quit  n:Next hour  Space:Auto  ↑↓:Select  ←→:Adjust  +/-:Speed  1-4:Preset  r:Reset",
            Style::default().fg(style::FOOTER_FG),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), area);
}
