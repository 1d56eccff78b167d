use crate::app::{App, CalculatorForm, Status, Tab};
use crate::present::{format_amount, ChartSeries, Presentation, TableView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, TableState, Tabs,
    },
    Frame,
};

const HELP: &str =
    "Tab: switch calculator | ↑/↓: field | Space/←/→: payment type | Enter: calculate | j/k g/G: table | e/x: export CSV/JSON | q: quit";

pub fn ui(f: &mut Frame, app: &mut App) {
    let form_height = app.form().fields().len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(form_height),
                Constraint::Length(7),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_tabs(f, app.tab, chunks[0]);
    render_form(f, app.form(), chunks[1]);
    render_results(f, app.form(), chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[3]);

    let form = app.form_mut();
    match &form.presentation {
        Some(view) => {
            render_chart(f, &view.chart, body[0]);
            render_table(f, &view.table, body[1], &mut form.table_state);
        }
        None => {
            let empty = Paragraph::new("Fill in the form and press Enter.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Schedule"));
            f.render_widget(empty, chunks[3]);
        }
    }

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[4]);
}

fn render_tabs(f: &mut Frame, active: Tab, area: Rect) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let selected = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Banking calculator"))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .select(selected);
    f.render_widget(tabs, area);
}

fn render_form(f: &mut Frame, form: &CalculatorForm, area: Rect) {
    let lines: Vec<Line> = form
        .fields()
        .iter()
        .map(|field| {
            let focused = *field == form.focus;
            let marker = if focused { "▶ " } else { "  " };
            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(format!("{}{}: {}", marker, field.label(), form.value(*field))).style(style)
        })
        .collect();

    let title = match form.tab {
        Tab::Loan => "Loan parameters",
        Tab::Deposit => "Deposit parameters",
    };
    let input = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn render_results(f: &mut Frame, form: &CalculatorForm, area: Rect) {
    let mut text = Vec::new();
    match &form.status {
        Some(Status::Error(msg)) => text.push(Line::from(Span::styled(
            format!("Error: {}", msg),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
        Some(Status::Info(msg)) => text.push(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Green),
        ))),
        None => {}
    }
    if let Some(Presentation { summary, .. }) = &form.presentation {
        for line in summary {
            text.push(Line::from(vec![
                Span::styled(format!("{}: ", line.label), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format_amount(line.value), Style::default().fg(Color::Cyan)),
            ]));
        }
    }

    let results = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .alignment(Alignment::Left);
    f.render_widget(results, area);
}

/// Bars carry cents so the integer bar heights keep two decimals.
fn to_bar_value(value: f64) -> u64 {
    (value.max(0.0) * 100.0).round() as u64
}

fn render_chart(f: &mut Frame, chart: &ChartSeries, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(chart.title)
        .title(
            Title::from(chart.x_label)
                .position(Position::Bottom)
                .alignment(Alignment::Center),
        );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let ticks = chart.y_ticks((inner.height as usize).clamp(1, 5));
    let axis_width = ticks.iter().map(|t| t.len()).max().unwrap_or(0) as u16 + 1;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(axis_width), Constraint::Min(1)].as_ref())
        .split(inner);

    // spread the tick labels evenly over the axis column
    let rows = columns[0].height.max(1) as usize;
    let mut axis = vec![Line::from(""); rows];
    let last = ticks.len().saturating_sub(1).max(1);
    for (i, tick) in ticks.iter().enumerate() {
        let row = (i * (rows - 1)) / last;
        axis[row] = Line::from(tick.as_str());
    }
    let axis = Paragraph::new(axis)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(axis, columns[0]);

    let count = chart.points.len().max(1) as u16;
    let bar_width = (columns[1].width / count).saturating_sub(1).clamp(1, 9);
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .map(|(period, value)| {
            Bar::default()
                .value(to_bar_value(*value))
                .label(Line::from(period.to_string()))
                .text_value(format_amount(*value))
        })
        .collect();

    let widget = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(to_bar_value(chart.y_max))
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::White).bg(Color::Blue));
    f.render_widget(widget, columns[1]);
}

fn render_table(f: &mut Frame, view: &TableView, area: Rect, state: &mut TableState) {
    let header = Row::new(view.headers.to_vec())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);
    let rows = view.rows.iter().map(|row| Row::new(row.to_vec()).height(1));
    let widths = [Constraint::Length(6), Constraint::Min(12)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Schedule"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, area, state);
}
