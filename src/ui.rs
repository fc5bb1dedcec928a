use crate::app::App;
use crate::braille::{BrailleCanvas, OUTLINE_SHADE};
use crate::map::{Viewport, SHADE_BUCKETS};
use crate::stats::{Metric, StateAggregate};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into dashboard area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Dashboard
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[0]);

    let map_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40), // Top ten
            Constraint::Percentage(40), // Bottom ten
            Constraint::Min(8),         // Hover detail
        ])
        .split(columns[1]);

    let hovered = render_map(frame, app, map_chunks[0]);
    render_legend(frame, app, map_chunks[1]);
    render_bar_chart(frame, app, right[0], " Top Ten States ", &app.top_ten);
    render_bar_chart(frame, app, right[1], " Bottom Ten States ", &app.bottom_ten);
    render_detail(frame, app, right[2], hovered);
    render_status_bar(frame, app, chunks[1]);
}

/// Render the choropleth map; returns the hovered state's aggregate, if any.
fn render_map<'a>(frame: &mut Frame, app: &'a App, area: Rect) -> Option<&'a StateAggregate> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " COVID-19 by State ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character; refit to the panel so the
    // choropleth fills it at any terminal size
    let pixel_width = inner.width as usize * 2;
    let pixel_height = inner.height as usize * 4;
    let viewport = match app.map_renderer.bounds() {
        Some(bounds) => Viewport::fit(bounds, pixel_width, pixel_height),
        None => Viewport::new(0.0, 20.0, 1.0, pixel_width, pixel_height),
    };

    let canvas =
        app.map_renderer
            .render(inner.width as usize, inner.height as usize, &viewport, |name| {
                app.shade_for(name)
            });

    // Hit-test the mouse position against the state polygons
    let cursor_pos = app.mouse_pos.and_then(|(col, row)| {
        (col >= inner.x && col < inner.x + inner.width && row >= inner.y && row < inner.y + inner.height)
            .then(|| (col - inner.x, row - inner.y))
    });
    let hovered = cursor_pos.and_then(|(cx, cy)| {
        let (lon, lat) = viewport.unproject(cx as i32 * 2, cy as i32 * 4);
        let name = app.map_renderer.state_at(lon, lat)?;
        app.aggregate_for(name)
    });

    frame.render_widget(MapWidget { canvas, cursor_pos }, inner);

    hovered
}

/// Braille choropleth widget: one canvas whose per-cell shade picks the color
struct MapWidget {
    canvas: BrailleCanvas,
    cursor_pos: Option<(u16, u16)>,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in self.canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                let color = shade_color(self.canvas.shade(col_idx, row_idx));
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }

        // Render cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

/// White-to-dark-red ramp over the fill buckets; outlines stay gray.
fn shade_color(shade: u8) -> Color {
    if shade == OUTLINE_SHADE {
        return Color::Gray;
    }
    if shade == 0 {
        return Color::DarkGray;
    }
    let t = (shade - 1) as f64 / (SHADE_BUCKETS - 1) as f64;
    let r = 255.0 - t * (255.0 - 139.0);
    let gb = 255.0 * (1.0 - t);
    Color::Rgb(r as u8, gb as u8, gb as u8)
}

/// Gradient legend from 0 to the current metric maximum
fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" 0 ", Style::default().fg(Color::Gray))];
    for shade in 1..=SHADE_BUCKETS {
        spans.push(Span::styled("██", Style::default().fg(shade_color(shade))));
    }
    spans.push(Span::styled(
        format!(" {}", format_value(app.metric, app.max_value)),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        format!("  ({})", app.metric.label()),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bar_chart(frame: &mut Frame, app: &App, area: Rect, title: &'static str, ranked: &[StateAggregate]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let bars: Vec<Bar> = ranked
        .iter()
        .map(|agg| {
            let value = app.metric.value_of(agg);
            // BarChart wants u64 heights; scale percentages up so small
            // rates still produce visible bars
            let height = if value.is_finite() {
                if app.metric.is_relative() {
                    (value * 10_000.0).max(0.0) as u64
                } else {
                    value.max(0.0) as u64
                }
            } else {
                0
            };
            let label = app
                .postal_code(&agg.state)
                .map(str::to_string)
                .unwrap_or_else(|| agg.state.chars().take(2).collect());

            Bar::default()
                .label(Line::from(label))
                .value(height)
                .text_value(format_value(app.metric, value))
                .style(Style::default().fg(Color::Red))
                .value_style(Style::default().fg(Color::White).bg(Color::Red))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1);

    frame.render_widget(chart, area);
}

/// Hover detail panel, the terminal stand-in for the original tooltips
fn render_detail(frame: &mut Frame, _app: &App, area: Rect, hovered: Option<&StateAggregate>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " State Detail ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = match hovered {
        Some(agg) => vec![
            Line::from(Span::styled(
                agg.state.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            detail_line("Population", thousands(agg.population as i64)),
            detail_line("Cases (absolute)", thousands(agg.abs_cases)),
            detail_line("Deaths (absolute)", thousands(agg.abs_deaths)),
            detail_line("Cases (relative)", format_percent(agg.rel_cases)),
            detail_line("Deaths (relative)", format_percent(agg.rel_deaths)),
        ],
        None => vec![Line::from(Span::styled(
            "Hover a state on the map",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_line(name: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Metric: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.metric.label(), Style::default().fg(Color::Yellow)),
        Span::styled(" | Range: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.range_label(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" | {} records", thousands(app.record_count() as i64)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            " | 1-5/m:metric f:filter [ ] { }:range c:clear r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

/// Format a metric value for the legend, bar labels, and detail panel
fn format_value(metric: Metric, value: f64) -> String {
    if metric.is_relative() {
        format_percent(value)
    } else if value.is_finite() {
        thousands(value as i64)
    } else {
        "n/a".to_string()
    }
}

fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        "n/a".to_string()
    }
}

/// Insert thousands separators ("39538223" -> "39,538,223")
fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
