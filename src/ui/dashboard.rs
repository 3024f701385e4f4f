//! Dashboard view - summary, tabbed tables, detail panel and status bar

use super::detail::{job_details, node_details, queue_details, DetailRows};
use crate::app::{App, Severity, Tab};
use crate::export::{job_row, Align, JOB_COLUMNS};
use crate::format::{format_bool, format_optional, or_placeholder};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

/// Render the whole dashboard
pub fn render_dashboard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Summary
            Constraint::Min(8),    // Tables + detail
            Constraint::Length(3), // Status
            Constraint::Length(1), // Key help
        ])
        .split(f.area());

    render_summary(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);
    render_tables(f, app, body[0]);
    render_detail(f, app, body[1]);

    render_status(f, app, chunks[2]);
    render_footer(f, chunks[3]);
}

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "PBS Dash",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(snapshot) = &app.snapshot {
        let job_states = snapshot
            .job_state_counts()
            .iter()
            .map(|(state, count)| format!("{}: {}", state, count))
            .collect::<Vec<_>>()
            .join(", ");
        let node_states = snapshot
            .node_state_counts()
            .iter()
            .map(|(state, count)| format!("{}: {}", state, count))
            .collect::<Vec<_>>()
            .join(", ");

        spans.push(Span::raw(format!(
            " │ Jobs {} ({})",
            snapshot.jobs.len(),
            or_placeholder(Some(job_states.as_str()))
        )));
        spans.push(Span::styled(
            format!(
                " │ Nodes {} ({})",
                snapshot.nodes.len(),
                or_placeholder(Some(node_states.as_str()))
            ),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::styled(
            format!(" │ Queues {}", snapshot.queues.len()),
            Style::default().fg(Color::Magenta),
        ));
    } else {
        spans.push(Span::raw(" │ waiting for data"));
    }

    let summary = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, area);
}

fn render_tables(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!("{} ({})", tab.title(), app.row_count(*tab))))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let (header, rows, widths) = match app.tab {
        Tab::Jobs => jobs_table(app),
        Tab::Nodes => nodes_table(app),
        Tab::Queues => queues_table(app),
    };

    let selected = app.selected_index(app.tab);
    let rows: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            if idx == selected {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header.style(Style::default().add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.tab.title()),
        );

    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, chunks[1], &mut state);
}

type TableParts = (Row<'static>, Vec<Row<'static>>, Vec<Constraint>);

fn jobs_table(app: &App) -> TableParts {
    let header = Row::new(JOB_COLUMNS.iter().map(|(title, _)| Cell::from(*title)));
    let reference = app
        .snapshot
        .as_ref()
        .map(|s| s.timestamp)
        .unwrap_or_else(chrono::Utc::now);

    let rows = app
        .jobs()
        .into_iter()
        .map(|job| {
            let cells = job_row(job, reference)
                .into_iter()
                .zip(JOB_COLUMNS.iter())
                .map(|(value, (_, align))| match align {
                    Align::Left => Cell::from(value),
                    Align::Right => Cell::from(Line::from(value).alignment(Alignment::Right)),
                });
            let style = if job.is_running() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths = vec![
        Constraint::Length(14),
        Constraint::Min(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    (header, rows, widths)
}

fn nodes_table(app: &App) -> TableParts {
    let header = Row::new(["Node", "State", "CPUs", "Jobs", "Comment"]);
    let rows = app
        .nodes()
        .into_iter()
        .map(|node| {
            let state_color = match node.primary_state() {
                "free" => Color::Green,
                "job-exclusive" | "job-busy" | "busy" => Color::Yellow,
                "offline" | "down" | "unknown" => Color::Red,
                _ => Color::Gray,
            };
            Row::new(vec![
                Cell::from(node.name.clone()),
                Cell::from(node.state.clone()).style(Style::default().fg(state_color)),
                Cell::from(format_optional(node.ncpus)),
                Cell::from(node.jobs.len().to_string()),
                Cell::from(or_placeholder(node.comment.as_deref()).to_string()),
            ])
        })
        .collect();

    let widths = vec![
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(10),
    ];
    (header, rows, widths)
}

fn queues_table(app: &App) -> TableParts {
    let header = Row::new(["Queue", "Enabled", "Started", "Queued", "Running", "Held"]);
    let rows = app
        .queues()
        .into_iter()
        .map(|queue| {
            Row::new(vec![
                queue.name.clone(),
                format_bool(queue.enabled).to_string(),
                format_bool(queue.started).to_string(),
                queue.queued().to_string(),
                queue.running().to_string(),
                queue.held().to_string(),
            ])
        })
        .collect();

    let widths = vec![
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(5),
    ];
    (header, rows, widths)
}

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    let (title, rows, color): (String, Option<DetailRows>, Color) = match app.tab {
        Tab::Jobs => {
            let reference = app
                .snapshot
                .as_ref()
                .map(|s| s.timestamp)
                .unwrap_or_else(chrono::Utc::now);
            let job = app.selected_job();
            (
                job.map(|j| format!("Job {}", j.id)).unwrap_or_default(),
                job.map(|j| job_details(j, reference)),
                Color::Cyan,
            )
        }
        Tab::Nodes => {
            let node = app.selected_node();
            (
                node.map(|n| format!("Node {}", n.name)).unwrap_or_default(),
                node.map(node_details),
                Color::Green,
            )
        }
        Tab::Queues => {
            let queue = app.selected_queue();
            (
                queue.map(|q| format!("Queue {}", q.name)).unwrap_or_default(),
                queue.map(queue_details),
                Color::Magenta,
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let Some(rows) = rows else {
        let empty = Paragraph::new("No scheduler data available").block(block.title("Details"));
        f.render_widget(empty, area);
        return;
    };

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", label, width = label_width),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        })
        .collect();

    let detail = Paragraph::new(lines)
        .block(block.title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(detail, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let color = match app.status.severity {
        Severity::Info => Color::White,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };

    let status = Paragraph::new(app.status.message.as_str())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let help_text = "q: Quit │ r: Refresh │ j/n/u: Jobs/Nodes/Queues │ Tab: Next │ ↑↓: Select";

    let footer = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_snapshot;
    use crate::source::SnapshotSource;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn rendered_text(app: &App) -> String {
        let backend = TestBackend::new(140, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_dashboard(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_jobs_tab() {
        let mut app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        app.apply_snapshot(sample_snapshot(chrono::Utc::now()));
        let text = rendered_text(&app);
        assert!(text.contains("104829.aqua"));
        assert!(text.contains("nid000001"));
        assert!(text.contains("Job 104829.aqua"));
    }

    #[test]
    fn test_render_queues_tab() {
        let mut app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        app.apply_snapshot(sample_snapshot(chrono::Utc::now()));
        app.tab = Tab::Queues;
        let text = rendered_text(&app);
        assert!(text.contains("Queue analysis"));
    }

    #[test]
    fn test_render_without_snapshot() {
        let app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        let text = rendered_text(&app);
        assert!(text.contains("No scheduler data available"));
        assert!(text.contains("Loading scheduler data"));
    }
}
