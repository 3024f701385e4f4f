//! Application state and main event loop

use crate::data::{Job, Node, Queue, SchedulerSnapshot};
use crate::format::sort_jobs_for_display;
use crate::source::SnapshotSource;
use crate::ui::{render_dashboard, TUI};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Jobs,
    Nodes,
    Queues,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Jobs, Tab::Nodes, Tab::Queues];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Jobs => "Jobs",
            Tab::Nodes => "Nodes",
            Tab::Queues => "Queues",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Jobs => 0,
            Tab::Nodes => 1,
            Tab::Queues => 2,
        }
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub severity: Severity,
}

/// Application state
pub struct App {
    pub source: SnapshotSource,
    pub snapshot: Option<SchedulerSnapshot>,
    pub tab: Tab,
    pub refresh_interval: Duration,
    pub last_refresh: Option<Instant>,
    pub status: StatusLine,
    pub should_quit: bool,
    pub refresh_requested: bool,
    /// Selected row per tab
    selected: [usize; 3],
}

impl App {
    pub fn new(source: SnapshotSource, refresh_interval: Duration) -> Self {
        Self {
            source,
            snapshot: None,
            tab: Tab::Jobs,
            refresh_interval,
            last_refresh: None,
            status: StatusLine {
                message: "Loading scheduler data...".to_string(),
                severity: Severity::Info,
            },
            should_quit: false,
            refresh_requested: false,
            selected: [0; 3],
        }
    }

    /// Fetch a new snapshot; failures keep the previous one on screen
    pub async fn refresh(&mut self) {
        self.refresh_requested = false;
        self.last_refresh = Some(Instant::now());

        match self.source.fetch().await {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(e) => {
                log::warn!("Failed to refresh scheduler data: {}", e);
                self.status = StatusLine {
                    message: format!("Failed to refresh scheduler data: {}", e),
                    severity: Severity::Error,
                };
            }
        }
    }

    /// Install a snapshot and update the status line
    pub fn apply_snapshot(&mut self, snapshot: SchedulerSnapshot) {
        let mut parts = vec![
            format!(
                "Last updated {}",
                snapshot
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S %Z")
            ),
            format!("Source: {}", snapshot.source),
        ];
        let severity = if snapshot.errors.is_empty() {
            Severity::Info
        } else {
            parts.push(snapshot.errors.join("; "));
            Severity::Warning
        };
        self.status = StatusLine {
            message: parts.join(" | "),
            severity,
        };

        log::debug!(
            "Snapshot applied: {} jobs, {} nodes, {} queues",
            snapshot.jobs.len(),
            snapshot.nodes.len(),
            snapshot.queues.len()
        );
        self.snapshot = Some(snapshot);

        for tab in Tab::ALL {
            let count = self.row_count(tab);
            let selected = &mut self.selected[tab.index()];
            *selected = (*selected).min(count.saturating_sub(1));
        }
    }

    /// Whether the refresh interval has elapsed or a refresh was requested
    pub fn refresh_due(&self, now: Instant) -> bool {
        self.refresh_requested
            || self
                .last_refresh
                .map(|last| now.duration_since(last) >= self.refresh_interval)
                .unwrap_or(true)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                log::info!("Manual refresh requested");
                self.refresh_requested = true;
            }
            KeyCode::Char('j') => self.tab = Tab::Jobs,
            KeyCode::Char('n') => self.tab = Tab::Nodes,
            KeyCode::Char('u') => self.tab = Tab::Queues,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Up => {
                let selected = &mut self.selected[self.tab.index()];
                *selected = selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let count = self.row_count(self.tab);
                let selected = &mut self.selected[self.tab.index()];
                if *selected + 1 < count {
                    *selected += 1;
                }
            }
            _ => {}
        }
    }

    /// Check if we should poll for input
    pub fn should_poll_input() -> Result<bool> {
        Ok(event::poll(Duration::from_millis(100))?)
    }

    /// Get keyboard event
    pub fn read_event() -> Result<Event> {
        Ok(event::read()?)
    }

    /// Draw, handle input and refresh until the user quits
    pub async fn run(&mut self, tui: &mut TUI) -> Result<()> {
        while !self.should_quit {
            if self.refresh_due(Instant::now()) {
                self.refresh().await;
            }

            let app: &App = self;
            tui.terminal().draw(|f| render_dashboard(f, app))?;

            if Self::should_poll_input()? {
                if let Event::Key(key) = Self::read_event()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn selected_index(&self, tab: Tab) -> usize {
        self.selected[tab.index()]
    }

    pub fn row_count(&self, tab: Tab) -> usize {
        self.snapshot
            .as_ref()
            .map(|s| match tab {
                Tab::Jobs => s.jobs.len(),
                Tab::Nodes => s.nodes.len(),
                Tab::Queues => s.queues.len(),
            })
            .unwrap_or(0)
    }

    /// Jobs in display order
    pub fn jobs(&self) -> Vec<&Job> {
        self.snapshot
            .as_ref()
            .map(|s| sort_jobs_for_display(&s.jobs))
            .unwrap_or_default()
    }

    /// Nodes sorted by name
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self
            .snapshot
            .as_ref()
            .map(|s| s.nodes.iter().collect())
            .unwrap_or_default();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    /// Queues sorted by name
    pub fn queues(&self) -> Vec<&Queue> {
        let mut queues: Vec<&Queue> = self
            .snapshot
            .as_ref()
            .map(|s| s.queues.iter().collect())
            .unwrap_or_default();
        queues.sort_by(|a, b| a.name.cmp(&b.name));
        queues
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs().get(self.selected_index(Tab::Jobs)).copied()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.nodes().get(self.selected_index(Tab::Nodes)).copied()
    }

    pub fn selected_queue(&self) -> Option<&Queue> {
        self.queues().get(self.selected_index(Tab::Queues)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_snapshot;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_sample() -> App {
        let mut app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        app.apply_snapshot(sample_snapshot(Utc::now()));
        app
    }

    #[test]
    fn test_tab_switching() {
        let mut app = app_with_sample();
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.tab, Tab::Nodes);
        app.handle_key(key(KeyCode::Char('u')));
        assert_eq!(app.tab, Tab::Queues);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Jobs);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app_with_sample();
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.selected_index(Tab::Jobs), 2);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_index(Tab::Jobs), 1);

        app.apply_snapshot(SchedulerSnapshot::empty("none"));
        assert_eq!(app.selected_index(Tab::Jobs), 0);
        assert!(app.selected_job().is_none());
    }

    #[test]
    fn test_selected_rows_follow_display_order() {
        let app = app_with_sample();
        assert_eq!(app.selected_job().map(|j| j.id.as_str()), Some("104829.aqua"));
        assert_eq!(app.selected_node().map(|n| n.name.as_str()), Some("nid000001"));
        assert_eq!(app.selected_queue().map(|q| q.name.as_str()), Some("analysis"));
    }

    #[test]
    fn test_status_reports_snapshot_errors() {
        let app = app_with_sample();
        assert_eq!(app.status.severity, Severity::Warning);
        assert!(app.status.message.contains("Source: sample"));

        let mut app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        app.apply_snapshot(SchedulerSnapshot::empty("file"));
        assert_eq!(app.status.severity, Severity::Info);
    }

    #[test]
    fn test_refresh_due() {
        let mut app = App::new(SnapshotSource::Sample, Duration::from_secs(30));
        let now = Instant::now();
        assert!(app.refresh_due(now));

        app.last_refresh = Some(now);
        assert!(!app.refresh_due(now));
        assert!(app.refresh_due(now + Duration::from_secs(31)));

        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.refresh_due(now));
    }

    #[test]
    fn test_failed_refresh_keeps_snapshot() {
        let mut app = app_with_sample();
        app.source = SnapshotSource::File("/nonexistent/snapshot.json".into());
        tokio_test::block_on(app.refresh());
        assert_eq!(app.status.severity, Severity::Error);
        assert!(app.snapshot.is_some());
        assert!(!app.refresh_requested);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_sample();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
