use estate_client::settings::Settings;
use estate_client::shell::{MenuItem, ProfileSummary, Resource, Route};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::palette::tailwind::{GRAY, RED, YELLOW};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::VERSION;

/// Home and profile screens: a few lines of context above a list of entries.
pub(super) struct Menu {
    items: Vec<MenuItem>,
    selected: usize,
    badge: Option<String>,
    profile: Option<ProfileSummary>,
    warning: bool,
}

impl Menu {
    pub(super) fn home(items: Vec<MenuItem>, warning: bool) -> Self {
        Self {
            items,
            selected: 0,
            badge: None,
            profile: None,
            warning,
        }
    }

    pub(super) fn profile(items: Vec<MenuItem>, profile: ProfileSummary) -> Self {
        Self {
            items,
            selected: 0,
            badge: None,
            warning: profile.expiry_warning,
            profile: Some(profile),
        }
    }

    pub(super) fn set_badge(&mut self, badge: Option<String>) {
        self.badge = badge;
    }

    pub(super) fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    pub(super) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(super) fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(self.items.len().saturating_sub(1));
    }

    fn header(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        if let Some(p) = &self.profile {
            let field = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{label:<12}"), Style::new().fg(GRAY.c500)),
                    Span::raw(value),
                ])
            };
            lines.push(field("Username", p.username.clone()));
            lines.push(field("Name", p.display_name.clone()));
            lines.push(field("Role", p.role.to_string()));
            lines.push(field("House", p.house_number.clone()));
            lines.push(field("Logged in", p.login_time.clone()));
            lines.push(field("Expires", p.expires_at.clone()));
            lines.push(Line::raw(""));
        }
        if self.warning {
            lines.push(Line::styled(
                "Your session expires within a day, log in again to renew it",
                Style::new().fg(YELLOW.c500),
            ));
            lines.push(Line::raw(""));
        }
        lines
    }

    pub(super) fn render(&self, frame: &mut Frame, area: Rect) {
        let header = self.header();
        let [header_l, items_l] =
            Layout::vertical([Constraint::Length(header.len() as u16), Constraint::Min(1)])
                .areas(area);
        frame.render_widget(Paragraph::new(header), header_l);

        let lines = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut spans = vec![
                    Span::raw(format!(" {}  ", item.icon)),
                    Span::raw(format!("{:<18}", item.title)),
                    Span::styled(item.description, Style::new().fg(GRAY.c500)),
                ];
                if let (Some(badge), Route::Resource(Resource::Users)) = (&self.badge, item.target)
                {
                    spans.push(Span::styled(format!("  {badge} "), Style::new().bg(RED.c700)));
                }
                let style = if i == self.selected {
                    Style::new().bg(GRAY.c800)
                } else {
                    Style::new()
                };
                Line::from(spans).style(style)
            })
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines), items_l);
    }
}

pub(super) fn render_settings(frame: &mut Frame, area: Rect, settings: &Settings) {
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), Style::new().fg(GRAY.c500)),
            Span::raw(value),
        ])
    };
    let lines = vec![
        row("Config file", Settings::config_path().display().to_string()),
        row("Server", settings.server_address.clone()),
        row("Page size", settings.page_size.to_string()),
        row("Timeout", format!("{}s", settings.timeout_secs)),
        row("Session file", settings.session_path.clone()),
        row("Log file", settings.log_path.clone()),
        Line::raw(""),
        Line::styled(
            "Edit the config file or set ESTATE_* variables, then restart.",
            Style::new().fg(GRAY.c500),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

pub(super) fn render_about(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(format!("estate {VERSION}")),
        Line::raw(""),
        Line::styled(
            "Property management for residents and administrators.",
            Style::new().fg(GRAY.c500),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_client::shell::function_items;
    use estate_common::domain::Role;

    #[test]
    fn selection_stays_in_bounds() {
        let mut menu = Menu::home(function_items(Role::Resident), false);
        menu.move_up();
        assert_eq!(menu.selected().map(|i| i.title), Some("Buildings"));

        for _ in 0..20 {
            menu.move_down();
        }
        assert_eq!(menu.selected().map(|i| i.title), Some("Complaints"));
    }
}
