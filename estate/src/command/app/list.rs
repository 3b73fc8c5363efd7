use super::resources::{Action, Screen};
use super::Event;
use crate::command::rows::Row;
use crossterm::event::KeyCode;
use estate_client::api_client::ApiClient;
use estate_client::controller::{FetchTicket, ListController, Phase};
use estate_client::error::ClientResult;
use estate_client::events::Notifier;
use estate_client::gateway::{ListSource, Page};
use estate_client::session::Session;
use estate_client::shell::Resource;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::palette::tailwind::GRAY;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Row as TableRow, Table, TableState};
use ratatui::Frame;
use tokio::sync::mpsc;

const MAX_COLUMN: usize = 32;

type Fetched<R> = (FetchTicket, ClientResult<Page<R>>);

/// A resource list as the interactive app sees it, whatever the record type.
pub(super) trait ResourceView {
    fn resource(&self) -> Resource;

    fn title(&self) -> String;

    fn keyword(&self) -> Option<&str>;

    fn refresh(&mut self, session: &Session);

    fn search(&mut self, session: &Session, text: &str);

    fn move_up(&mut self);

    /// Moves down and asks for the next page once the end is reached.
    fn move_down(&mut self, session: &Session);

    /// Applies finished fetches. Returns whether anything changed.
    fn poll(&mut self) -> bool;

    fn mutated(&mut self, session: &Session, success: &str, result: ClientResult<()>);

    fn action(&self, key: KeyCode, api: &ApiClient, session: &Session) -> Option<Action>;

    fn render(&mut self, frame: &mut Frame, area: Rect);
}

pub(super) struct ListView<S: ListSource> {
    resource: Resource,
    title: String,
    parent: Option<u64>,
    controller: ListController<S>,
    table: TableState,
    results: mpsc::UnboundedSender<Fetched<S::Record>>,
    fetched: mpsc::UnboundedReceiver<Fetched<S::Record>>,
    wake: mpsc::UnboundedSender<Event>,
}

impl<S: ListSource + 'static> ListView<S> {
    pub(super) fn new(
        resource: Resource,
        source: S,
        page_size: u64,
        notifier: Notifier,
        wake: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let (results, fetched) = mpsc::unbounded_channel();
        Self {
            resource,
            title: resource.title().to_string(),
            parent: None,
            controller: ListController::new(source, page_size, notifier),
            table: TableState::default(),
            results,
            fetched,
            wake,
        }
    }

    /// Scopes create dialogs to a parent record, like houses to their building.
    pub(super) fn parent(mut self, parent: u64, title: String) -> Self {
        self.parent = Some(parent);
        self.title = title;
        self
    }

    fn spawn(&self, ticket: FetchTicket, session: &Session) {
        let source = self.controller.source();
        let session = session.clone();
        let results = self.results.clone();
        let wake = self.wake.clone();
        tokio::spawn(async move {
            let result = ticket.run(source.as_ref(), &session).await;
            // The screen may be gone by now.
            if results.send((ticket, result)).is_ok() {
                let _ = wake.send(Event::Fetched);
            }
        });
    }

    fn issue(&mut self, ticket: ClientResult<Option<FetchTicket>>, session: &Session) {
        match ticket {
            Ok(Some(ticket)) => self.spawn(ticket, session),
            Ok(None) => self.clamp(),
            Err(err) => tracing::debug!("{} fetch not issued: {err}", self.resource),
        }
    }

    fn clamp(&mut self) {
        let len = self.controller.records().len();
        let selected = match (len, self.table.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.table.select(selected);
    }

    fn selected(&self) -> Option<&S::Record> {
        self.table
            .selected()
            .and_then(|i| self.controller.records().get(i))
    }

    fn status(&self) -> String {
        let count = self.controller.records().len();
        let status = match self.controller.phase() {
            Phase::Idle => String::new(),
            Phase::Loading => "Loading...".into(),
            Phase::LoadingMore => format!("{count} loaded, loading more..."),
            Phase::Loaded => format!("{count} loaded, page {}", self.controller.current_page()),
            Phase::Exhausted => format!("All {count} loaded"),
        };
        match self.controller.keyword() {
            Some(keyword) => format!("{status}  search: {keyword}"),
            None => status,
        }
    }
}

impl<S> ResourceView for ListView<S>
where
    S: ListSource + 'static,
    S::Record: Screen,
{
    fn resource(&self) -> Resource {
        self.resource
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn keyword(&self) -> Option<&str> {
        self.controller.keyword()
    }

    fn refresh(&mut self, session: &Session) {
        self.table.select(None);
        let ticket = self.controller.refresh(session).map(Some);
        self.issue(ticket, session);
    }

    fn search(&mut self, session: &Session, text: &str) {
        let ticket = self.controller.set_search(session, text);
        self.issue(ticket, session);
    }

    fn move_up(&mut self) {
        self.table.select_previous();
    }

    fn move_down(&mut self, session: &Session) {
        let len = self.controller.records().len();
        let next = self.table.selected().map_or(0, |i| (i + 1).min(len.saturating_sub(1)));
        self.table.select((len > 0).then_some(next));

        if let Some(ticket) = self.controller.load_more(next) {
            self.spawn(ticket, session);
        }
    }

    fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((ticket, result)) = self.fetched.try_recv() {
            changed |= self.controller.apply(&ticket, result);
        }
        if changed {
            self.clamp();
        }
        changed
    }

    fn mutated(&mut self, session: &Session, success: &str, result: ClientResult<()>) {
        let ticket = self.controller.after_mutation(session, success, result);
        if ticket.is_ok() {
            self.table.select(None);
        }
        self.issue(ticket.map(Some), session);
    }

    fn action(&self, key: KeyCode, api: &ApiClient, session: &Session) -> Option<Action> {
        match key {
            KeyCode::Char('a') => <S::Record as Screen>::create(session, self.parent),
            KeyCode::Char('e') => self.selected()?.edit(session),
            KeyCode::Enter => self.selected()?.primary(api, session),
            KeyCode::Char('x') => self.selected()?.secondary(api, session),
            KeyCode::Char('d') => self.selected()?.delete(api, session),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [table_l, status_l] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let headers = <S::Record as Row>::HEADERS;
        let rows = self
            .controller
            .records()
            .iter()
            .map(Row::cells)
            .collect::<Vec<_>>();

        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let widest = rows
                    .iter()
                    .filter_map(|cells| cells.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.len())
                    .min(MAX_COLUMN);
                Constraint::Length(widest as u16)
            })
            .collect::<Vec<_>>();

        if rows.is_empty() && !self.controller.is_loading() {
            let empty = match self.controller.keyword() {
                Some(_) => "No matches",
                None => "Nothing here yet",
            };
            frame.render_widget(
                Paragraph::new(Line::styled(empty, Style::new().fg(GRAY.c500))),
                table_l,
            );
        } else {
            let table = Table::new(rows.into_iter().map(TableRow::new), widths)
                .header(TableRow::new(headers.iter().copied()).style(Style::new().fg(GRAY.c400)))
                .column_spacing(2)
                .row_highlight_style(Style::new().bg(GRAY.c800));
            frame.render_stateful_widget(table, table_l, &mut self.table);
        }

        frame.render_widget(
            Paragraph::new(Line::styled(self.status(), Style::new().fg(GRAY.c500))),
            status_l,
        );
    }
}
