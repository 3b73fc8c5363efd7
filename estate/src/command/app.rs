use crate::tui;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use estate_client::api_client::ApiClient;
use estate_client::auth;
use estate_client::error::ClientResult;
use estate_client::events::{self, AppEvent, NoticeLevel};
use estate_client::forms::{LoginForm, RegisterForm};
use estate_client::session::Session;
use estate_client::settings::Settings;
use estate_client::shell::{self, Resource, Route, Shell};
use eyre::{Context, Result};
use form::{DynDialog, FormView, Outcome};
use futures_util::stream::StreamExt;
use list::{ListView, ResourceView};
use menu::Menu;
use prompt::{PromptSearchStep, PromptState};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::palette::tailwind::{GRAY, RED, SLATE};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use resources::{Action, Mutation};
use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

mod form;
mod list;
mod menu;
mod prompt;
mod resources;

pub(super) enum Event {
    KeyInput(KeyEvent),
    App(AppEvent),
    Fetched,
    Done(Completion),
    TerminalTick,
}

/// Result of a network query that ran off the event loop.
pub(super) enum Completion {
    Login(ClientResult<Session>),
    Register(ClientResult<()>),
    Badge(ClientResult<Option<u64>>),
    Mutation {
        /// Screen the mutation was started from.
        route: Option<Route>,
        success: &'static str,
        result: ClientResult<()>,
    },
}

enum Query {
    Login,
    Register,
    Logout,
    Badge,
    Mutation(Mutation),
}

enum View {
    Login(FormView<LoginForm>),
    Register(FormView<RegisterForm>),
    Menu(Menu),
    Settings,
    About,
    Resource(Box<dyn ResourceView>),
}

#[derive(Debug)]
enum RunningState {
    Active,
    Quit,
}

struct AppState<'a> {
    api: ApiClient,
    settings: &'a Settings,
    shell: Shell,
    view: View,
    /// Route `view` was built for.
    shown: Option<Route>,
    prompt: PromptState,
    dialog: Option<Box<dyn DynDialog>>,
    confirm: Option<Mutation>,
    query_queue: Vec<Query>,
    /// Spawned queries not yet completed.
    in_flight: usize,
    authenticating: bool,
    wake: mpsc::UnboundedSender<Event>,
    status: RunningState,
}

impl AppState<'_> {
    fn quit(&mut self) {
        self.status = RunningState::Quit;
    }

    fn running(&self) -> bool {
        match self.status {
            RunningState::Active => true,
            RunningState::Quit => false,
        }
    }

    fn page_size(&self) -> u64 {
        u64::from(self.settings.page_size)
    }

    fn navigate(&mut self, route: Route) {
        self.shell.navigate(route, self.api.notifier());
    }

    fn resource_view(&self, resource: Resource) -> Box<dyn ResourceView> {
        let api = &self.api;
        let size = self.page_size();
        let notifier = api.notifier().clone();
        let wake = self.wake.clone();
        match resource {
            Resource::Fees => Box::new(ListView::new(resource, api.fees(), size, notifier, wake)),
            Resource::Repairs => {
                Box::new(ListView::new(resource, api.repairs(), size, notifier, wake))
            }
            Resource::Complaints => {
                Box::new(ListView::new(resource, api.complaints(), size, notifier, wake))
            }
            Resource::Parking => {
                Box::new(ListView::new(resource, api.parking(), size, notifier, wake))
            }
            Resource::Buildings => {
                Box::new(ListView::new(resource, api.buildings(), size, notifier, wake))
            }
            Resource::Houses => Box::new(ListView::new(resource, api.houses(), size, notifier, wake)),
            Resource::Users => Box::new(ListView::new(resource, api.users(), size, notifier, wake)),
            Resource::Registrations => Box::new(ListView::new(
                resource,
                api.registrations(),
                size,
                notifier,
                wake,
            )),
        }
    }

    fn show(&mut self, route: Route, view: View) {
        self.view = view;
        self.shown = Some(route);
        self.prompt.set(PromptState::Default);
        self.dialog = None;
        self.confirm = None;
    }

    fn show_list(&mut self, route: Route, mut view: Box<dyn ResourceView>) {
        view.refresh(&self.api.session());
        self.show(route, View::Resource(view));
    }

    /// Rebuilds the screen whenever the shell moved somewhere else.
    fn sync_view(&mut self) {
        let route = self.shell.route();
        if self.shown == Some(route) {
            return;
        }
        tracing::debug!("Showing {route:?}");

        match route {
            Route::Login => {
                let form = LoginForm::new().with_username(self.api.store().current_username());
                self.show(route, View::Login(FormView::new(form)));
            }
            Route::Register => self.show(route, View::Register(FormView::new(RegisterForm::new()))),
            Route::Home => {
                let warning = self.api.store().expiry_warning();
                let menu = Menu::home(self.shell.function_items(), warning);
                self.show(route, View::Menu(menu));
                self.query_queue.push(Query::Badge);
            }
            Route::Profile => {
                let menu = Menu::profile(self.shell.profile_items(), self.shell.profile());
                self.show(route, View::Menu(menu));
                self.query_queue.push(Query::Badge);
            }
            Route::Settings => self.show(route, View::Settings),
            Route::About => self.show(route, View::About),
            Route::Resource(resource) => {
                let view = self.resource_view(resource);
                self.show_list(route, view);
            }
        }
    }

    fn open_houses(&mut self, building_id: u64) {
        let route = Route::Resource(Resource::Houses);
        if !self.shell.navigate(route, self.api.notifier()) {
            return;
        }
        let source = self.api.houses().in_building(building_id);
        let view = ListView::new(
            Resource::Houses,
            source,
            self.page_size(),
            self.api.notifier().clone(),
            self.wake.clone(),
        )
        .parent(building_id, format!("Houses of building {building_id}"));
        self.show_list(route, Box::new(view));
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Dialog(dialog) => self.dialog = Some(dialog),
            Action::Confirm { message, mutation } => {
                self.confirm = Some(mutation);
                self.prompt.set(PromptState::Confirm(message));
            }
            Action::Run(mutation) => self.query_queue.push(Query::Mutation(mutation)),
            Action::Refuse(err) => self.api.notifier().report(&err),
            Action::OpenHouses(building_id) => self.open_houses(building_id),
        }
    }

    fn handle_global_exit(&mut self, event: &KeyEvent) -> bool {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Char('c') if ctrl => {
                self.quit();
                true
            }
            _ => false,
        }
    }

    fn handle_dialog_key(&mut self, key: &KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        match dialog.key(key) {
            Outcome::Editing => {}
            Outcome::Cancel => self.dialog = None,
            Outcome::Submit => {
                let session = self.api.session();
                // Invalid input keeps the dialog open.
                if let Some(mutation) = dialog.submit(&self.api, &session) {
                    self.dialog = None;
                    self.query_queue.push(Query::Mutation(mutation));
                }
            }
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) {
        let session = self.api.session();
        match &mut self.prompt {
            PromptState::Search(search) => {
                let text = match key.code {
                    KeyCode::Char(c) => {
                        search.input.insert(c);
                        search.input.as_str().to_string()
                    }
                    KeyCode::Backspace => {
                        search.input.remove();
                        search.input.as_str().to_string()
                    }
                    KeyCode::Enter => {
                        search.step = PromptSearchStep::Submit;
                        return;
                    }
                    KeyCode::Esc => {
                        self.prompt.set(PromptState::Default);
                        String::new()
                    }
                    _ => return,
                };
                if let View::Resource(view) = &mut self.view {
                    view.search(&session, &text);
                }
            }
            PromptState::Confirm(_) => match key.code {
                KeyCode::Char('y') => {
                    if let Some(mutation) = self.confirm.take() {
                        self.query_queue.push(Query::Mutation(mutation));
                    }
                    self.prompt.set(PromptState::Default);
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm = None;
                    self.prompt.set(PromptState::Default);
                }
                _ => {}
            },
            PromptState::Default => {}
        }
    }

    fn handle_list_key(&mut self, key: &KeyEvent) {
        let session = self.api.session();
        let View::Resource(view) = &mut self.view else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => view.move_down(&session),
            KeyCode::Char('k') | KeyCode::Up => view.move_up(),
            KeyCode::Char('r') => {
                self.prompt.set(PromptState::Default);
                view.refresh(&session);
            }
            KeyCode::Char('/') => self.prompt.set(PromptState::search()),
            KeyCode::Esc if view.keyword().is_some() => {
                self.prompt.set(PromptState::Default);
                view.search(&session, "");
            }
            KeyCode::Esc => {
                self.shell.back();
            }
            KeyCode::Tab => match view.resource() {
                Resource::Users => self.navigate(Route::Resource(Resource::Registrations)),
                Resource::Registrations => self.navigate(Route::Resource(Resource::Users)),
                _ => {}
            },
            code => {
                if let Some(action) = view.action(code, &self.api, &session) {
                    self.handle_action(action);
                }
            }
        }
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        if self.handle_global_exit(&key) {
            return;
        }
        self.shell.dismiss_notice();

        if self.dialog.is_some() {
            return self.handle_dialog_key(&key);
        }
        if self.prompt.captures_keys() {
            return self.handle_prompt_key(&key);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match &mut self.view {
            View::Login(form) => match key.code {
                KeyCode::Char('r') if ctrl => self.navigate(Route::Register),
                _ => match form.key(&key) {
                    Outcome::Submit => self.query_queue.push(Query::Login),
                    Outcome::Cancel => self.quit(),
                    Outcome::Editing => {}
                },
            },
            View::Register(form) => match form.key(&key) {
                Outcome::Submit => self.query_queue.push(Query::Register),
                Outcome::Cancel => {
                    self.shell.back();
                }
                Outcome::Editing => {}
            },
            View::Menu(menu) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => menu.move_down(),
                KeyCode::Char('k') | KeyCode::Up => menu.move_up(),
                KeyCode::Enter => {
                    if let Some(target) = menu.selected().map(|item| item.target) {
                        self.navigate(target);
                    }
                }
                KeyCode::Tab => match self.shell.route() {
                    Route::Home => self.navigate(Route::Profile),
                    _ => self.navigate(Route::Home),
                },
                KeyCode::Char('o') if self.shell.route() == Route::Profile => {
                    self.query_queue.push(Query::Logout)
                }
                KeyCode::Esc => {
                    self.shell.back();
                }
                _ => {}
            },
            View::Settings | View::About => {
                if key.code == KeyCode::Esc {
                    self.shell.back();
                }
            }
            View::Resource(_) => self.handle_list_key(&key),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::KeyInput(key) => self.handle_key_input(key),
            Event::App(event) => self.shell.handle(event),
            Event::Done(done) => self.finish(done),
            Event::Fetched | Event::TerminalTick => {}
        }
        if let View::Resource(view) = &mut self.view {
            view.poll();
        }
    }

    /// Runs `fut` on the runtime and hands its result back as [`Event::Done`].
    fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let wake = self.wake.clone();
        tokio::spawn(async move {
            let _ = wake.send(Event::Done(fut.await));
        });
    }

    fn run_queries(&mut self) {
        let queries = std::mem::take(&mut self.query_queue);
        for query in queries {
            match query {
                Query::Login | Query::Register if self.authenticating => {
                    tracing::debug!("Ignoring submit while a login is in flight");
                }
                Query::Login => {
                    let View::Login(form) = &self.view else {
                        continue;
                    };
                    let form = form.form().clone();
                    let api = self.api.clone();
                    self.authenticating = true;
                    self.spawn(async move { Completion::Login(auth::login(&api, &form).await) });
                }
                Query::Register => {
                    let View::Register(form) = &self.view else {
                        continue;
                    };
                    let form = form.form().clone();
                    let api = self.api.clone();
                    self.authenticating = true;
                    self.spawn(async move {
                        Completion::Register(auth::register(&api, &form).await)
                    });
                }
                Query::Logout => {
                    if let Err(err) = auth::logout(&self.api) {
                        tracing::error!("Logout failed: {err}");
                        self.api.notifier().report(&err);
                    }
                }
                Query::Badge => {
                    let api = self.api.clone();
                    self.spawn(async move {
                        Completion::Badge(shell::pending_registrations(&api).await)
                    });
                }
                Query::Mutation(Mutation { success, fut }) => {
                    let route = self.shown;
                    self.spawn(async move {
                        Completion::Mutation {
                            route,
                            success,
                            result: fut.await,
                        }
                    });
                }
            }
        }
    }

    fn finish(&mut self, done: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match done {
            Completion::Login(result) => {
                self.authenticating = false;
                if result.is_ok() {
                    self.shell.handle(AppEvent::Navigate(Route::Home));
                }
            }
            Completion::Register(result) => {
                self.authenticating = false;
                if result.is_ok() {
                    self.shell.handle(AppEvent::Navigate(Route::Login));
                }
            }
            Completion::Badge(pending) => {
                self.shell.set_pending(pending);
                if let View::Menu(menu) = &mut self.view {
                    menu.set_badge(self.shell.badge());
                }
            }
            Completion::Mutation {
                route,
                success,
                result,
            } => match &mut self.view {
                View::Resource(view) if route == self.shown => {
                    view.mutated(&self.api.session(), success, result)
                }
                _ => match result {
                    Ok(()) => self.api.notifier().info(success),
                    Err(err) => self.api.notifier().report(&err),
                },
            },
        }
    }

    fn title(&self) -> String {
        match &self.view {
            View::Login(_) => "Log in".into(),
            View::Register(_) => "Register".into(),
            View::Menu(_) if self.shell.route() == Route::Profile => "Profile".into(),
            View::Menu(_) => "Home".into(),
            View::Settings => "Settings".into(),
            View::About => "About".into(),
            View::Resource(view) => view.title(),
        }
    }

    fn help(&self) -> &'static [(&'static str, &'static str)] {
        match &self.view {
            View::Login(_) => &[("Register", "C-r"), ("Exit", "C-c")],
            View::Register(_) => &[("Back", "Esc"), ("Exit", "C-c")],
            View::Menu(_) if self.shell.route() == Route::Profile => {
                &[("Home", "Tab"), ("Log out", "o"), ("Exit", "C-c")]
            }
            View::Menu(_) => &[("Profile", "Tab"), ("Open", "Enter"), ("Exit", "C-c")],
            View::Settings | View::About => &[("Back", "Esc"), ("Exit", "C-c")],
            View::Resource(_) => &[
                ("Add", "a"),
                ("Edit", "e"),
                ("Delete", "d"),
                ("Search", "/"),
                ("Refresh", "r"),
                ("Back", "Esc"),
            ],
        }
    }

    fn build_header(&self) -> Paragraph {
        let user = if self.api.store().is_logged_in() {
            let profile = self.shell.profile();
            format!("{} ({})", profile.username, profile.role)
        } else {
            "not logged in".into()
        };
        let working = if self.in_flight > 0 { "  working..." } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled("estate", Style::new().fg(GRAY.c500)),
            Span::raw("  "),
            Span::raw(self.title()),
            Span::styled(format!("  {user}"), Style::new().fg(GRAY.c500)),
            Span::styled(working, Style::new().fg(GRAY.c500)),
        ]))
    }

    fn render_footer(&self, frame: &mut Frame, rect: Rect) {
        let [left_l, right_l] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(rect);

        let left = match self.shell.notice() {
            Some(notice) => {
                let style = match notice.level {
                    NoticeLevel::Info => Style::default(),
                    NoticeLevel::Error => Style::new().fg(RED.c500),
                };
                Line::styled(notice.message.clone(), style)
            }
            None => Line::from(vec![
                Span::raw(self.prompt.prefix()),
                Span::raw(self.prompt.value()),
            ])
            .style(self.prompt.style()),
        };

        let mut spans = Vec::new();
        for (label, key) in self.help() {
            spans.push(Span::raw(format!("   {label} ")));
            spans.push(Span::styled(
                format!(" {key} "),
                Style::new().bg(SLATE.c800).fg(GRAY.c400),
            ));
        }
        let help = Line::from(spans)
            .style(Style::new().fg(GRAY.c200))
            .alignment(Alignment::Right);

        frame.render_widget(Paragraph::new(left), left_l);
        frame.render_widget(Paragraph::new(help), right_l);
    }

    fn render_page(&mut self, frame: &mut Frame) {
        let [header_l, spacer_l, main_l, footer_l] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(self.build_header(), header_l);
        frame.render_widget(
            Paragraph::new(Line::raw("-".repeat(spacer_l.width.into())))
                .style(Style::new().fg(GRAY.c500)),
            spacer_l,
        );

        match &mut self.view {
            View::Login(form) => form.render(frame, build_modal_block(main_l)),
            View::Register(form) => form.render(frame, build_modal_block(main_l)),
            View::Menu(menu) => menu.render(frame, main_l),
            View::Settings => menu::render_settings(frame, main_l, self.settings),
            View::About => menu::render_about(frame, main_l),
            View::Resource(view) => view.render(frame, main_l),
        }

        self.render_footer(frame, footer_l);

        if let Some(dialog) = &self.dialog {
            dialog.render(frame, build_modal_block(frame.area()));
        }
    }
}

fn build_modal_block(rect: Rect) -> Rect {
    let [_, main, _] = Layout::vertical([
        Constraint::Percentage(10),
        Constraint::Percentage(80),
        Constraint::Percentage(10),
    ])
    .areas(rect);
    let [_, block, _] = Layout::horizontal([
        Constraint::Percentage(10),
        Constraint::Percentage(80),
        Constraint::Percentage(10),
    ])
    .areas(main);
    block
}

fn ev_key_press(ev: &CrosstermEvent) -> Option<&KeyEvent> {
    match ev {
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => Some(key_event),
        _ => None,
    }
}

pub async fn run(settings: &Settings) -> Result<()> {
    let (notifier, mut notices) = events::channel();
    let api = ApiClient::from_settings(settings, notifier);
    let shell = Shell::mount(api.store().clone());

    tui::install_hooks()?;
    let mut terminal = tui::init()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut crossterm = EventStream::new();

    let mut app = AppState {
        api,
        settings,
        shell,
        view: View::About,
        shown: None,
        prompt: PromptState::Default,
        dialog: None,
        confirm: None,
        query_queue: Vec::new(),
        in_flight: 0,
        authenticating: false,
        wake: tx,
        status: RunningState::Active,
    };
    app.sync_view();

    while app.running() {
        terminal
            .draw(|frame| app.render_page(frame))
            .wrap_err("failed to render terminal")?;

        let event = loop {
            if let Some(ev) = tokio::select! {
                event = rx.recv() => event,
                event = notices.recv() => event.map(Event::App),
                event = crossterm.next() => match event {
                    Some(Ok(ev)) => ev_key_press(&ev).copied().map(Event::KeyInput),
                    _ => None,
                },
                _ = sleep(Duration::from_millis(200)) => Some(Event::TerminalTick),
            } {
                break ev;
            }
        };

        app.handle_event(event);
        app.run_queries();
        app.sync_view();
    }

    tui::restore()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_client::events::EventReceiver;
    use estate_client::forms::Form;
    use futures_util::FutureExt;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            // Nothing listens here, so any request fails fast.
            server_address: "http://127.0.0.1:1".into(),
            session_path: dir.path().join("session.json").to_string_lossy().into_owned(),
            log_path: dir.path().join("estate.log").to_string_lossy().into_owned(),
            page_size: 20,
            timeout_secs: 5,
        }
    }

    fn app(settings: &Settings) -> (AppState<'_>, mpsc::UnboundedReceiver<Event>, EventReceiver) {
        let (notifier, notices) = events::channel();
        let api = ApiClient::from_settings(settings, notifier);
        let shell = Shell::mount(api.store().clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let app = AppState {
            api,
            settings,
            shell,
            view: View::About,
            shown: None,
            prompt: PromptState::Default,
            dialog: None,
            confirm: None,
            query_queue: Vec::new(),
            in_flight: 0,
            authenticating: false,
            wake: tx,
            status: RunningState::Active,
        };
        (app, rx, notices)
    }

    #[tokio::test]
    async fn pending_mutation_leaves_the_loop_free() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        let (mut app, mut rx, mut notices) = app(&settings);
        let (release, gate) = oneshot::channel::<()>();

        app.query_queue.push(Query::Mutation(Mutation {
            success: "Saved",
            fut: async move {
                let _ = gate.await;
                Ok(())
            }
            .boxed(),
        }));
        app.run_queries();

        assert_eq!(app.in_flight, 1);
        assert!(app.query_queue.is_empty());
        assert!(rx.try_recv().is_err());
        app.handle_event(Event::TerminalTick);
        assert!(app.running());

        release.send(()).unwrap();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::Done(Completion::Mutation { .. })));
        app.handle_event(event);

        assert_eq!(app.in_flight, 0);
        match notices.try_recv().unwrap() {
            AppEvent::Notice(notice) => assert_eq!(notice.message, "Saved"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_login_submit_sends_one_request() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        let (mut app, mut rx, mut notices) = app(&settings);
        let mut form = LoginForm::new();
        form.state_mut().set("username", "li");
        form.state_mut().set("password", "secret1");
        app.view = View::Login(FormView::new(form));
        app.shown = Some(Route::Login);

        app.query_queue.push(Query::Login);
        app.query_queue.push(Query::Login);
        app.run_queries();
        assert_eq!(app.in_flight, 1);
        assert!(app.authenticating);

        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert_eq!(app.in_flight, 0);
        assert!(!app.authenticating);
        assert_eq!(app.shell.route(), Route::Login);
        assert!(!app.api.store().is_logged_in());
        match notices.try_recv().unwrap() {
            AppEvent::Notice(notice) => assert_eq!(notice.level, NoticeLevel::Error),
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}
