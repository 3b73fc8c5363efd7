use super::resources::Mutation;
use crossterm::event::{KeyCode, KeyEvent};
use estate_client::api_client::ApiClient;
use estate_client::error::ClientResult;
use estate_client::forms::Form;
use estate_client::session::Session;
use futures_util::future::BoxFuture;
use ratatui::layout::{Position, Rect};
use ratatui::style::palette::tailwind::GRAY;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Outcome {
    Editing,
    Submit,
    Cancel,
}

/// Keyboard editing of any [`Form`].
pub(super) struct FormView<F: Form> {
    form: F,
    focus: usize,
}

impl<F: Form> FormView<F> {
    pub(super) fn new(form: F) -> Self {
        let mut view = Self { form, focus: 0 };
        if view.is_locked(0) {
            view.focus_next();
        }
        view
    }

    pub(super) fn form(&self) -> &F {
        &self.form
    }

    fn len(&self) -> usize {
        self.form.state().fields().len()
    }

    fn label_width(&self) -> usize {
        let fields = self.form.state().fields();
        fields.iter().map(|f| f.label.chars().count()).max().unwrap_or(0) + 2
    }

    fn is_locked(&self, index: usize) -> bool {
        self.form
            .state()
            .fields()
            .get(index)
            .is_some_and(|f| f.locked)
    }

    fn step(&mut self, forward: bool) {
        let len = self.len();
        if len == 0 {
            return;
        }
        for _ in 0..len {
            self.focus = if forward {
                (self.focus + 1) % len
            } else {
                (self.focus + len - 1) % len
            };
            if !self.is_locked(self.focus) {
                return;
            }
        }
    }

    fn focus_next(&mut self) {
        self.step(true);
    }

    fn focus_prev(&mut self) {
        self.step(false);
    }

    pub(super) fn key(&mut self, key: &KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => return Outcome::Cancel,
            KeyCode::Enter => return Outcome::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Char(c) => {
                if let Some(field) = self.form.state_mut().field_mut(self.focus) {
                    field.value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.form.state_mut().field_mut(self.focus) {
                    field.value.pop();
                }
            }
            _ => {}
        }
        Outcome::Editing
    }

    pub(super) fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(format!(" {} ", self.form.title()))
            .border_style(GRAY.c500);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let width = self.label_width();

        let lines = self
            .form
            .state()
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = if field.secret {
                    "*".repeat(field.value.chars().count())
                } else {
                    field.value.clone()
                };
                let style = match (i == self.focus, field.locked) {
                    (_, true) => Style::new().fg(GRAY.c500),
                    (true, false) => Style::new().bg(GRAY.c800),
                    (false, false) => Style::new(),
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", field.label),
                        Style::new().fg(GRAY.c400),
                    ),
                    Span::raw(value),
                ])
                .style(style)
            })
            .collect::<Vec<_>>();

        let help = Line::from(Span::styled(
            "Tab next   Enter submit   Esc cancel",
            Style::new().fg(GRAY.c500),
        ));
        let mut content = lines;
        content.push(Line::raw(""));
        content.push(help);
        frame.render_widget(Paragraph::new(content), inner);

        if let Some(field) = self.form.state().fields().get(self.focus) {
            if !field.locked {
                let x = inner.x as usize + width + field.value.chars().count();
                frame.set_cursor_position(Position::new(x as u16, inner.y + self.focus as u16));
            }
        }
    }
}

pub(super) type Submit<R> = fn(ApiClient, Session, R) -> BoxFuture<'static, ClientResult<()>>;

/// A form that turns into one gateway call once it validates.
pub(super) struct Dialog<F: Form> {
    view: FormView<F>,
    success: &'static str,
    submit: Submit<F::Request>,
}

impl<F: Form> Dialog<F> {
    pub(super) fn new(form: F, success: &'static str, submit: Submit<F::Request>) -> Self {
        Self {
            view: FormView::new(form),
            success,
            submit,
        }
    }
}

pub(super) trait DynDialog {
    fn key(&mut self, key: &KeyEvent) -> Outcome;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// `None` when validation failed. The notice has already been sent.
    fn submit(&self, api: &ApiClient, session: &Session) -> Option<Mutation>;
}

impl<F: Form> DynDialog for Dialog<F> {
    fn key(&mut self, key: &KeyEvent) -> Outcome {
        self.view.key(key)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.view.render(frame, area)
    }

    fn submit(&self, api: &ApiClient, session: &Session) -> Option<Mutation> {
        let req = self.view.form().checked(api.notifier()).ok()?;
        Some(Mutation {
            success: self.success,
            fut: (self.submit)(api.clone(), session.clone(), req),
        })
    }
}
