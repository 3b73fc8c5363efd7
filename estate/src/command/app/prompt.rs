use ratatui::style::palette::tailwind::{GRAY, YELLOW};
use ratatui::style::Style;

#[derive(Default, Debug)]
pub(super) struct InputCursor {
    source: String,
    index: usize,
}

impl InputCursor {
    pub(super) fn insert(&mut self, c: char) {
        self.source.insert(self.index, c);
        self.index += c.len_utf8();
    }

    pub(super) fn remove(&mut self) {
        let Some(c) = self.source[..self.index].chars().next_back() else {
            return;
        };
        self.index -= c.len_utf8();
        self.source.remove(self.index);
    }

    pub(super) fn as_str(&self) -> &str {
        self.source.as_str()
    }
}

#[derive(Debug)]
pub(super) enum PromptSearchStep {
    Edit,
    Submit,
}

#[derive(Debug)]
pub(super) struct PromptSearch {
    pub(super) input: InputCursor,
    pub(super) step: PromptSearchStep,
}

/// Bottom line of a list screen.
#[derive(Debug, Default)]
pub(super) enum PromptState {
    #[default]
    Default,
    Search(PromptSearch),
    Confirm(String),
}

impl PromptState {
    pub(super) fn search() -> Self {
        PromptState::Search(PromptSearch {
            input: InputCursor::default(),
            step: PromptSearchStep::Edit,
        })
    }

    pub(super) fn prefix(&self) -> &'static str {
        match self {
            PromptState::Default => "",
            PromptState::Search(_) => "/",
            PromptState::Confirm(_) => "",
        }
    }

    pub(super) fn value(&self) -> String {
        match self {
            PromptState::Default => String::new(),
            PromptState::Search(s) => s.input.as_str().to_string(),
            PromptState::Confirm(message) => format!("{message} [y/n]"),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self {
            PromptState::Default => Style::new().fg(GRAY.c500),
            PromptState::Search(s) => match s.step {
                PromptSearchStep::Edit => Style::default(),
                PromptSearchStep::Submit => Style::new().fg(YELLOW.c500),
            },
            PromptState::Confirm(_) => Style::new().fg(YELLOW.c500),
        }
    }

    /// Whether key presses go to the prompt instead of the list.
    pub(super) fn captures_keys(&self) -> bool {
        match self {
            PromptState::Search(s) => matches!(s.step, PromptSearchStep::Edit),
            PromptState::Confirm(_) => true,
            PromptState::Default => false,
        }
    }

    pub(super) fn set(&mut self, value: PromptState) {
        *self = value;
    }
}
