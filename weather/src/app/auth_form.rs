use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use weather_core::api::signup;

/// What a submit button says while its request is in flight.
pub const LOADING_LABEL: &str = "Loading...";

/// A form for entering an email and password, shared by the login and signup
/// pages.
#[derive(Debug)]
pub struct AuthForm {
    /// Shown in the border
    title: &'static str,

    /// The submit button's resting label
    button: &'static str,

    /// Which field we're editing
    active: Field,

    /// Who are you?
    email: Input,

    /// What's your password? (Will be masked)
    password: Input,

    /// Whether a submit is in flight. The button is disabled meanwhile.
    submitting: bool,

    /// Feedback from the last submit
    message: Option<Message>,
}

/// Which field has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The email field
    Email,

    /// The password field
    Password,
}

impl Field {
    /// Move to the other field (e.g. with tab or shift-tab)
    fn toggle(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// Feedback shown under a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Something went right
    Success(String),

    /// Something went wrong
    Error(String),
}

impl AuthForm {
    /// An empty form
    pub fn new(title: &'static str, button: &'static str) -> Self {
        Self {
            title,
            button,
            active: Field::Email,
            email: Input::default(),
            password: Input::default(),
            submitting: false,
            message: None,
        }
    }

    /// Clear both fields and any feedback. An in-flight submit stays in
    /// flight; it will settle on its own.
    pub fn reset(&mut self) {
        self.active = Field::Email;
        self.email.reset();
        self.password.reset();
        self.message = None;
    }

    /// Start a submit, returning what to send. Returns `None` if a submit is
    /// already in flight.
    pub fn submit(&mut self) -> Option<signup::Req> {
        if self.submitting {
            return None;
        }

        self.submitting = true;
        self.message = None;

        Some(signup::Req::new(self.email.value(), self.password.value()))
    }

    /// The request finished with an error. The fields keep their values.
    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.message = Some(Message::Error(message));
    }

    /// The request finished successfully. Clears the fields if asked to.
    pub fn succeed(&mut self, message: Option<String>, clear: bool) {
        self.submitting = false;

        if clear {
            self.reset();
        }

        self.message = message.map(Message::Success);
    }

    /// What the submit button currently says
    pub fn button_label(&self) -> &'static str {
        if self.submitting {
            LOADING_LABEL
        } else {
            self.button
        }
    }

    /// Whether a submit is in flight
    #[cfg(test)]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Feedback from the last submit, if any
    #[cfg(test)]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// The current email value
    #[cfg(test)]
    pub fn email(&self) -> &str {
        self.email.value()
    }

    /// The current password value
    #[cfg(test)]
    pub fn password(&self) -> &str {
        self.password.value()
    }

    /// Edit the form
    pub fn handle_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.active = self.active.toggle();
            }
            _ => {
                let event = Event::Key(key);

                match self.active {
                    Field::Email => self.email.handle_event(&event),
                    Field::Password => self.password.handle_event(&event),
                };
            }
        }
    }

    /// Draw the form centered in `body_area`
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, body_area: Rect, frame: &mut Frame<'_>) {
        let popup_vert = Layout::vertical([Constraint::Length(10)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(self.title)
            .border_style(Style::default().fg(Color::Blue));
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let fields = Layout::vertical(Constraint::from_lengths([3, 3, 1, 1]));
        let [email_area, password_area, button_area, message_area] = fields.areas(inner);

        let width = inner.width.saturating_sub(3) as usize; // -2 for the border, -1 for the cursor

        for (field, input, area, masked) in [
            (Field::Email, &self.email, email_area, false),
            (Field::Password, &self.password, password_area, true),
        ] {
            let scroll = input.visual_scroll(width);
            let text = if masked {
                "*".repeat(input.value().chars().count())
            } else {
                input.value().to_string()
            };

            let border_style = if self.active == field {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let widget = Paragraph::new(text).scroll((0, scroll as u16)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(match field {
                        Field::Email => "Email",
                        Field::Password => "Password",
                    })
                    .border_style(border_style),
            );

            frame.render_widget(widget, area);

            if self.active == field && !self.submitting {
                frame.set_cursor_position((
                    area.x
                        + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    area.y + 1, // +1 row for the border/title
                ));
            }
        }

        let button = Paragraph::new(format!("[ {} ]", self.button_label()));
        frame.render_widget(
            if self.submitting {
                button.dark_gray()
            } else {
                button.bold()
            },
            button_area,
        );

        if let Some(message) = &self.message {
            let line = match message {
                Message::Success(text) => Paragraph::new(text.as_str()).green(),
                Message::Error(text) => Paragraph::new(text.as_str()).red(),
            };
            frame.render_widget(line, message_area);
        }
    }
}
