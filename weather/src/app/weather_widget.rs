use super::effect::Effect;
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use weather_core::{
    weather::{self, Provider, Query, EMPTY_INPUT_MESSAGE, PERMISSION_DENIED_MESSAGE},
    Conditions,
};

/// Looks up and shows current conditions. Only reachable after login.
#[derive(Debug, Default)]
pub struct WeatherWidget {
    /// Tags requests so results meant for an earlier incarnation of the
    /// widget (before a logout and new login) are dropped.
    generation: u64,

    /// City name being typed
    city: Input,

    /// A lookup is in flight
    loading: bool,

    /// We're waiting on the location capability
    locating: bool,

    /// Error text, when the error area is showing
    error: Option<String>,

    /// The last successful lookup
    conditions: Option<Conditions>,
}

impl WeatherWidget {
    /// Start over and look up `default_city`. Safe to call on every login:
    /// all earlier state is replaced and in-flight results become stale.
    pub fn init(&mut self, provider: &Provider, default_city: &str) -> Effect {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };

        self.fetch(provider, Query::City(default_city.to_string()))
    }

    /// Look up whatever city is typed in. A blank name shows an error
    /// without making a request.
    pub fn search(&mut self, provider: &Provider) -> Vec<Effect> {
        if self.controls_disabled() {
            return vec![];
        }

        let city = self.city.value().trim();
        if city.is_empty() {
            self.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return vec![];
        }

        let query = Query::City(city.to_string());
        vec![self.fetch(provider, query)]
    }

    /// Ask where we are; the answer comes back through `located`.
    pub fn search_by_geolocation(&mut self) -> Vec<Effect> {
        if self.controls_disabled() {
            return vec![];
        }

        self.locating = true;

        vec![Effect::Locate {
            generation: self.generation,
        }]
    }

    /// The location capability answered. `None` means it was denied or
    /// failed.
    pub fn located(
        &mut self,
        generation: u64,
        coordinates: Option<(f64, f64)>,
        provider: &Provider,
    ) -> Vec<Effect> {
        if generation != self.generation {
            return vec![];
        }

        self.locating = false;

        match coordinates {
            Some((latitude, longitude)) => vec![self.fetch(
                provider,
                Query::Coordinates {
                    latitude,
                    longitude,
                },
            )],
            None => {
                self.error = Some(PERMISSION_DENIED_MESSAGE.to_string());
                vec![]
            }
        }
    }

    /// A lookup finished. Loading stops and the controls come back whatever
    /// the outcome.
    pub fn finished(&mut self, generation: u64, result: Result<Conditions, weather::Error>) {
        if generation != self.generation {
            tracing::debug!(generation, "dropping stale weather result");
            return;
        }

        self.loading = false;

        match result {
            Ok(conditions) => self.conditions = Some(conditions),
            Err(err) => {
                tracing::warn!(?err, "weather lookup failed");
                self.error = Some(err.user_message().to_string());
            }
        }
    }

    /// Hide the error area
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Edit the city name
    pub fn handle_event(&mut self, key: KeyEvent) {
        self.city.handle_event(&Event::Key(key));
    }

    /// Whether the search and location controls are disabled
    pub fn controls_disabled(&self) -> bool {
        self.loading || self.locating
    }

    /// Whether a lookup is in flight
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The error currently showing, if any
    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last successful lookup
    #[cfg(test)]
    pub fn conditions(&self) -> Option<&Conditions> {
        self.conditions.as_ref()
    }

    /// Begin a lookup: show loading, hide the error, disable the controls.
    fn fetch(&mut self, provider: &Provider, query: Query) -> Effect {
        self.loading = true;
        self.error = None;

        Effect::FetchWeather {
            generation: self.generation,
            provider: provider.clone(),
            query,
        }
    }

    /// Draw the widget
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, area: Rect, frame: &mut Frame<'_>) {
        let [input_area, controls_area, error_area, display_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        let width = input_area.width.saturating_sub(3) as usize; // -2 for the border, -1 for the cursor
        let scroll = self.city.visual_scroll(width);

        frame.render_widget(
            Paragraph::new(self.city.value())
                .scroll((0, scroll as u16))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("City")
                        .border_style(Style::default().fg(Color::Blue)),
                ),
            input_area,
        );

        if !self.controls_disabled() {
            frame.set_cursor_position((
                input_area.x + (self.city.visual_cursor().max(scroll) - scroll) as u16 + 1,
                input_area.y + 1,
            ));
        }

        let controls = Paragraph::new("[ Search: enter ]  [ My location: ctrl-g ]");
        frame.render_widget(
            if self.controls_disabled() {
                controls.dark_gray()
            } else {
                controls
            },
            controls_area,
        );

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(format!("{error} (esc to dismiss)")).red(),
                error_area,
            );
        }

        if self.loading {
            frame.render_widget(Paragraph::new("Loading…"), display_area);
        } else if let Some(conditions) = &self.conditions {
            let lines = vec![
                Line::from(conditions.location.clone()).bold(),
                Line::from(conditions.description.clone()),
                Line::from(format!("Temperature: {}", conditions.temperature_label())),
                Line::from(format!("Feels like:  {}", conditions.feels_like_label())),
                Line::from(format!("Humidity:    {}", conditions.humidity_label())),
                Line::from(format!("Wind:        {}", conditions.wind_label())),
                Line::from(format!("Icon:        {}", conditions.icon_url)).dark_gray(),
            ];

            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
                display_area,
            );
        }
    }
}
