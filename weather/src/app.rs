/// Things that can happen to the app
pub mod action;
pub use action::Action;

/// The email/password form behind login and signup
pub mod auth_form;
use auth_form::AuthForm;

/// Side effects the app asks the shell to perform
pub mod effect;
pub use effect::Effect;

/// The weather lookup, unlocked by logging in
pub mod weather_widget;
use weather_widget::WeatherWidget;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::Paragraph, Frame};
use std::process::ExitCode;
use weather_core::{api::Client, weather::Provider};

/// Everything the app needs from the outside world, handed in at
/// construction instead of living in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// The account server
    pub server: Client,

    /// The weather provider
    pub provider: Provider,

    /// City to look up right after login
    pub default_city: String,
}

/// Which page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Log into an existing account
    Login,

    /// Create an account
    Signup,

    /// Look up the weather
    Weather,
}

/// The "functional core" of the app.
pub struct App {
    /// Where we send requests
    context: Context,

    /// Which page is showing
    page: Page,

    /// The login page's form
    login: AuthForm,

    /// The signup page's form
    signup: AuthForm,

    /// Who logged in, for display on the weather page
    user_email: Option<String>,

    /// The weather page's widget
    weather: WeatherWidget,

    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Set when the app should exit
    exit: Option<ExitCode>,
}

impl App {
    /// Create a new instance of the app, starting on the login page
    pub fn new(context: Context) -> Self {
        Self {
            context,
            page: Page::Login,
            login: AuthForm::new("Sign In", "Sign In"),
            signup: AuthForm::new("Create an Account", "Sign Up"),
            user_email: None,
            weather: WeatherWidget::default(),
            status_line: None,
            exit: None,
        }
    }

    /// Which page is showing
    #[cfg(test)]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => match self.key_action(key) {
                Some(action) => self.handle(action),
                None => vec![],
            },

            Action::ShowSignup if self.page == Page::Login => {
                self.page = Page::Signup;
                self.signup.reset();

                vec![]
            }

            Action::ShowLogin if self.page == Page::Signup => {
                self.page = Page::Login;
                self.login.reset();

                vec![]
            }

            Action::SubmitLogin if self.page == Page::Login => self
                .login
                .submit()
                .map(|req| Effect::LogIn(self.context.server.clone(), req))
                .into_iter()
                .collect(),

            Action::SubmitSignup if self.page == Page::Signup => self
                .signup
                .submit()
                .map(|req| Effect::SignUp(self.context.server.clone(), req))
                .into_iter()
                .collect(),

            Action::LoggedIn(Ok(resp)) => {
                self.login.succeed(None, false);
                self.user_email = Some(resp.user.email);
                self.page = Page::Weather;

                vec![self
                    .weather
                    .init(&self.context.provider, &self.context.default_city)]
            }

            Action::LoggedIn(Err(err)) => {
                self.login.fail(err.to_string());

                vec![]
            }

            Action::SignedUp(Ok(resp)) => {
                self.signup.succeed(Some(resp.message), true);

                vec![]
            }

            Action::SignedUp(Err(err)) => {
                self.signup.fail(err.to_string());

                vec![]
            }

            Action::Logout if self.page == Page::Weather => {
                self.page = Page::Login;
                self.user_email = None;
                self.login.reset();

                vec![]
            }

            Action::Search if self.page == Page::Weather => {
                self.weather.search(&self.context.provider)
            }

            Action::SearchByGeolocation if self.page == Page::Weather => {
                self.weather.search_by_geolocation()
            }

            Action::DismissError => {
                self.weather.dismiss_error();

                vec![]
            }

            Action::Located {
                generation,
                coordinates,
            } => self
                .weather
                .located(generation, coordinates, &self.context.provider),

            Action::GotWeather { generation, result } => {
                self.weather.finished(generation, result);

                vec![]
            }

            Action::Quit => {
                self.exit = Some(ExitCode::SUCCESS);

                vec![]
            }

            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }

            // Navigation that doesn't make sense from the current page
            Action::ShowSignup
            | Action::ShowLogin
            | Action::SubmitLogin
            | Action::SubmitSignup
            | Action::Logout
            | Action::Search
            | Action::SearchByGeolocation => vec![],
        }
    }

    /// Translate a key press into an action for the current page, or apply it
    /// to whatever input has focus.
    fn key_action(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (self.page, key.code) {
            (_, KeyCode::Char('c')) if ctrl => Some(Action::Quit),

            (Page::Login, KeyCode::Enter) => Some(Action::SubmitLogin),
            (Page::Login, KeyCode::Char('s')) if ctrl => Some(Action::ShowSignup),
            (Page::Login, _) => {
                self.login.handle_event(key);
                None
            }

            (Page::Signup, KeyCode::Enter) => Some(Action::SubmitSignup),
            (Page::Signup, KeyCode::Char('l')) if ctrl => Some(Action::ShowLogin),
            (Page::Signup, _) => {
                self.signup.handle_event(key);
                None
            }

            (Page::Weather, KeyCode::Enter) => Some(Action::Search),
            (Page::Weather, KeyCode::Esc) => Some(Action::DismissError),
            (Page::Weather, KeyCode::Char('g')) if ctrl => Some(Action::SearchByGeolocation),
            (Page::Weather, KeyCode::Char('o')) if ctrl => Some(Action::Logout),
            (Page::Weather, _) => {
                self.weather.handle_event(key);
                None
            }
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [header_area, body_area, status_area] = vertical.areas(frame.area());

        let header = match (&self.page, &self.user_email) {
            (Page::Weather, Some(email)) => format!("Weather · signed in as {email}"),
            _ => "Weather".to_string(),
        };
        frame.render_widget(
            Paragraph::new(header).bg(Color::DarkGray).fg(Color::White),
            header_area,
        );

        let help = match self.page {
            Page::Login => "enter: sign in · tab: next field · ctrl-s: sign up · ctrl-c: quit",
            Page::Signup => "enter: sign up · tab: next field · ctrl-l: sign in · ctrl-c: quit",
            Page::Weather => {
                "enter: search · ctrl-g: my location · esc: dismiss · ctrl-o: log out · ctrl-c: quit"
            }
        };

        match self.page {
            Page::Login => self.login.render(body_area, frame),
            Page::Signup => self.signup.render(body_area, frame),
            Page::Weather => self.weather.render(body_area, frame),
        }

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => help,
        });

        frame.render_widget(status, status_area);
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }
}

#[cfg(test)]
mod test {
    use super::auth_form::{Message, LOADING_LABEL};
    use super::*;
    use reqwest::StatusCode;
    use weather_core::{
        api::{self, login, signup},
        weather::{self as weather_api, Query, Units, NOT_FOUND_MESSAGE},
    };

    fn context() -> Context {
        Context {
            server: Client::new("http://auth.test".to_string()),
            provider: Provider {
                url: "http://weather.test/weather".to_string(),
                api_key: "secret".to_string(),
                units: Units::Metric,
                icon_url: "http://weather.test/img".to_string(),
            },
            default_city: "Bengaluru".to_string(),
        }
    }

    fn key(code: KeyCode) -> Action {
        Action::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Action {
        Action::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle(key(KeyCode::Char(c))), vec![]);
        }
    }

    fn fill(app: &mut App, email: &str, password: &str) {
        type_text(app, email);
        app.handle(key(KeyCode::Tab));
        type_text(app, password);
    }

    fn logged_in(email: &str) -> Action {
        Action::LoggedIn(Ok(login::Resp {
            message: "Login successful!".to_string(),
            user: login::User {
                email: email.to_string(),
            },
        }))
    }

    fn rejected(message: &str) -> api::Error {
        api::Error::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn default_fetch(generation: u64) -> Effect {
        Effect::FetchWeather {
            generation,
            provider: context().provider,
            query: Query::City("Bengaluru".to_string()),
        }
    }

    #[test]
    fn test_starts_on_login() {
        let app = App::new(context());

        assert_eq!(app.page(), Page::Login);
        assert_eq!(app.should_exit(), None);
    }

    #[test]
    fn test_toggle_pages_clears_forms() {
        let mut app = App::new(context());
        app.handle(ctrl('s'));
        fill(&mut app, "a@b.com", "pw1");
        app.signup.fail("stale".to_string());

        app.handle(ctrl('l'));
        assert_eq!(app.page(), Page::Login);

        app.handle(ctrl('s'));
        assert_eq!(app.page(), Page::Signup);
        assert_eq!(app.signup.email(), "");
        assert_eq!(app.signup.message(), None);
    }

    #[test]
    fn test_login_submit_sends_form_values() {
        let mut app = App::new(context());
        fill(&mut app, "a@b.com", "pw1");

        let effects = app.handle(key(KeyCode::Enter));

        assert_eq!(
            effects,
            vec![Effect::LogIn(
                context().server,
                login::Req::new("a@b.com", "pw1")
            )]
        );
        assert_eq!(app.login.button_label(), LOADING_LABEL);
    }

    #[test]
    fn test_login_button_disabled_while_in_flight() {
        let mut app = App::new(context());
        fill(&mut app, "a@b.com", "pw1");
        app.handle(Action::SubmitLogin);

        assert_eq!(app.handle(Action::SubmitLogin), vec![]);
    }

    #[test]
    fn test_login_success_unlocks_weather() {
        let mut app = App::new(context());
        fill(&mut app, "a@b.com", "pw1");
        app.handle(Action::SubmitLogin);

        let effects = app.handle(logged_in("a@b.com"));

        assert_eq!(app.page(), Page::Weather);
        assert_eq!(app.user_email.as_deref(), Some("a@b.com"));
        assert_eq!(app.login.button_label(), "Sign In");
        assert_eq!(effects, vec![default_fetch(1)]);
    }

    #[test]
    fn test_login_failure_stays_with_message() {
        let mut app = App::new(context());
        fill(&mut app, "a@b.com", "wrong");
        app.handle(Action::SubmitLogin);

        let effects = app.handle(Action::LoggedIn(Err(rejected("Invalid email or password."))));

        assert_eq!(effects, vec![]);
        assert_eq!(app.page(), Page::Login);
        assert_eq!(
            app.login.message(),
            Some(&Message::Error("Invalid email or password.".to_string()))
        );
        assert!(!app.login.is_submitting());
    }

    #[test]
    fn test_signup_success_clears_form() {
        let mut app = App::new(context());
        app.handle(Action::ShowSignup);
        fill(&mut app, "a@b.com", "pw1");

        let effects = app.handle(Action::SubmitSignup);
        assert_eq!(
            effects,
            vec![Effect::SignUp(
                context().server,
                signup::Req::new("a@b.com", "pw1")
            )]
        );

        app.handle(Action::SignedUp(Ok(signup::Resp {
            message: "User created successfully! Please log in.".to_string(),
        })));

        assert_eq!(app.page(), Page::Signup);
        assert_eq!(app.signup.email(), "");
        assert_eq!(
            app.signup.message(),
            Some(&Message::Success(
                "User created successfully! Please log in.".to_string()
            ))
        );
        assert_eq!(app.signup.button_label(), "Sign Up");
    }

    #[test]
    fn test_signup_failure_keeps_values() {
        let mut app = App::new(context());
        app.handle(Action::ShowSignup);
        fill(&mut app, "a@b.com", "pw1");
        app.handle(Action::SubmitSignup);

        app.handle(Action::SignedUp(Err(rejected(
            "User with this email already exists.",
        ))));

        assert_eq!(app.signup.email(), "a@b.com");
        assert_eq!(app.signup.password(), "pw1");
        assert_eq!(
            app.signup.message(),
            Some(&Message::Error(
                "User with this email already exists.".to_string()
            ))
        );
    }

    #[test]
    fn test_logout_returns_to_clean_login() {
        let mut app = App::new(context());
        fill(&mut app, "a@b.com", "pw1");
        app.handle(Action::SubmitLogin);
        app.handle(logged_in("a@b.com"));

        let effects = app.handle(ctrl('o'));

        assert_eq!(effects, vec![]);
        assert_eq!(app.page(), Page::Login);
        assert_eq!(app.login.email(), "");
        assert_eq!(app.login.message(), None);
        assert_eq!(app.user_email, None);
    }

    #[test]
    fn test_repeated_logins_reinitialize_once_each() {
        let mut app = App::new(context());

        assert_eq!(app.handle(logged_in("a@b.com")), vec![default_fetch(1)]);
        app.handle(Action::Logout);
        assert_eq!(app.handle(logged_in("a@b.com")), vec![default_fetch(2)]);

        // The first login's lookup comes back late and is ignored.
        app.handle(Action::GotWeather {
            generation: 1,
            result: Err(weather_api::Error::NoConditions),
        });
        assert!(app.weather.is_loading());
        assert_eq!(app.weather.error(), None);
    }

    #[test]
    fn test_empty_city_never_hits_the_network() {
        let mut app = App::new(context());
        app.handle(logged_in("a@b.com"));
        app.handle(Action::GotWeather {
            generation: 1,
            result: Err(weather_api::Error::NoConditions),
        });
        assert_eq!(app.weather.error(), Some(NOT_FOUND_MESSAGE));

        let effects = app.handle(key(KeyCode::Enter));

        assert_eq!(effects, vec![]);
        assert_eq!(
            app.weather.error(),
            Some(weather_core::weather::EMPTY_INPUT_MESSAGE)
        );

        app.handle(key(KeyCode::Esc));
        assert_eq!(app.weather.error(), None);
    }

    #[test]
    fn test_search_from_weather_page() {
        let mut app = App::new(context());
        app.handle(logged_in("a@b.com"));
        app.handle(Action::GotWeather {
            generation: 1,
            result: Err(weather_api::Error::NoConditions),
        });
        type_text(&mut app, "Paris");

        let effects = app.handle(key(KeyCode::Enter));

        assert_eq!(
            effects,
            vec![Effect::FetchWeather {
                generation: 1,
                provider: context().provider,
                query: Query::City("Paris".to_string()),
            }]
        );
    }

    #[test]
    fn test_geolocation_round_trip() {
        let mut app = App::new(context());
        app.handle(logged_in("a@b.com"));
        app.handle(Action::GotWeather {
            generation: 1,
            result: Err(weather_api::Error::NoConditions),
        });

        assert_eq!(
            app.handle(ctrl('g')),
            vec![Effect::Locate { generation: 1 }]
        );

        let effects = app.handle(Action::Located {
            generation: 1,
            coordinates: Some((12.97, 77.59)),
        });

        assert_eq!(
            effects,
            vec![Effect::FetchWeather {
                generation: 1,
                provider: context().provider,
                query: Query::Coordinates {
                    latitude: 12.97,
                    longitude: 77.59,
                },
            }]
        );
    }

    #[test]
    fn test_weather_actions_ignored_before_login() {
        let mut app = App::new(context());

        assert_eq!(app.handle(Action::Search), vec![]);
        assert_eq!(app.handle(Action::SearchByGeolocation), vec![]);
        assert_eq!(app.handle(Action::Logout), vec![]);
        assert_eq!(app.page(), Page::Login);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new(context());

        app.handle(ctrl('c'));

        assert_eq!(app.should_exit(), Some(ExitCode::SUCCESS));
    }

    #[test]
    fn test_problem_shows_in_status_line() {
        let mut app = App::new(context());

        app.handle(Action::Problem("terminal went away".to_string()));

        assert_eq!(app.status_line.as_deref(), Some("terminal went away"));
    }
}
