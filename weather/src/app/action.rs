use crossterm::event::KeyEvent;
use weather_core::{
    api::{self, login, signup},
    weather, Conditions,
};

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Go from the login page to the signup page
    ShowSignup,

    /// Go from the signup page to the login page
    ShowLogin,

    /// Submit the login form
    SubmitLogin,

    /// Submit the signup form
    SubmitSignup,

    /// Leave the weather page
    Logout,

    /// Look up the typed-in city
    Search,

    /// Look up wherever we are
    SearchByGeolocation,

    /// Hide the weather error
    DismissError,

    /// Close the app
    Quit,

    /// The server answered a login
    LoggedIn(api::error::Result<login::Resp>),

    /// The server answered a signup
    SignedUp(api::error::Result<signup::Resp>),

    /// The location capability answered (`None` if denied)
    Located {
        /// Which widget incarnation asked
        generation: u64,

        /// Latitude and longitude
        coordinates: Option<(f64, f64)>,
    },

    /// A weather lookup finished
    GotWeather {
        /// Which widget incarnation asked
        generation: u64,

        /// What we found
        result: Result<Conditions, weather::Error>,
    },

    /// Something bad happened; display it to the user
    Problem(String),
}
