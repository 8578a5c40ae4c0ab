use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// What we tell the user when a city name is blank. No request is made.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a city name.";

/// What we tell the user when any lookup fails, whatever the cause.
pub const NOT_FOUND_MESSAGE: &str = "City not found. Please check spelling.";

/// What we tell the user when we can't get their location.
pub const PERMISSION_DENIED_MESSAGE: &str = "Geolocation permission denied.";

/// Where to find the weather provider and how to talk to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    /// Endpoint for current conditions, e.g.
    /// `https://api.openweathermap.org/data/2.5/weather`
    pub url: String,

    /// The key the provider issued us
    pub api_key: String,

    /// Which units to ask for
    pub units: Units,

    /// Base URL that icon codes get appended to
    pub icon_url: String,
}

/// Measurement systems the provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Celsius and meters per second
    #[default]
    Metric,

    /// Fahrenheit and miles per hour
    Imperial,

    /// Kelvin and meters per second
    Standard,
}

impl Units {
    /// The value of the provider's `units` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Suffix for temperatures
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    /// Suffix for wind speeds
    pub fn speed_suffix(self) -> &'static str {
        match self {
            Self::Metric | Self::Standard => "m/s",
            Self::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Someone asked for units the provider doesn't know about.
#[derive(Debug, Error)]
#[error("unknown units `{0}`, expected metric, imperial, or standard")]
pub struct UnknownUnits(String);

impl FromStr for Units {
    type Err = UnknownUnits;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            "standard" => Ok(Self::Standard),
            _ => Err(UnknownUnits(s.to_string())),
        }
    }
}

/// What place to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// A city, by name
    City(String),

    /// A point on the map
    Coordinates {
        /// Degrees north
        latitude: f64,

        /// Degrees east
        longitude: f64,
    },
}

/// Things that can go wrong looking up the weather. Users only ever see
/// `NOT_FOUND_MESSAGE`; these variants exist for the logs.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't reach the provider or couldn't parse its reply.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but not with a success.
    #[error("provider returned {0}")]
    Status(reqwest::StatusCode),

    /// The reply had no conditions in it.
    #[error("provider reply had no weather conditions")]
    NoConditions,
}

impl Error {
    /// The message to show the user. Always the same, on purpose.
    pub fn user_message(&self) -> &'static str {
        NOT_FOUND_MESSAGE
    }
}

/// The parts of the provider's reply that we use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// City name
    pub name: String,

    /// Country information
    pub sys: Sys,

    /// Condition summaries. We only look at the first one.
    pub weather: Vec<Summary>,

    /// Temperature and humidity
    pub main: Main,

    /// Wind
    pub wind: Wind,
}

/// Country information in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sys {
    /// Two-letter country code
    #[serde(default)]
    pub country: String,
}

/// A condition summary in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// e.g. "scattered clouds"
    pub description: String,

    /// Provider icon code, e.g. "03d"
    pub icon: String,
}

/// Temperature and humidity in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Main {
    /// Current temperature
    pub temp: f64,

    /// Perceived temperature
    pub feels_like: f64,

    /// Relative humidity, in percent
    pub humidity: f64,
}

/// Wind in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wind {
    /// Wind speed
    pub speed: f64,
}

/// Current conditions, ready to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    /// "{city}, {country}"
    pub location: String,

    /// e.g. "scattered clouds"
    pub description: String,

    /// Rounded temperature
    pub temperature: i64,

    /// Rounded perceived temperature
    pub feels_like: i64,

    /// Relative humidity, in percent
    pub humidity: f64,

    /// Wind speed, unrounded
    pub wind_speed: f64,

    /// Where to get the icon image
    pub icon_url: String,

    /// Units the numbers are in
    pub units: Units,
}

impl Conditions {
    /// Turn a provider report into something we can display.
    ///
    /// ## Errors
    ///
    /// `Error::NoConditions` if the report has no condition summary.
    pub fn from_report(report: Report, provider: &Provider) -> Result<Self, Error> {
        let summary = report.weather.into_iter().next().ok_or(Error::NoConditions)?;

        Ok(Self {
            location: format!("{}, {}", report.name, report.sys.country),
            description: summary.description,
            temperature: round_half_up(report.main.temp),
            feels_like: round_half_up(report.main.feels_like),
            humidity: report.main.humidity,
            wind_speed: report.wind.speed,
            icon_url: format!(
                "{}/{}@4x.png",
                provider.icon_url.trim_end_matches('/'),
                summary.icon
            ),
            units: provider.units,
        })
    }

    /// e.g. "24°C"
    pub fn temperature_label(&self) -> String {
        format!("{}{}", self.temperature, self.units.temperature_suffix())
    }

    /// e.g. "26°C"
    pub fn feels_like_label(&self) -> String {
        format!("{}{}", self.feels_like, self.units.temperature_suffix())
    }

    /// e.g. "72%"
    pub fn humidity_label(&self) -> String {
        format!("{}%", self.humidity)
    }

    /// e.g. "3.6 m/s"
    pub fn wind_label(&self) -> String {
        format!("{} {}", self.wind_speed, self.units.speed_suffix())
    }
}

/// Round to the nearest integer, with halves going up (toward positive
/// infinity) rather than away from zero. So 2.5 becomes 3 but -2.5 becomes -2.
#[expect(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    // `value + 0.5` can itself round up, so compare the fraction instead.
    let floor = value.floor();

    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Get the current conditions for a place.
///
/// ## Errors
///
/// - `Error::Http` if the provider couldn't be reached or sent junk
/// - `Error::Status` if the provider returned a non-success status
/// - `Error::NoConditions` if the reply had no conditions
pub async fn fetch(
    client: &reqwest::Client,
    provider: &Provider,
    query: &Query,
) -> Result<Conditions, Error> {
    let mut params: Vec<(&str, String)> = match query {
        Query::City(city) => vec![("q", city.clone())],
        Query::Coordinates {
            latitude,
            longitude,
        } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
    };
    params.push(("appid", provider.api_key.clone()));
    params.push(("units", provider.units.to_string()));

    let resp = client.get(&provider.url).query(&params).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }

    let report: Report = resp.json().await?;

    Conditions::from_report(report, provider)
}
