use crate::app::Context;
use clap::Parser;
use std::path::PathBuf;
use weather_core::{
    api::Client,
    weather::{Provider, Units},
};

/// A terminal client for logging in and checking the weather
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// The account server, e.g. `http://localhost:3000`
    #[clap(long, env = "WEATHER_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Key for the weather provider
    #[clap(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: String,

    /// Weather provider endpoint for current conditions
    #[clap(
        long,
        env = "WEATHER_API_URL",
        default_value = "https://api.openweathermap.org/data/2.5/weather"
    )]
    weather_api_url: String,

    /// Where weather icons live
    #[clap(long, default_value = "https://openweathermap.org/img/wn")]
    icon_url: String,

    /// metric, imperial, or standard
    #[clap(long, env = "WEATHER_UNITS", default_value = "metric")]
    units: Units,

    /// City to show right after login
    #[clap(long, default_value = "Bengaluru")]
    default_city: String,

    /// Our latitude, for "my location" lookups
    #[clap(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Our longitude, for "my location" lookups
    #[clap(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Where should we write logs?
    #[clap(long)]
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("zone", "bytes", "weather")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Where we are, if we were told. Without coordinates the location
    /// capability counts as denied.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Everything the app needs to know about the outside world.
    pub fn context(&self) -> Context {
        Context {
            server: Client::new(self.server.clone()),
            provider: Provider {
                url: self.weather_api_url.clone(),
                api_key: self.weather_api_key.clone(),
                units: self.units,
                icon_url: self.icon_url.clone(),
            },
            default_city: self.default_city.clone(),
        }
    }
}
