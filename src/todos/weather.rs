use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

/// Source of today's weather tag. `None` means no tag is available.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn today(&self) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    date: String, // "MM-DD"
    weather: String,
}

/// Fetches a yearly `[{ "date": "MM-DD", "weather": "..." }]` table over HTTP.
#[derive(Clone)]
pub struct HttpWeatherClient {
    http: reqwest::Client,
    url: String,
}

impl HttpWeatherClient {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("build weather http client")?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn fetch(&self) -> anyhow::Result<Vec<WeatherEntry>> {
        let entries = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("weather request")?
            .error_for_status()
            .context("weather status")?
            .json::<Vec<WeatherEntry>>()
            .await
            .context("weather body")?;
        Ok(entries)
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    async fn today(&self) -> Option<String> {
        let entries = match self.fetch().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, url = %self.url, "weather lookup failed");
                return None;
            }
        };
        let today = OffsetDateTime::now_utc().date();
        let weather = weather_for(&entries, today);
        match &weather {
            Some(w) => debug!(weather = %w, "weather resolved"),
            None => warn!(date = %date_key(today), "no weather entry for today"),
        }
        weather
    }
}

fn date_key(date: Date) -> String {
    format!("{:02}-{:02}", u8::from(date.month()), date.day())
}

fn weather_for(entries: &[WeatherEntry], date: Date) -> Option<String> {
    let key = date_key(date);
    entries
        .iter()
        .find(|e| e.date == key)
        .map(|e| e.weather.clone())
}
