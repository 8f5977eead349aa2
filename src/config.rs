use std::{collections::HashSet, env};

use anyhow::Context;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    Flat,
    Tiered,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pricing_mode: PricingMode,
    pub holidays: HashSet<NaiveDate>,
    pub booking_hold_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let pricing_mode = match env::var("PRICING_MODE").as_deref() {
            Ok("tiered") => PricingMode::Tiered,
            Ok("flat") | Err(_) => PricingMode::Flat,
            Ok(other) => anyhow::bail!("unknown PRICING_MODE `{other}`, expected flat or tiered"),
        };

        let holidays = match env::var("HOLIDAYS") {
            Ok(raw) => parse_holidays(&raw)?,
            Err(_) => HashSet::new(),
        };

        let booking_hold_minutes = env::var("BOOKING_HOLD_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(15);

        Ok(Self {
            port,
            database_url,
            host,
            pricing_mode,
            holidays,
            booking_hold_minutes,
        })
    }
}

/// Parses a comma separated list of ISO dates (`2026-12-25,2027-01-01`).
pub fn parse_holidays(raw: &str) -> anyhow::Result<HashSet<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date `{s}`"))
        })
        .collect()
}
