use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;
use serde::Serialize;

/// Which derivation turns a user profile into a daily calorie target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieFormula {
    /// Mifflin–St Jeor BMR × activity, then a fixed ±500 kcal.
    MifflinStJeor,
    /// (2000 + (weight − desired) × 110) × activity.
    Baseline,
}

impl FromStr for CalorieFormula {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mifflin" | "mifflin_st_jeor" | "mifflin-st-jeor" => Ok(Self::MifflinStJeor),
            "baseline" => Ok(Self::Baseline),
            other => anyhow::bail!("unknown calorie formula: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub calorie_formula: CalorieFormula,
    /// Half-width of the recipe calorie window around the per-meal target.
    pub calorie_window: f64,
    pub recipes_per_meal: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            calorie_formula: CalorieFormula::MifflinStJeor,
            calorie_window: 100.0,
            recipes_per_meal: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("invalid APP_PORT: {v}"))?,
            Err(_) => 8080,
        };
        let planner = PlannerConfig::from_env()?;
        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            planner,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

impl PlannerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let calorie_formula = match std::env::var("PLAN_CALORIE_FORMULA") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.calorie_formula,
        };
        let calorie_window = match std::env::var("PLAN_CALORIE_WINDOW") {
            Ok(v) => v
                .parse::<f64>()
                .with_context(|| format!("invalid PLAN_CALORIE_WINDOW: {v}"))?,
            Err(_) => defaults.calorie_window,
        };
        let recipes_per_meal = match std::env::var("PLAN_RECIPES_PER_MEAL") {
            Ok(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid PLAN_RECIPES_PER_MEAL: {v}"))?,
            Err(_) => defaults.recipes_per_meal,
        };
        let cfg = Self {
            calorie_formula,
            calorie_window,
            recipes_per_meal,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.calorie_window.is_finite() && self.calorie_window >= 0.0,
            "calorie window must be a non-negative number"
        );
        anyhow::ensure!(self.recipes_per_meal >= 1, "recipes per meal must be at least 1");
        Ok(())
    }
}
