use std::{collections::HashSet, time::Duration};

use anyhow::Context;

use crate::{api::Endpoints, ingest::CinemaFilter};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub endpoints: Endpoints,
    pub http_timeout: Duration,
    pub db_connect_timeout: Duration,
    pub cinemas: CinemaFilter,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://cinema-city.db?mode=rwc".to_string());

        let endpoints = Endpoints {
            base_url: var("API_BASE_URL").unwrap_or_else(|| {
                "https://www.cinema-city.pl/pl/data-api-service/v1/quickbook/10103".to_string()
            }),
            until: var("API_UNTIL").unwrap_or_else(|| "3000-06-06".to_string()),
            lang: var("API_LANG").unwrap_or_else(|| "pl_PL".to_string()),
            reference_cinema_id: var("REFERENCE_CINEMA_ID").unwrap_or_else(|| "1097".to_string()),
        };

        let http_timeout_secs: u64 = var("HTTP_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("HTTP_TIMEOUT_SECS")?
            .unwrap_or(5);

        let db_connect_timeout_secs: u64 = var("DB_CONNECT_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("DB_CONNECT_TIMEOUT_SECS")?
            .unwrap_or(10);

        let cinemas = match (var("CINEMA_IDS"), var("CINEMAS")) {
            (Some(ids), _) => CinemaFilter::Ids(split_list(&ids)),
            (None, Some(names)) if names.trim() == "*" => CinemaFilter::All,
            (None, Some(names)) => CinemaFilter::Names(split_list(&names)),
            (None, None) => CinemaFilter::default(),
        };

        Ok(Self {
            database_url,
            endpoints,
            http_timeout: Duration::from_secs(http_timeout_secs),
            db_connect_timeout: Duration::from_secs(db_connect_timeout_secs),
            cinemas,
        })
    }
}

fn split_list(raw: &str) -> HashSet<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_wroclavia() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
        assert_eq!(cfg.db_connect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.endpoints.reference_cinema_id, "1097");
        assert_eq!(cfg.cinemas, CinemaFilter::default());
    }

    #[test]
    fn cinema_names_are_split_and_trimmed() {
        let cfg = config(&[("CINEMAS", "Bytom, Rybnik ,")]).unwrap();
        let expected = ["Bytom", "Rybnik"].into_iter().map(str::to_string).collect();
        assert_eq!(cfg.cinemas, CinemaFilter::Names(expected));
    }

    #[test]
    fn ids_take_precedence_over_names() {
        let cfg = config(&[("CINEMAS", "*"), ("CINEMA_IDS", "1097")]).unwrap();
        assert_eq!(cfg.cinemas, CinemaFilter::Ids(["1097".to_string()].into_iter().collect()));
    }

    #[test]
    fn star_selects_all() {
        assert_eq!(config(&[("CINEMAS", "*")]).unwrap().cinemas, CinemaFilter::All);
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let err = config(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}
