use anyhow::Context;
use estimator::DEFAULT_MIN_TRIALS;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub output: OutputFormat,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,
    pub min_trials: usize,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            simulation: SimulationConfig {
                seed: match env::var("MC_SEED") {
                    Ok(raw) => Some(raw.parse().context("MC_SEED must be an unsigned integer")?),
                    Err(_) => None,
                },
                min_trials: parse_min_trials(env::var("MC_MIN_TRIALS").ok())?,
                confidence: env::var("MC_CONFIDENCE")
                    .unwrap_or_else(|_| "0.95".to_string())
                    .parse()
                    .context("MC_CONFIDENCE must be 0.90 or 0.95")?,
            },
            output: match env::var("MC_OUTPUT")
                .unwrap_or_else(|_| "text".to_string())
                .to_ascii_lowercase()
                .as_str()
            {
                "json" => OutputFormat::Json,
                "text" => OutputFormat::Text,
                other => anyhow::bail!("MC_OUTPUT must be `text` or `json`, got `{}`", other),
            },
            log_format: if env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .eq_ignore_ascii_case("json")
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
        })
    }
}

fn parse_min_trials(raw: Option<String>) -> anyhow::Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MIN_TRIALS);
    };
    let min_trials: usize = raw.trim().parse().context("MC_MIN_TRIALS must be a positive integer")?;
    if min_trials == 0 {
        anyhow::bail!("MC_MIN_TRIALS must be a positive integer, got 0");
    }
    Ok(min_trials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_trials_defaults_when_unset() {
        assert_eq!(parse_min_trials(None).unwrap(), DEFAULT_MIN_TRIALS);
        assert_eq!(parse_min_trials(Some("5000".to_string())).unwrap(), 5_000);
    }

    #[test]
    fn test_min_trials_rejects_zero_and_garbage() {
        let err = parse_min_trials(Some("0".to_string())).unwrap_err();
        assert!(err.to_string().contains("MC_MIN_TRIALS"));
        assert!(parse_min_trials(Some("-1".to_string())).is_err());
        assert!(parse_min_trials(Some("many".to_string())).is_err());
    }
}
