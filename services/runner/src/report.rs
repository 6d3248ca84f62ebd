//! Console and JSON presentation of one scenario run

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use estimator::Seed;
use serde::Serialize;
use uuid::Uuid;

use crate::scenarios::Findings;

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub scenario: String,
    pub question: String,
    /// `None` when the generator was seeded from entropy
    pub seed: Option<u64>,
    pub trials: usize,
    #[serde(flatten)]
    pub findings: Findings,
}

impl ScenarioReport {
    pub fn new(
        scenario: &str,
        question: String,
        seed: Seed,
        trials: usize,
        started_at: DateTime<Utc>,
        findings: Findings,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            scenario: scenario.to_string(),
            question,
            seed: match seed {
                Seed::Fixed(value) => Some(value),
                Seed::Entropy => None,
            },
            trials,
            findings,
        }
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.question)?;
        writeln!(out, "  scenario:    {}", self.scenario)?;
        writeln!(out, "  run id:      {}", self.run_id)?;
        match self.seed {
            Some(seed) => writeln!(out, "  seed:        {}", seed)?,
            None => writeln!(out, "  seed:        entropy")?,
        }
        writeln!(out, "  trials:      {}", self.trials)?;

        if let Some(result) = &self.findings.headline {
            writeln!(out)?;
            writeln!(
                out,
                "  estimate:    {:.6}  ({} of {})",
                result.probability(),
                result.successes(),
                result.trials()
            )?;
            if let Some(theoretical) = result.theoretical() {
                writeln!(out, "  theoretical: {:.6}", theoretical)?;
            }
            if let Some(error) = result.absolute_error() {
                writeln!(out, "  abs error:   {:.6}", error)?;
            }
            if let (Some(margin), Some(level)) = (result.error_margin(), result.confidence()) {
                writeln!(out, "  margin:      ±{:.6} at {}", margin, level)?;
            }
            if let Some(covered) = result.covers_theoretical() {
                let verdict = if covered { "yes" } else { "no" };
                writeln!(out, "  within margin of theory: {}", verdict)?;
            }
        }

        if !self.findings.metrics.is_empty() {
            writeln!(out)?;
            let width = self.findings.metrics.iter().map(|m| m.name.len()).max().unwrap_or(0);
            for metric in &self.findings.metrics {
                writeln!(out, "  {:<width$}  {:.6}", metric.name, metric.value, width = width)?;
            }
        }

        if !self.findings.frequencies.is_empty() {
            writeln!(out)?;
            let labels: Vec<String> = self
                .findings
                .frequencies
                .iter()
                .map(|f| f.label.clone().unwrap_or_else(|| f.value.to_string()))
                .collect();
            let width = labels.iter().map(String::len).max().unwrap_or(0);
            for (label, frequency) in labels.iter().zip(&self.findings.frequencies) {
                writeln!(
                    out,
                    "  {:<width$}  {:>10}  {:.4}",
                    label,
                    frequency.count,
                    frequency.share,
                    width = width
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator::{ConfidenceLevel, EstimationResult};

    fn report() -> ScenarioReport {
        let headline = EstimationResult::from_counts(1_000, 500)
            .with_theoretical(0.5)
            .unwrap()
            .with_confidence(ConfidenceLevel::NinetyFive)
            .unwrap();
        let findings = Findings::with_headline(headline).metric("answer", 42.0);
        ScenarioReport::new(
            "coin-toss",
            "Probability of heads for a fair coin".to_string(),
            Seed::Fixed(42),
            1_000,
            Utc::now(),
            findings,
        )
    }

    #[test]
    fn test_text_report_lists_estimate_and_theory() {
        let text = report().render_text();
        assert!(text.starts_with("Probability of heads for a fair coin\n"));
        assert!(text.contains("estimate:    0.500000  (500 of 1000)"));
        assert!(text.contains("theoretical: 0.500000"));
        assert!(text.contains("at 95%"));
        assert!(text.contains("seed:        42"));
        assert!(text.contains("answer  42.000000"));
    }

    #[test]
    fn test_json_report_flattens_findings() {
        let json: serde_json::Value = serde_json::from_str(&report().render_json().unwrap()).unwrap();
        assert_eq!(json["scenario"], "coin-toss");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["headline"]["successes"], 500);
        assert_eq!(json["headline"]["confidence"], "ninety_five");
        assert_eq!(json["metrics"][0]["name"], "answer");
        assert!(json.get("frequencies").is_none());
    }

    #[test]
    fn test_entropy_seed_is_reported() {
        let report = ScenarioReport::new("pi", "q".into(), Seed::Entropy, 10, Utc::now(), Findings::default());
        assert!(report.render_text().contains("seed:        entropy"));
        assert!(report.seed.is_none());
    }
}
