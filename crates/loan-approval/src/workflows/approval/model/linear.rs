use serde::{Deserialize, Serialize};

use super::linear_score;
use crate::workflows::approval::encoder::FEATURE_COUNT;

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression over the raw (unscaled) feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Approval is predicted when P(approved) is strictly above this value.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegression {
    pub(super) fn validate(&self) -> Result<(), String> {
        validate_linear(&self.coefficients, self.intercept)?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold {} must lie within [0, 1]",
                self.threshold
            ));
        }
        Ok(())
    }

    /// `[P(class 0), P(class 1)]`.
    pub(super) fn probabilities(&self, row: &[f64]) -> [f64; 2] {
        let approved = sigmoid(linear_score(&self.coefficients, self.intercept, row));
        [1.0 - approved, approved]
    }

    pub(super) fn classify(&self, row: &[f64]) -> i64 {
        let [_, approved] = self.probabilities(row);
        i64::from(approved > self.threshold)
    }
}

/// Linear support vector classifier. Exposes no probability estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvc {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearSvc {
    pub(super) fn validate(&self) -> Result<(), String> {
        validate_linear(&self.coefficients, self.intercept)
    }

    pub(super) fn classify(&self, row: &[f64]) -> i64 {
        i64::from(linear_score(&self.coefficients, self.intercept, row) > 0.0)
    }
}

fn validate_linear(coefficients: &[f64], intercept: f64) -> Result<(), String> {
    if coefficients.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {FEATURE_COUNT} coefficients, found {}",
            coefficients.len()
        ));
    }
    if let Some(position) = coefficients.iter().position(|value| !value.is_finite()) {
        return Err(format!("coefficient {position} is not a finite number"));
    }
    if !intercept.is_finite() {
        return Err("intercept is not a finite number".to_string());
    }
    Ok(())
}

fn sigmoid(score: f64) -> f64 {
    if score >= 0.0 {
        1.0 / (1.0 + (-score).exp())
    } else {
        let exp = score.exp();
        exp / (1.0 + exp)
    }
}
