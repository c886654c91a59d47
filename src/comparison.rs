//! Published baseline vs. our trained models
//!
//! Scores from 5-fold cross-validation on the KOI dataset, compared with the
//! best ensemble ("stacking improved") reported in *Assessment of
//! Ensemble-Based Machine Learning Algorithms for Exoplanet Identification*.

use serde::Serialize;

use crate::inference::ModelChoice;

/// One metric row, all values in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: &'static str,
    /// `None` where the paper does not report the metric
    pub paper: Option<f64>,
    pub lightgbm: f64,
    pub catboost: f64,
}

impl MetricRow {
    pub fn score(&self, model: ModelChoice) -> f64 {
        match model {
            ModelChoice::LightGBM => self.lightgbm,
            ModelChoice::CatBoost => self.catboost,
        }
    }

    /// Percentage-point difference from the paper.
    pub fn delta(&self, model: ModelChoice) -> Option<f64> {
        self.paper.map(|p| self.score(model) - p)
    }
}

pub const METRICS: [MetricRow; 3] = [
    MetricRow {
        metric: "Accuracy",
        paper: Some(83.08),
        lightgbm: 83.64,
        catboost: 83.35,
    },
    MetricRow {
        metric: "F1 Score",
        paper: Some(82.41),
        lightgbm: 84.24,
        catboost: 83.91,
    },
    MetricRow {
        metric: "ROC-AUC",
        paper: None,
        lightgbm: 90.50,
        catboost: 90.64,
    },
];

/// Model with the highest score for `metric`, if the metric exists.
pub fn best_model(metric: &str) -> Option<ModelChoice> {
    let row = METRICS.iter().find(|r| r.metric.eq_ignore_ascii_case(metric))?;
    Some(if row.lightgbm >= row.catboost {
        ModelChoice::LightGBM
    } else {
        ModelChoice::CatBoost
    })
}

fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{:+.2}%", d),
        None => "—".to_string(),
    }
}

/// Markdown comparison table.
pub fn render_table() -> String {
    let mut out = String::from(
        "| Metric | Paper (Best: Stacking Improved) | LightGBM | CatBoost | Δ vs Paper (LightGBM) | Δ vs Paper (CatBoost) |\n\
         |:-------|:-------------------------------:|:--------:|:--------:|:---------------------:|:---------------------:|\n",
    );
    for row in METRICS.iter() {
        let paper = row
            .paper
            .map(|p| format!("{:.2}%", p))
            .unwrap_or_else(|| "Not reported".to_string());
        out.push_str(&format!(
            "| {} | {} | {:.2}% | {:.2}% | {} | {} |\n",
            row.metric,
            paper,
            row.lightgbm,
            row.catboost,
            format_delta(row.delta(ModelChoice::LightGBM)),
            format_delta(row.delta(ModelChoice::CatBoost)),
        ));
    }
    out
}
