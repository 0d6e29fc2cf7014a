//! Typed models for the statistics API.
//!
//! All models deserialize from transformer output, so field names are
//! camelCase on the wire side of serde. Identifier and score fields the
//! backend may emit as null are `Option`s.

use serde::{Deserialize, Serialize};

// Pre-delivery dashboard models

/// Per-dimension pass/fail breakdown used by the pre-delivery views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionBreakdown {
    pub name: String,
    pub pass_count: u64,
    pub not_pass_count: u64,
    pub average_score: Option<f64>,
}

/// Aggregate for the pre-delivery overview card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<DimensionBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerStats {
    pub reviewer_id: Option<i64>,
    pub reviewer_name: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<DimensionBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerStats {
    pub trainer_level_id: Option<i64>,
    pub trainer_name: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<DimensionBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStats {
    pub domain: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<DimensionBreakdown>,
}

// Generic aggregation models

/// Per-dimension statistics used by the filterable aggregation views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDimensionStats {
    pub name: String,
    pub average_score: Option<f64>,
    pub score_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAggregation {
    pub conversation_count: u64,
    #[serde(default)]
    pub reviewer_count: u64,
    #[serde(default)]
    pub trainer_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<QualityDimensionStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAggregation {
    pub domain: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<QualityDimensionStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerAggregation {
    pub reviewer_id: Option<i64>,
    pub reviewer_name: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<QualityDimensionStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerLevelAggregation {
    pub trainer_level_id: Option<i64>,
    pub trainer_name: Option<String>,
    pub conversation_count: u64,
    #[serde(default)]
    pub quality_dimensions: Vec<QualityDimensionStats>,
}

/// One quality dimension as scored on a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDimensionDetail {
    pub name: String,
    pub score_text: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLevelInfo {
    pub task_id: Option<i64>,
    pub annotator_id: Option<i64>,
    pub annotator_name: Option<String>,
    pub reviewer_id: Option<i64>,
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub quality_dimensions: Vec<QualityDimensionDetail>,
}
