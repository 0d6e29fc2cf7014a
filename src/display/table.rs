use comfy_table::{Attribute, Cell, Table, presets};
use crossterm::terminal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::models::{
    DimensionBreakdown, DomainAggregation, DomainStats, OverallAggregation, OverviewStats,
    QualityDimensionStats, ReviewerAggregation, ReviewerStats, TaskLevelInfo,
    TrainerLevelAggregation, TrainerStats,
};

const MIN_TABLE_WIDTH: usize = 40;
const MAX_TABLE_WIDTH: usize = 200;
const NAME_CELL_WIDTH: usize = 30;
const UNSET_CELL: &str = "-";

/// Formatter for statistics tables
pub struct TableDisplay {
    max_width: Option<usize>,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(MIN_TABLE_WIDTH, MAX_TABLE_WIDTH)),
            Err(_) => Some(80),
        }
    }

    fn new_table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }
        table.set_header(
            header
                .iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    /// Render the pre-delivery overview: headline counts followed by
    /// the per-dimension breakdown.
    pub fn render_overview(&self, stats: &OverviewStats) -> String {
        let mut table = self.new_table(&["Dimension", "Pass", "Not Pass", "Avg Score"]);
        for dimension in &stats.quality_dimensions {
            table.add_row(breakdown_row(dimension));
        }

        format!(
            "Conversations: {}\n\n{}",
            stats.conversation_count, table
        )
    }

    pub fn render_pre_delivery_reviewers(&self, rows: &[ReviewerStats]) -> String {
        let mut table = self.new_table(&[
            "Reviewer",
            "ID",
            "Conversations",
            "Dimension",
            "Pass",
            "Not Pass",
            "Avg Score",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.reviewer_name.as_deref())),
                    Cell::new(format_id(stats.reviewer_id)),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(breakdown_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    pub fn render_pre_delivery_trainers(&self, rows: &[TrainerStats]) -> String {
        let mut table = self.new_table(&[
            "Trainer",
            "Level ID",
            "Conversations",
            "Dimension",
            "Pass",
            "Not Pass",
            "Avg Score",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.trainer_name.as_deref())),
                    Cell::new(format_id(stats.trainer_level_id)),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(breakdown_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    pub fn render_pre_delivery_domains(&self, rows: &[DomainStats]) -> String {
        let mut table = self.new_table(&[
            "Domain",
            "Conversations",
            "Dimension",
            "Pass",
            "Not Pass",
            "Avg Score",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.domain.as_deref())),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(breakdown_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    /// Render the overall aggregate: headline counts followed by the
    /// per-dimension averages.
    pub fn render_overall(&self, stats: &OverallAggregation) -> String {
        let mut table = self.new_table(&["Dimension", "Avg Score", "Scores"]);
        for dimension in &stats.quality_dimensions {
            table.add_row(dimension_stats_row(dimension));
        }

        format!(
            "Conversations: {}\nReviewers: {}\nTrainers: {}\n\n{}",
            stats.conversation_count, stats.reviewer_count, stats.trainer_count, table
        )
    }

    pub fn render_domain_aggregations(&self, rows: &[DomainAggregation]) -> String {
        let mut table = self.new_table(&[
            "Domain",
            "Conversations",
            "Dimension",
            "Avg Score",
            "Scores",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.domain.as_deref())),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(dimension_stats_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    pub fn render_reviewer_aggregations(&self, rows: &[ReviewerAggregation]) -> String {
        let mut table = self.new_table(&[
            "Reviewer",
            "ID",
            "Conversations",
            "Dimension",
            "Avg Score",
            "Scores",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.reviewer_name.as_deref())),
                    Cell::new(format_id(stats.reviewer_id)),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(dimension_stats_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    pub fn render_trainer_level_aggregations(&self, rows: &[TrainerLevelAggregation]) -> String {
        let mut table = self.new_table(&[
            "Trainer",
            "Level ID",
            "Conversations",
            "Dimension",
            "Avg Score",
            "Scores",
        ]);
        for stats in rows {
            for dimension in &stats.quality_dimensions {
                let mut row = vec![
                    Cell::new(truncate_name(stats.trainer_name.as_deref())),
                    Cell::new(format_id(stats.trainer_level_id)),
                    Cell::new(stats.conversation_count),
                ];
                row.extend(dimension_stats_row(dimension));
                table.add_row(row);
            }
        }
        table.to_string()
    }

    pub fn render_task_level(&self, rows: &[TaskLevelInfo]) -> String {
        let mut table = self.new_table(&[
            "Task",
            "Annotator",
            "Reviewer",
            "Dimension",
            "Result",
            "Score",
        ]);
        for task in rows {
            for dimension in &task.quality_dimensions {
                table.add_row(vec![
                    Cell::new(format_id(task.task_id)),
                    Cell::new(truncate_name(task.annotator_name.as_deref())),
                    Cell::new(truncate_name(task.reviewer_name.as_deref())),
                    Cell::new(&dimension.name),
                    Cell::new(dimension.score_text.as_deref().unwrap_or(UNSET_CELL)),
                    Cell::new(format_score(dimension.score)),
                ]);
            }
        }
        table.to_string()
    }
}

fn breakdown_row(dimension: &DimensionBreakdown) -> Vec<Cell> {
    vec![
        Cell::new(&dimension.name),
        Cell::new(dimension.pass_count),
        Cell::new(dimension.not_pass_count),
        Cell::new(format_score(dimension.average_score)),
    ]
}

fn dimension_stats_row(dimension: &QualityDimensionStats) -> Vec<Cell> {
    vec![
        Cell::new(&dimension.name),
        Cell::new(format_score(dimension.average_score)),
        Cell::new(dimension.score_count),
    ]
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.2}", score),
        None => UNSET_CELL.to_string(),
    }
}

fn format_id(id: Option<i64>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => UNSET_CELL.to_string(),
    }
}

/// Shorten over-long names so one entry cannot blow up the layout.
fn truncate_name(name: Option<&str>) -> String {
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return UNSET_CELL.to_string(),
    };

    if UnicodeWidthStr::width(name) <= NAME_CELL_WIDTH {
        return name.to_string();
    }

    let mut truncated = String::new();
    let mut width = 0;
    for ch in name.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > NAME_CELL_WIDTH.saturating_sub(3) {
            break;
        }
        truncated.push(ch);
        width += ch_width;
    }
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_overview() -> OverviewStats {
        OverviewStats {
            conversation_count: 1000,
            quality_dimensions: vec![DimensionBreakdown {
                name: "Clarity".to_string(),
                pass_count: 50,
                not_pass_count: 10,
                average_score: Some(4.5),
            }],
        }
    }

    #[test]
    fn test_overview_render_contains_counts_and_dimensions() {
        let display = TableDisplay::new().with_max_width(120);
        let rendered = display.render_overview(&sample_overview());

        assert!(rendered.contains("Conversations: 1000"));
        assert!(rendered.contains("Clarity"));
        assert!(rendered.contains("50"));
        assert!(rendered.contains("4.50"));
    }

    #[test]
    fn test_missing_values_render_as_placeholder() {
        let display = TableDisplay::new().with_max_width(120);
        let rendered = display.render_pre_delivery_reviewers(&[ReviewerStats {
            reviewer_id: None,
            reviewer_name: None,
            conversation_count: 3,
            quality_dimensions: vec![DimensionBreakdown {
                name: "Tone".to_string(),
                pass_count: 2,
                not_pass_count: 1,
                average_score: None,
            }],
        }]);

        assert!(rendered.contains("Tone"));
        assert!(rendered.contains(UNSET_CELL));
    }

    #[test]
    fn test_score_formatting() {
        assert_eq!(format_score(Some(4.5)), "4.50");
        assert_eq!(format_score(Some(4.0)), "4.00");
        assert_eq!(format_score(None), "-");
    }

    #[test]
    fn test_name_truncation() {
        assert_eq!(truncate_name(Some("short")), "short");
        assert_eq!(truncate_name(None), "-");
        assert_eq!(truncate_name(Some("")), "-");

        let long = "a".repeat(60);
        let truncated = truncate_name(Some(&long));
        assert!(truncated.ends_with("..."));
        assert!(UnicodeWidthStr::width(truncated.as_str()) <= NAME_CELL_WIDTH);
    }

    #[test]
    fn test_task_level_render() {
        let display = TableDisplay::new().with_max_width(160);
        let rendered = display.render_task_level(&[TaskLevelInfo {
            task_id: Some(88101),
            annotator_id: Some(501),
            annotator_name: Some("Priya Raman".to_string()),
            reviewer_id: Some(101),
            reviewer_name: Some("Maya Okafor".to_string()),
            quality_dimensions: vec![crate::api::models::QualityDimensionDetail {
                name: "Accuracy".to_string(),
                score_text: Some("Not Pass".to_string()),
                score: Some(2.0),
            }],
        }]);

        assert!(rendered.contains("88101"));
        assert!(rendered.contains("Priya Raman"));
        assert!(rendered.contains("Not Pass"));
        assert!(rendered.contains("2.00"));
    }
}
