use crate::domain::model::{
    RankedScorer, ScorerEntry, TopScorer, TopScorersResponse, TransformResult, SCORER_COLUMNS,
};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Flattens one API entry. Entries without a statistics block are skipped.
pub fn to_top_scorer(entry: &ScorerEntry, today: NaiveDate) -> Result<Option<TopScorer>> {
    let Some(stats) = entry.statistics.first() else {
        tracing::warn!("⚠️ Skipping {}: no statistics in response", entry.player.name);
        return Ok(None);
    };

    let age = match entry.player.birth.date.as_deref() {
        Some(date) if !date.trim().is_empty() => Some(age_on(date, today)?),
        _ => None,
    };

    Ok(Some(TopScorer {
        player: entry.player.name.clone(),
        club: stats.team.name.clone(),
        total_goals: stats.goals.total.unwrap_or(0),
        penalty_goals: stats.penalty.scored.unwrap_or(0),
        assists: stats.goals.assists.unwrap_or(0),
        matches: stats.games.appearences.unwrap_or(0),
        mins: stats.games.minutes.unwrap_or(0),
        age,
    }))
}

/// Whole years as elapsed days / 365, floored.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Result<i64> {
    let dob = NaiveDate::parse_from_str(birth_date.trim(), BIRTH_DATE_FORMAT).map_err(|e| {
        EtlError::ProcessingError {
            message: format!("Invalid birth date '{}': {}", birth_date, e),
        }
    })?;
    Ok((today - dob).num_days().div_euclid(365))
}

/// Orders by goals then assists (both descending) and assigns dense positions by goals.
pub fn rank_scorers(mut scorers: Vec<TopScorer>) -> Vec<RankedScorer> {
    scorers.sort_by(|a, b| {
        b.total_goals
            .cmp(&a.total_goals)
            .then_with(|| b.assists.cmp(&a.assists))
    });

    let mut position = 0;
    let mut previous_goals = None;
    scorers
        .into_iter()
        .map(|scorer| {
            if previous_goals != Some(scorer.total_goals) {
                position += 1;
                previous_goals = Some(scorer.total_goals);
            }
            RankedScorer { position, scorer }
        })
        .collect()
}

fn row_cells(row: &RankedScorer) -> [String; 9] {
    let s = &row.scorer;
    [
        row.position.to_string(),
        s.player.clone(),
        s.club.clone(),
        s.total_goals.to_string(),
        s.penalty_goals.to_string(),
        s.assists.to_string(),
        s.matches.to_string(),
        s.mins.to_string(),
        s.age.map(|a| a.to_string()).unwrap_or_default(),
    ]
}

/// Right-aligned text table of the ranked rows, one line per scorer.
pub fn render_table(rows: &[RankedScorer]) -> String {
    let cells: Vec<[String; 9]> = rows.iter().map(row_cells).collect();

    let mut widths = SCORER_COLUMNS.map(|c| c.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(pad_line(SCORER_COLUMNS.iter().copied(), &widths));
    for line in &cells {
        lines.push(pad_line(line.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn pad_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths.iter())
        .map(|(value, width)| format!("{:>width$}", value, width = *width))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn to_csv(rows: &[RankedScorer]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SCORER_COLUMNS)?;
    for row in rows {
        writer.write_record(row_cells(row))?;
    }
    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Runs the whole transform step for one API response as of `today`.
pub fn transform_response(data: &TopScorersResponse, today: NaiveDate) -> Result<TransformResult> {
    let mut scorers = Vec::with_capacity(data.response.len());
    let mut skipped = 0;
    for entry in &data.response {
        match to_top_scorer(entry, today)? {
            Some(scorer) => scorers.push(scorer),
            None => skipped += 1,
        }
    }

    let rows = rank_scorers(scorers);
    Ok(TransformResult {
        csv_output: to_csv(&rows)?,
        preview: render_table(&rows),
        rows,
        skipped,
    })
}
