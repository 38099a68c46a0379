// src/stats.rs

use crate::{
    error::AppResult,
    models::{
        quiz_result::QuizResult,
        stats::{DashboardStats, Grade, GradeCount, QuestionErrorRate},
    },
    store::ResultStore,
};

/// Minimum score counted as passing.
pub const PASS_SCORE: i32 = 60;

/// Scans every stored submission and summarizes it.
/// A row with malformed answers fails the whole computation.
pub async fn dashboard_stats(store: &dyn ResultStore) -> AppResult<DashboardStats> {
    let results = store.all().await?;
    tracing::debug!("Computing dashboard stats over {} results", results.len());
    Ok(summarize(&results))
}

/// Computes dashboard metrics from a full set of submissions.
pub fn summarize(results: &[QuizResult]) -> DashboardStats {
    let total_count = results.len() as i64;

    let (avg_score, max_score, pass_rate) = if results.is_empty() {
        (0.0, 0, 0.0)
    } else {
        let sum: i64 = results.iter().map(|r| r.score as i64).sum();
        let max = results.iter().map(|r| r.score).max().unwrap_or(0);
        let passed = results.iter().filter(|r| r.score >= PASS_SCORE).count();
        (
            round2(sum as f64 / total_count as f64),
            max,
            round2(passed as f64 / total_count as f64 * 100.0),
        )
    };

    DashboardStats {
        total_count,
        avg_score,
        max_score,
        pass_rate,
        score_distribution: score_distribution(results),
        error_rates: error_rates(results),
    }
}

/// Counts per non-empty band, best band first.
pub fn score_distribution(results: &[QuizResult]) -> Vec<GradeCount> {
    let mut counts = [0i64; Grade::ALL.len()];
    for result in results {
        counts[Grade::from_score(result.score) as usize] += 1;
    }

    Grade::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(grade, count)| GradeCount {
            grade: *grade,
            count,
        })
        .collect()
}

/// Error rate per question index, highest first.
///
/// A submission only counts toward the questions it actually has an
/// entry for; shorter answer sheets do not count as wrong.
pub fn error_rates(results: &[QuizResult]) -> Vec<QuestionErrorRate> {
    // (correct, wrong) per question index
    let mut tally: Vec<(u64, u64)> = Vec::new();

    for result in results {
        let answers = result.answers.as_slice();
        if answers.len() > tally.len() {
            tally.resize(answers.len(), (0, 0));
        }
        for (i, correct) in answers.iter().enumerate() {
            if *correct {
                tally[i].0 += 1;
            } else {
                tally[i].1 += 1;
            }
        }
    }

    let mut rates: Vec<QuestionErrorRate> = tally
        .into_iter()
        .enumerate()
        .map(|(i, (correct, wrong))| {
            let answered = correct + wrong;
            let rate = if answered > 0 {
                wrong as f64 / answered as f64 * 100.0
            } else {
                0.0
            };
            QuestionErrorRate {
                question: format!("Question {}", i + 1),
                error_rate: round2(rate),
            }
        })
        .collect();

    // Stable: ties keep question order.
    rates.sort_by(|a, b| b.error_rate.total_cmp(&a.error_rate));
    rates
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_result::AnswerSheet;

    fn result(score: i32, answers: &[bool]) -> QuizResult {
        QuizResult {
            id: 0,
            class_name: "7A".to_string(),
            student_name: "student".to_string(),
            seat_number: "1".to_string(),
            score,
            answers: AnswerSheet(answers.to_vec()),
            submit_time: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn empty_store_yields_zeroes() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.avg_score, 0.0);
        assert_eq!(stats.max_score, 0);
        assert_eq!(stats.pass_rate, 0.0);
        assert!(stats.score_distribution.is_empty());
        assert!(stats.error_rates.is_empty());
    }

    #[test]
    fn one_result_per_band() {
        let results: Vec<_> = [95, 85, 75, 65, 55].iter().map(|s| result(*s, &[])).collect();
        let stats = summarize(&results);

        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.avg_score, 75.0);
        assert_eq!(stats.max_score, 95);
        assert_eq!(stats.pass_rate, 80.0);

        let grades: Vec<_> = stats
            .score_distribution
            .iter()
            .map(|g| (g.grade, g.count))
            .collect();
        assert_eq!(
            grades,
            vec![
                (Grade::Excellent, 1),
                (Grade::Good, 1),
                (Grade::Average, 1),
                (Grade::Pass, 1),
                (Grade::Fail, 1),
            ]
        );
    }

    #[test]
    fn distribution_skips_empty_bands_and_keeps_band_order() {
        let results: Vec<_> = [40, 100, 59, 90].iter().map(|s| result(*s, &[])).collect();
        let dist = score_distribution(&results);
        assert_eq!(
            dist,
            vec![
                GradeCount { grade: Grade::Excellent, count: 2 },
                GradeCount { grade: Grade::Fail, count: 2 },
            ]
        );
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(Grade::from_score(90), Grade::Excellent);
        assert_eq!(Grade::from_score(89), Grade::Good);
        assert_eq!(Grade::from_score(80), Grade::Good);
        assert_eq!(Grade::from_score(70), Grade::Average);
        assert_eq!(Grade::from_score(60), Grade::Pass);
        assert_eq!(Grade::from_score(59), Grade::Fail);
        assert_eq!(Grade::from_score(-5), Grade::Fail);
    }

    #[test]
    fn error_rates_sorted_descending() {
        let results = vec![result(50, &[true, false]), result(0, &[false, false])];
        let rates = error_rates(&results);
        assert_eq!(
            rates,
            vec![
                QuestionErrorRate { question: "Question 2".into(), error_rate: 100.0 },
                QuestionErrorRate { question: "Question 1".into(), error_rate: 50.0 },
            ]
        );
    }

    #[test]
    fn short_answer_sheets_do_not_count_as_wrong() {
        let results = vec![result(80, &[true, true, false]), result(90, &[true])];
        let rates = error_rates(&results);
        // Q3 answered once (wrong); Q1 twice, Q2 once, both correct.
        assert_eq!(rates[0].question, "Question 3");
        assert_eq!(rates[0].error_rate, 100.0);
        assert_eq!(rates[1].question, "Question 1");
        assert_eq!(rates[2].question, "Question 2");
        assert_eq!(rates[1].error_rate, 0.0);
    }

    #[test]
    fn rates_are_rounded_to_two_places() {
        let results = vec![
            result(70, &[false]),
            result(70, &[true]),
            result(71, &[true]),
        ];
        let stats = summarize(&results);
        assert_eq!(stats.error_rates[0].error_rate, 33.33);
        assert_eq!(stats.avg_score, 70.33);
        assert_eq!(stats.pass_rate, 100.0);
    }
}
