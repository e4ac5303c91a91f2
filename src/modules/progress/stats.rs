//! Progress statistics.
//!
//! Pure functions over already-fetched rows. Queries hand records over
//! newest-first; `subject_stats` relies on that ordering for the
//! improvement figure.

use crate::modules::progress::model::{
    Assessment, AssessmentStats, AssessmentWithSubject, AttendanceStats, OverallStats,
    ProgressRecord, ReportStats, SubjectGrade, SubjectStats,
};

/// A subject is passed at this grade or above.
pub const PASS_MARK: f64 = 40.0;

pub fn overall_stats(records: &[ProgressRecord]) -> OverallStats {
    if records.is_empty() {
        return OverallStats {
            average_grade: 0.0,
            total_subjects: 0,
            attendance: 0.0,
        };
    }

    let count = records.len() as f64;
    let mut subject_ids: Vec<_> = records.iter().map(|r| r.subject_id).collect();
    subject_ids.sort_unstable();
    subject_ids.dedup();

    OverallStats {
        average_grade: records.iter().map(|r| r.grade).sum::<f64>() / count,
        total_subjects: subject_ids.len(),
        attendance: records
            .iter()
            .map(ProgressRecord::attendance_percentage)
            .sum::<f64>()
            / count,
    }
}

/// Stats over one subject's records, newest first. Improvement is the
/// newest grade minus the oldest.
pub fn subject_stats(records: &[ProgressRecord]) -> SubjectStats {
    if records.is_empty() {
        return SubjectStats {
            average_grade: 0.0,
            highest_grade: 0.0,
            lowest_grade: 0.0,
            improvement: 0.0,
            attendance: 0.0,
        };
    }

    let count = records.len() as f64;
    let newest = records.first().map(|r| r.grade).unwrap_or(0.0);
    let oldest = records.last().map(|r| r.grade).unwrap_or(0.0);

    SubjectStats {
        average_grade: records.iter().map(|r| r.grade).sum::<f64>() / count,
        highest_grade: records.iter().map(|r| r.grade).fold(f64::MIN, f64::max),
        lowest_grade: records.iter().map(|r| r.grade).fold(f64::MAX, f64::min),
        improvement: newest - oldest,
        attendance: records
            .iter()
            .map(ProgressRecord::attendance_percentage)
            .sum::<f64>()
            / count,
    }
}

pub fn attendance_stats(records: &[ProgressRecord]) -> AttendanceStats {
    if records.is_empty() {
        return AttendanceStats {
            overall_attendance: 0.0,
            total_records: 0,
            present_sessions: 0,
            total_sessions: 0,
        };
    }

    AttendanceStats {
        overall_attendance: records
            .iter()
            .map(ProgressRecord::attendance_percentage)
            .sum::<f64>()
            / records.len() as f64,
        total_records: records.len(),
        present_sessions: records.iter().map(|r| i64::from(r.attendance_present)).sum(),
        total_sessions: records.iter().map(|r| i64::from(r.attendance_total)).sum(),
    }
}

pub fn assessment_stats(assessments: &[AssessmentWithSubject]) -> AssessmentStats {
    if assessments.is_empty() {
        return AssessmentStats {
            total_assessments: 0,
            average_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
        };
    }

    let percentages: Vec<f64> = assessments
        .iter()
        .map(|a| a.score / a.max_score * 100.0)
        .collect();

    AssessmentStats {
        total_assessments: assessments.len(),
        average_score: percentages.iter().sum::<f64>() / percentages.len() as f64,
        highest_score: percentages.iter().copied().fold(f64::MIN, f64::max),
        lowest_score: percentages.iter().copied().fold(f64::MAX, f64::min),
    }
}

/// Term report partition: passed at [`PASS_MARK`] or above, everything
/// below is surfaced with its subject for remediation display.
pub fn report_stats(records: &[ProgressRecord]) -> ReportStats {
    if records.is_empty() {
        return ReportStats {
            term_average: 0.0,
            total_subjects: 0,
            passed_subjects: 0,
            needs_improvement: Vec::new(),
        };
    }

    ReportStats {
        term_average: records.iter().map(|r| r.grade).sum::<f64>() / records.len() as f64,
        total_subjects: records.len(),
        passed_subjects: records.iter().filter(|r| r.grade >= PASS_MARK).count(),
        needs_improvement: records
            .iter()
            .filter(|r| r.grade < PASS_MARK)
            .map(|r| SubjectGrade {
                subject: r.subject_name.clone(),
                grade: r.grade,
            })
            .collect(),
    }
}

/// Mean assessment percentage, 0 for an empty list.
pub fn average_assessment_percentage(assessments: &[Assessment]) -> f64 {
    if assessments.is_empty() {
        return 0.0;
    }
    assessments.iter().map(Assessment::percentage).sum::<f64>() / assessments.len() as f64
}

/// Weighted overall grade: assessments 70%, attendance 30%.
pub fn overall_grade(record: &ProgressRecord, assessments: &[Assessment]) -> f64 {
    const ASSESSMENT_WEIGHT: f64 = 0.7;
    const ATTENDANCE_WEIGHT: f64 = 0.3;

    average_assessment_percentage(assessments) * ASSESSMENT_WEIGHT
        + record.attendance_percentage() * ATTENDANCE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::progress::model::AssessmentKind;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn record(subject: &str, grade: f64, present: i32, total: i32) -> ProgressRecord {
        ProgressRecord {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            subject_name: subject.to_string(),
            academic_year: "2025/2026".to_string(),
            term: "Term 1".to_string(),
            grade,
            attendance_present: present,
            attendance_total: total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assessment(score: f64, max_score: f64) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            progress_id: Uuid::new_v4(),
            kind: AssessmentKind::Quiz,
            title: "Quiz 1".to_string(),
            score,
            max_score,
            taken_on: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        }
    }

    #[test]
    fn report_partitions_on_pass_mark() {
        let records = vec![
            record("Mathematics", 95.0, 18, 20),
            record("English", 40.0, 15, 20),
            record("Science", 30.0, 12, 20),
        ];

        let stats = report_stats(&records);

        assert_eq!(stats.term_average, 55.0);
        assert_eq!(stats.total_subjects, 3);
        assert_eq!(stats.passed_subjects, 2); // 40 is a pass
        assert_eq!(stats.needs_improvement.len(), 1);
        assert_eq!(stats.needs_improvement[0].subject, "Science");
        assert_eq!(stats.needs_improvement[0].grade, 30.0);
    }

    #[test]
    fn report_surfaces_every_failing_subject() {
        let records = vec![
            record("Mathematics", 95.0, 18, 20),
            record("English", 39.0, 15, 20),
            record("Science", 30.0, 12, 20),
        ];

        let stats = report_stats(&records);

        assert_eq!(stats.passed_subjects, 1);
        let failing: Vec<(&str, f64)> = stats
            .needs_improvement
            .iter()
            .map(|s| (s.subject.as_str(), s.grade))
            .collect();
        assert_eq!(failing, vec![("English", 39.0), ("Science", 30.0)]);
    }

    #[test]
    fn overall_stats_on_empty_input() {
        let stats = overall_stats(&[]);
        assert_eq!(stats.average_grade, 0.0);
        assert_eq!(stats.total_subjects, 0);
        assert_eq!(stats.attendance, 0.0);
    }

    #[test]
    fn overall_stats_counts_distinct_subjects() {
        let mut first = record("Mathematics", 80.0, 20, 20);
        let mut second = record("Mathematics", 60.0, 10, 20);
        second.subject_id = first.subject_id;
        let third = record("English", 70.0, 15, 20);
        first.attendance_present = 20;

        let stats = overall_stats(&[first, second, third]);

        assert_eq!(stats.total_subjects, 2);
        assert_eq!(stats.average_grade, 70.0);
        // (100 + 50 + 75) / 3
        assert_eq!(stats.attendance, 75.0);
    }

    #[test]
    fn subject_improvement_is_newest_minus_oldest() {
        // Newest first, the order the queries produce.
        let records = vec![
            record("Mathematics", 85.0, 18, 20),
            record("Mathematics", 70.0, 16, 20),
            record("Mathematics", 60.0, 14, 20),
        ];

        let stats = subject_stats(&records);

        assert_eq!(stats.improvement, 25.0);
        assert_eq!(stats.highest_grade, 85.0);
        assert_eq!(stats.lowest_grade, 60.0);
    }

    #[test]
    fn attendance_percentage_zero_when_no_sessions() {
        let r = record("Mathematics", 50.0, 0, 0);
        assert_eq!(r.attendance_percentage(), 0.0);
    }

    #[test]
    fn attendance_stats_aggregates_sessions() {
        let records = vec![
            record("Mathematics", 80.0, 18, 20),
            record("English", 70.0, 10, 20),
        ];

        let stats = attendance_stats(&records);

        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.present_sessions, 28);
        assert_eq!(stats.total_sessions, 40);
        assert_eq!(stats.overall_attendance, 70.0); // (90 + 50) / 2
    }

    #[test]
    fn weighted_overall_grade() {
        let r = record("Mathematics", 0.0, 20, 20); // 100% attendance
        let assessments = vec![assessment(8.0, 10.0), assessment(6.0, 10.0)]; // avg 70%

        // 70 * 0.7 + 100 * 0.3
        assert!((overall_grade(&r, &assessments) - 79.0).abs() < 1e-9);
    }

    #[test]
    fn average_assessment_percentage_empty_is_zero() {
        assert_eq!(average_assessment_percentage(&[]), 0.0);
    }
}
