use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Marker shown for questions with no recorded answer.
pub const UNANSWERED_MARKER: &str = "No response provided";

/// Mean answer length below which the more-detail hint is attached.
pub const DETAIL_THRESHOLD: f64 = 100.0;

//
// ─── REPORT ───────────────────────────────────────────────────────────────────
//

/// One question/answer pair in the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub index: usize,
    pub question: String,
    /// `None` means the question was never answered.
    pub answer: Option<String>,
}

impl ReportEntry {
    /// Answer text for display, with the unanswered marker standing in.
    #[must_use]
    pub fn answer_or_marker(&self) -> &str {
        self.answer.as_deref().unwrap_or(UNANSWERED_MARKER)
    }
}

/// Displayable/exportable summary of a finished interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    /// Mean answer length in characters across all questions; unanswered
    /// questions count as zero.
    pub mean_answer_len: f64,
    pub feedback: Vec<String>,
}

impl Report {
    /// Folds finished session state into a report.
    ///
    /// Empty and absent answers score identically; the role bank is matched
    /// by exact lower-cased role, with a generic bank as fallback.
    #[must_use]
    pub fn compose(questions: &[String], answers: &HashMap<usize, String>, role: &str) -> Self {
        let entries: Vec<ReportEntry> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| ReportEntry {
                index,
                question: question.clone(),
                answer: answers.get(&index).cloned(),
            })
            .collect();

        let mean_answer_len = if entries.is_empty() {
            0.0
        } else {
            let total: usize = entries
                .iter()
                .map(|e| e.answer.as_deref().map_or(0, |a| a.chars().count()))
                .sum();
            total as f64 / entries.len() as f64
        };

        let mut feedback = vec!["You completed all the interview questions!".to_string()];
        if mean_answer_len < DETAIL_THRESHOLD {
            feedback.push(
                "Consider providing more detailed answers with specific examples.".to_string(),
            );
        }
        feedback.extend(
            role_feedback(&role.to_lowercase())
                .iter()
                .map(|s| (*s).to_string()),
        );

        Self {
            entries,
            mean_answer_len,
            feedback,
        }
    }

    /// Serializes the report to the flat text export handed to the download
    /// collaborator. One paragraph per question, double-newline separated.
    #[must_use]
    pub fn to_export_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "Question {}: {}\nAnswer: {}",
                    e.index + 1,
                    e.question,
                    e.answer.as_deref().unwrap_or("No response"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

//
// ─── FEEDBACK BANKS ───────────────────────────────────────────────────────────
//

fn role_feedback(role_key: &str) -> &'static [&'static str] {
    match role_key {
        "software engineer" => &[
            "Great job on the technical questions!",
            "Consider discussing your problem-solving process in more detail.",
            "Keep practicing coding challenges to improve your speed and accuracy.",
        ],
        "data scientist" => &[
            "Good work on the data analysis questions!",
            "Consider discussing more about your approach to data cleaning and feature engineering.",
            "Practice explaining complex statistical concepts in simple terms.",
        ],
        "product manager" => &[
            "Good job on the product thinking questions!",
            "Consider discussing more about stakeholder management.",
            "Practice creating clear and concise product requirements.",
        ],
        _ => &[
            "You're doing great!",
            "Keep practicing to improve your interview skills.",
        ],
    }
}

/// Deterministic export file name derived from role and company.
///
/// Lower-cases both, collapses runs of non-alphanumerics to single
/// underscores and appends `.txt`.
#[must_use]
pub fn export_file_name(role: &str, company: Option<&str>) -> String {
    let mut stem = String::from("interview");
    for part in [Some(role), company].into_iter().flatten() {
        let slug = slugify(part);
        if !slug.is_empty() {
            stem.push('_');
            stem.push_str(&slug);
        }
    }
    format!("{stem}.txt")
}

fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for c in raw.to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Question {i}?")).collect()
    }

    #[test]
    fn mean_counts_unanswered_as_zero() {
        let qs = questions(5);
        let mut answers = HashMap::new();
        answers.insert(0, "a".repeat(40));
        answers.insert(2, "b".repeat(60));

        let report = Report::compose(&qs, &answers, "Software Engineer");

        assert_eq!(report.mean_answer_len, 20.0);
        let unanswered: Vec<_> = report
            .entries
            .iter()
            .filter(|e| e.answer.is_none())
            .collect();
        assert_eq!(unanswered.len(), 3);
        for entry in unanswered {
            assert_eq!(entry.answer_or_marker(), UNANSWERED_MARKER);
        }
    }

    #[test]
    fn empty_answer_scores_like_absent() {
        let qs = questions(2);
        let mut with_empty = HashMap::new();
        with_empty.insert(0, String::new());

        let a = Report::compose(&qs, &with_empty, "x");
        let b = Report::compose(&qs, &HashMap::new(), "x");
        assert_eq!(a.mean_answer_len, b.mean_answer_len);
    }

    #[test]
    fn short_answers_attract_detail_hint() {
        let qs = questions(5);
        let report = Report::compose(&qs, &HashMap::new(), "Software Engineer");
        assert!(report
            .feedback
            .iter()
            .any(|f| f.contains("more detailed answers")));
    }

    #[test]
    fn long_answers_skip_detail_hint() {
        let qs = questions(2);
        let mut answers = HashMap::new();
        answers.insert(0, "x".repeat(150));
        answers.insert(1, "y".repeat(150));

        let report = Report::compose(&qs, &answers, "Software Engineer");
        assert!(!report
            .feedback
            .iter()
            .any(|f| f.contains("more detailed answers")));
    }

    #[test]
    fn role_bank_matches_lowercased_role() {
        let qs = questions(1);
        let report = Report::compose(&qs, &HashMap::new(), "DATA Scientist");
        assert!(report
            .feedback
            .iter()
            .any(|f| f.contains("data analysis questions")));
    }

    #[test]
    fn unknown_role_falls_back_to_generic_bank() {
        let qs = questions(1);
        let report = Report::compose(&qs, &HashMap::new(), "Astronaut");
        assert!(report.feedback.iter().any(|f| f == "You're doing great!"));
    }

    #[test]
    fn export_text_is_double_newline_paragraphs() {
        let qs = questions(2);
        let mut answers = HashMap::new();
        answers.insert(0, "My answer".to_string());

        let report = Report::compose(&qs, &answers, "x");
        let text = report.to_export_text();

        assert_eq!(
            text,
            "Question 1: Question 0?\nAnswer: My answer\n\nQuestion 2: Question 1?\nAnswer: No response"
        );
    }

    #[test]
    fn export_file_name_is_deterministic_slug() {
        assert_eq!(
            export_file_name("Software Engineer", Some("Acme Corp.")),
            "interview_software_engineer_acme_corp.txt"
        );
        assert_eq!(export_file_name("SRE", None), "interview_sre.txt");
        assert_eq!(
            export_file_name("Dev / Ops", Some("  ")),
            "interview_dev_ops.txt"
        );
    }
}
