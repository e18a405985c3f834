use serde::{Deserialize, Serialize};

use crate::model::question::TestQuestion;
use crate::model::{QuestionId, TestId};

/// What a catalog test is authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCategory {
    Iot,
    JobInstruction,
    Profession,
    Program,
    Topic,
}

/// Catalog entry for an authored test.
///
/// Written to the `tests_catalog` namespace by the authoring flow; the
/// portal core only reads and re-saves it, so the shape mirrors the
/// persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMeta {
    pub id: TestId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: TestCategory,
    pub question_count: usize,
    pub passing_score: u8,
    /// Allotted minutes for the exam mode of this test.
    pub duration: u32,
    pub questions: Vec<TestQuestion>,
}

/// The fixed work-at-height demo test used by seeds and the taking flow
/// before any test has been authored.
///
/// # Panics
///
/// Never panics in practice; the fixture data is statically valid.
#[must_use]
pub fn sample_work_at_height_test() -> TestMeta {
    let questions = vec![
        TestQuestion::new(
            QuestionId::new("1"),
            "Какова минимальная высота, с которой работы считаются работами на высоте?",
            vec![
                "1 метр".into(),
                "1.5 метра".into(),
                "1.8 метра".into(),
                "2 метра".into(),
            ],
            2,
        )
        .expect("fixture question is valid"),
        TestQuestion::new(
            QuestionId::new("2"),
            "Как часто должна проводиться проверка средств индивидуальной защиты от падения?",
            vec![
                "Раз в месяц".into(),
                "Перед каждым использованием".into(),
                "Раз в квартал".into(),
                "Раз в год".into(),
            ],
            1,
        )
        .expect("fixture question is valid"),
        TestQuestion::new(
            QuestionId::new("3"),
            "Какой максимальный срок действия наряда-допуска на работы на высоте?",
            vec![
                "1 день".into(),
                "3 дня".into(),
                "5 дней".into(),
                "15 дней".into(),
            ],
            3,
        )
        .expect("fixture question is valid"),
    ];

    TestMeta {
        id: TestId::new("work-at-height"),
        title: "Работа на высоте".into(),
        description: "Проверка знаний требований охраны труда при работе на высоте".into(),
        category: TestCategory::Topic,
        question_count: questions.len(),
        passing_score: 80,
        duration: 45,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_test_has_three_questions() {
        let test = sample_work_at_height_test();
        assert_eq!(test.questions.len(), 3);
        assert_eq!(test.question_count, 3);
        assert_eq!(test.passing_score, 80);
    }

    #[test]
    fn catalog_entry_roundtrips_through_json() {
        let test = sample_work_at_height_test();
        let json = serde_json::to_string(&test).unwrap();
        let back: TestMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(test, back);
    }
}
