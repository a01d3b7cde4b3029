use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::errors::{RenderError, RenderResult};
use crate::render::node::TableData;

/// A structured payload embedded as JSON inside otherwise free-form model
/// output. The discriminant is the `type` tag; every variant carries its own
/// required fields and is structurally validated before acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichContent {
    Table(TableContent),
    Chart(ChartContent),
    Report(ReportContent),
    NewsReport(NewsReportContent),
    Resume(ResumeContent),
    CodeProject(CodeProjectContent),
    StudyExplanation(StudyExplanationContent),
    StudyReview(StudyReviewContent),
    StudyQuiz(StudyQuizContent),
}

/// The closed set of rich content discriminants, used to key the typed
/// renderer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum RichContentKind {
    Table,
    Chart,
    Report,
    NewsReport,
    Resume,
    CodeProject,
    StudyExplanation,
    StudyReview,
    StudyQuiz,
}

impl RichContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RichContentKind::Table => "table",
            RichContentKind::Chart => "chart",
            RichContentKind::Report => "report",
            RichContentKind::NewsReport => "news_report",
            RichContentKind::Resume => "resume",
            RichContentKind::CodeProject => "code_project",
            RichContentKind::StudyExplanation => "study_explanation",
            RichContentKind::StudyReview => "study_review",
            RichContentKind::StudyQuiz => "study_quiz",
        }
    }
}

impl std::fmt::Display for RichContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableContent {
    pub title: String,
    /// Row-major cell data; `data[0]` is the header row.
    pub data: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    pub title: String,
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsReportContent {
    pub headline: String,
    pub summary: String,
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub name: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeProjectContent {
    pub name: String,
    pub description: String,
    pub files: Vec<ProjectFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyExplanationContent {
    pub topic: String,
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReviewContent {
    pub topic: String,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
}

/// `correctAnswer` may be an option index or the exact option text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizAnswer {
    Index(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: QuizAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyQuizContent {
    pub topic: String,
    pub quiz: Vec<QuizQuestion>,
}

impl RichContent {
    pub fn kind(&self) -> RichContentKind {
        match self {
            RichContent::Table(_) => RichContentKind::Table,
            RichContent::Chart(_) => RichContentKind::Chart,
            RichContent::Report(_) => RichContentKind::Report,
            RichContent::NewsReport(_) => RichContentKind::NewsReport,
            RichContent::Resume(_) => RichContentKind::Resume,
            RichContent::CodeProject(_) => RichContentKind::CodeProject,
            RichContent::StudyExplanation(_) => RichContentKind::StudyExplanation,
            RichContent::StudyReview(_) => RichContentKind::StudyReview,
            RichContent::StudyQuiz(_) => RichContentKind::StudyQuiz,
        }
    }

    /// Structural validation beyond what serde type-checks. A payload that
    /// decodes but fails here is treated as plain text by the classifier.
    pub fn validate(&self) -> RenderResult<()> {
        match self {
            RichContent::Table(table) => table.validate(),
            RichContent::Chart(chart) => chart.validate(),
            RichContent::Report(report) => report.validate(),
            RichContent::NewsReport(news) => news.validate(),
            RichContent::Resume(resume) => resume.validate(),
            RichContent::CodeProject(project) => project.validate(),
            RichContent::StudyExplanation(explanation) => explanation.validate(),
            RichContent::StudyReview(review) => review.validate(),
            RichContent::StudyQuiz(quiz) => quiz.validate(),
        }
    }

    /// Row data for spreadsheet export, for the variants that are table-like.
    pub fn export_data(&self) -> Option<TableData> {
        match self {
            RichContent::Table(table) => Some(TableData {
                title: Some(table.title.clone()),
                rows: table.data.clone(),
            }),
            RichContent::Chart(chart) => {
                let mut rows = vec![vec!["Label".to_string(), "Value".to_string()]];
                for (label, value) in chart.labels.iter().zip(chart.values.iter()) {
                    rows.push(vec![label.clone(), value.to_string()]);
                }
                Some(TableData {
                    title: Some(chart.title.clone()),
                    rows,
                })
            }
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableContent> {
        match self {
            RichContent::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartContent> {
        match self {
            RichContent::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn as_study_quiz(&self) -> Option<&StudyQuizContent> {
        match self {
            RichContent::StudyQuiz(quiz) => Some(quiz),
            _ => None,
        }
    }
}

impl TableContent {
    fn validate(&self) -> RenderResult<()> {
        if self.data.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "table requires at least a header row".to_string(),
            ));
        }
        let width = self.data[0].len();
        if width == 0 {
            return Err(RenderError::InvalidEnvelope(
                "table header row is empty".to_string(),
            ));
        }
        if self.data.iter().any(|row| row.len() != width) {
            return Err(RenderError::InvalidEnvelope(
                "table rows must match the header width".to_string(),
            ));
        }
        Ok(())
    }
}

impl ChartContent {
    fn validate(&self) -> RenderResult<()> {
        if self.labels.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "chart requires at least one label".to_string(),
            ));
        }
        if self.labels.len() != self.values.len() {
            return Err(RenderError::InvalidEnvelope(format!(
                "chart has {} labels but {} values",
                self.labels.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

impl ReportContent {
    fn validate(&self) -> RenderResult<()> {
        if self.sections.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "report requires at least one section".to_string(),
            ));
        }
        Ok(())
    }
}

impl NewsReportContent {
    fn validate(&self) -> RenderResult<()> {
        if self.articles.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "news report requires at least one article".to_string(),
            ));
        }
        Ok(())
    }
}

impl ResumeContent {
    fn validate(&self) -> RenderResult<()> {
        if self.name.trim().is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "resume requires a name".to_string(),
            ));
        }
        Ok(())
    }
}

impl CodeProjectContent {
    fn validate(&self) -> RenderResult<()> {
        if self.files.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "code project requires at least one file".to_string(),
            ));
        }
        if self.files.iter().any(|file| file.path.trim().is_empty()) {
            return Err(RenderError::InvalidEnvelope(
                "code project file paths must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl StudyExplanationContent {
    fn validate(&self) -> RenderResult<()> {
        if self.topic.trim().is_empty() || self.explanation.trim().is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "study explanation requires a topic and an explanation".to_string(),
            ));
        }
        Ok(())
    }
}

impl StudyReviewContent {
    fn validate(&self) -> RenderResult<()> {
        if self.flashcards.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "study review requires at least one flashcard".to_string(),
            ));
        }
        if self
            .flashcards
            .iter()
            .any(|card| card.front.trim().is_empty() || card.back.trim().is_empty())
        {
            return Err(RenderError::InvalidEnvelope(
                "study review flashcards must have a front and a back".to_string(),
            ));
        }
        Ok(())
    }
}

impl StudyQuizContent {
    fn validate(&self) -> RenderResult<()> {
        if self.quiz.is_empty() {
            return Err(RenderError::InvalidEnvelope(
                "quiz requires at least one question".to_string(),
            ));
        }
        for (index, question) in self.quiz.iter().enumerate() {
            question.validate().map_err(|e| {
                RenderError::InvalidEnvelope(format!("quiz question {index}: {e}"))
            })?;
        }
        Ok(())
    }
}

impl QuizQuestion {
    fn validate(&self) -> RenderResult<()> {
        match self.question_type {
            QuestionType::MultipleChoice => {
                let options = self.options.as_ref().ok_or_else(|| {
                    RenderError::InvalidEnvelope(
                        "multiple choice question requires options".to_string(),
                    )
                })?;
                if options.len() < 2 {
                    return Err(RenderError::InvalidEnvelope(
                        "multiple choice question requires at least two options".to_string(),
                    ));
                }
                match &self.correct_answer {
                    QuizAnswer::Index(index) => {
                        if *index < 0 || *index as usize >= options.len() {
                            return Err(RenderError::InvalidEnvelope(format!(
                                "correctAnswer index {index} is outside the {} options",
                                options.len()
                            )));
                        }
                    }
                    QuizAnswer::Text(text) => {
                        if !options.iter().any(|option| option == text) {
                            return Err(RenderError::InvalidEnvelope(
                                "correctAnswer text does not match any option".to_string(),
                            ));
                        }
                    }
                }
            }
            // Short answers carry free text; either answer form is display text.
            QuestionType::ShortAnswer => {}
        }
        Ok(())
    }
}
