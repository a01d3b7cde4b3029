//! Maps a validated rich content variant to its dedicated view builder.
//!
//! Each builder consumes only its own variant's fields and emits semantic
//! markup; anything visual is the embedding surface's problem. A missing
//! builder renders a literal notice rather than failing, though validation
//! upstream should make that unreachable.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::models::content::{QuestionType, QuizAnswer, RichContent, RichContentKind};
use crate::render;
use crate::render::escape::escape_html;
use crate::render::node::{Block, Document};

/// Builds the view for exactly one rich content variant.
pub trait RichViewBuilder: Send + Sync {
    fn kind(&self) -> RichContentKind;
    fn build(&self, content: &RichContent) -> String;
}

pub fn unsupported_notice() -> String {
    "<p class=\"unsupported-content\">Unsupported content</p>".to_string()
}

/// Registry of view builders keyed by discriminant. Defaults cover the
/// whole closed set; callers may override individual builders.
pub struct ViewRegistry {
    builders: HashMap<RichContentKind, Box<dyn RichViewBuilder>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        ViewRegistry {
            builders: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = ViewRegistry::new();
        for kind in RichContentKind::iter() {
            registry.register(default_builder(kind));
        }
        registry
    }

    pub fn register(&mut self, builder: Box<dyn RichViewBuilder>) {
        self.builders.insert(builder.kind(), builder);
    }

    pub fn render(&self, content: &RichContent) -> String {
        match self.builders.get(&content.kind()) {
            Some(builder) => builder.build(content),
            None => {
                tracing::debug!(kind = %content.kind(), "no view builder registered");
                unsupported_notice()
            }
        }
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        ViewRegistry::with_defaults()
    }
}

fn default_builder(kind: RichContentKind) -> Box<dyn RichViewBuilder> {
    match kind {
        RichContentKind::Table => Box::new(TableView),
        RichContentKind::Chart => Box::new(ChartView),
        RichContentKind::Report => Box::new(ReportView),
        RichContentKind::NewsReport => Box::new(NewsReportView),
        RichContentKind::Resume => Box::new(ResumeView),
        RichContentKind::CodeProject => Box::new(CodeProjectView),
        RichContentKind::StudyExplanation => Box::new(StudyExplanationView),
        RichContentKind::StudyReview => Box::new(StudyReviewView),
        RichContentKind::StudyQuiz => Box::new(StudyQuizView),
    }
}

fn export_attr(content: &RichContent) -> String {
    match content.export_data() {
        Some(data) => {
            let json = serde_json::to_string(&data).unwrap_or_default();
            format!(" data-table=\"{}\"", escape_html(&json))
        }
        None => String::new(),
    }
}

pub struct TableView;

impl RichViewBuilder for TableView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::Table
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::Table(table) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<div class=\"rich-table\"{}><h3>{}</h3><table>",
            export_attr(content),
            escape_html(&table.title)
        );
        let mut rows = table.data.iter();
        if let Some(header) = rows.next() {
            html.push_str("<thead><tr>");
            for cell in header {
                html.push_str(&format!("<th>{}</th>", escape_html(cell)));
            }
            html.push_str("</tr></thead>");
        }
        html.push_str("<tbody>");
        for row in rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table></div>");
        html
    }
}

pub struct ChartView;

impl RichViewBuilder for ChartView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::Chart
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::Chart(chart) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<figure class=\"rich-chart\" data-chart-type=\"{}\"{}><figcaption>{}</figcaption><ul>",
            chart.chart_type.as_str(),
            export_attr(content),
            escape_html(&chart.title)
        );
        for (label, value) in chart.labels.iter().zip(chart.values.iter()) {
            html.push_str(&format!(
                "<li data-value=\"{value}\">{}: {value}</li>",
                escape_html(label)
            ));
        }
        html.push_str("</ul></figure>");
        html
    }
}

pub struct ReportView;

impl RichViewBuilder for ReportView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::Report
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::Report(report) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-report\" data-export=\"document\"><h2>{}</h2>",
            escape_html(&report.title)
        );
        for section in &report.sections {
            html.push_str(&format!(
                "<section><h3>{}</h3>{}</section>",
                escape_html(&section.heading),
                render::render_html(&section.body)
            ));
        }
        html.push_str("</article>");
        html
    }
}

pub struct NewsReportView;

impl RichViewBuilder for NewsReportView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::NewsReport
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::NewsReport(news) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-news\" data-export=\"document\"><h2>{}</h2><p>{}</p><ul class=\"articles\">",
            escape_html(&news.headline),
            escape_html(&news.summary)
        );
        for article in &news.articles {
            html.push_str(&format!(
                "<li><h3>{}</h3><span class=\"article-source\">{}</span><p>{}</p></li>",
                escape_html(&article.title),
                escape_html(&article.source),
                escape_html(&article.summary)
            ));
        }
        html.push_str("</ul></article>");
        html
    }
}

pub struct ResumeView;

impl RichViewBuilder for ResumeView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::Resume
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::Resume(resume) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-resume\" data-export=\"document\"><h2>{}</h2><p>{}</p>",
            escape_html(&resume.name),
            escape_html(&resume.summary)
        );
        if !resume.experience.is_empty() {
            html.push_str("<section class=\"experience\"><h3>Experience</h3><ul>");
            for entry in &resume.experience {
                html.push_str(&format!(
                    "<li><strong>{}</strong>, {} ({})</li>",
                    escape_html(&entry.role),
                    escape_html(&entry.company),
                    escape_html(&entry.period)
                ));
            }
            html.push_str("</ul></section>");
        }
        if !resume.education.is_empty() {
            html.push_str("<section class=\"education\"><h3>Education</h3><ul>");
            for entry in &resume.education {
                html.push_str(&format!(
                    "<li>{}, {} ({})</li>",
                    escape_html(&entry.degree),
                    escape_html(&entry.school),
                    escape_html(&entry.year)
                ));
            }
            html.push_str("</ul></section>");
        }
        if !resume.skills.is_empty() {
            html.push_str("<section class=\"skills\"><h3>Skills</h3><ul>");
            for skill in &resume.skills {
                html.push_str(&format!("<li>{}</li>", escape_html(skill)));
            }
            html.push_str("</ul></section>");
        }
        html.push_str("</article>");
        html
    }
}

pub struct CodeProjectView;

impl RichViewBuilder for CodeProjectView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::CodeProject
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::CodeProject(project) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-code-project\"><h2>{}</h2><p>{}</p>",
            escape_html(&project.name),
            escape_html(&project.description)
        );
        for file in &project.files {
            // reuse the fence emitter so files carry the same copy toolbar
            let fence = Document {
                blocks: vec![Block::CodeFence {
                    language: file.language.clone(),
                    code: file.content.clone(),
                }],
            };
            html.push_str(&format!(
                "<section class=\"project-file\"><h3>{}</h3>{}</section>",
                escape_html(&file.path),
                render::html::document_to_html(&fence)
            ));
        }
        html.push_str("</article>");
        html
    }
}

pub struct StudyExplanationView;

impl RichViewBuilder for StudyExplanationView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::StudyExplanation
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::StudyExplanation(explanation) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-study\" data-export=\"document\"><h2>{}</h2>{}",
            escape_html(&explanation.topic),
            render::render_html(&explanation.explanation)
        );
        if !explanation.key_points.is_empty() {
            html.push_str("<ul class=\"key-points\">");
            for point in &explanation.key_points {
                html.push_str(&format!("<li>{}</li>", escape_html(point)));
            }
            html.push_str("</ul>");
        }
        html.push_str("</article>");
        html
    }
}

pub struct StudyReviewView;

impl RichViewBuilder for StudyReviewView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::StudyReview
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::StudyReview(review) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-review\"><h2>{}</h2>",
            escape_html(&review.topic)
        );
        for card in &review.flashcards {
            html.push_str(&format!(
                "<div class=\"flashcard\"><div class=\"front\">{}</div><div class=\"back\">{}</div></div>",
                escape_html(&card.front),
                escape_html(&card.back)
            ));
        }
        html.push_str("</article>");
        html
    }
}

pub struct StudyQuizView;

impl RichViewBuilder for StudyQuizView {
    fn kind(&self) -> RichContentKind {
        RichContentKind::StudyQuiz
    }

    fn build(&self, content: &RichContent) -> String {
        let RichContent::StudyQuiz(quiz) = content else {
            return unsupported_notice();
        };
        let mut html = format!(
            "<article class=\"rich-quiz\"><h2>{}</h2><ol>",
            escape_html(&quiz.topic)
        );
        for question in &quiz.quiz {
            html.push_str(&format!("<li><p>{}</p>", escape_html(&question.question)));
            match question.question_type {
                QuestionType::MultipleChoice => {
                    if let Some(options) = &question.options {
                        html.push_str("<ul class=\"options\">");
                        for (index, option) in options.iter().enumerate() {
                            let correct = match &question.correct_answer {
                                QuizAnswer::Index(answer) => *answer == index as i64,
                                QuizAnswer::Text(answer) => answer == option,
                            };
                            if correct {
                                html.push_str(&format!(
                                    "<li data-correct=\"true\">{}</li>",
                                    escape_html(option)
                                ));
                            } else {
                                html.push_str(&format!("<li>{}</li>", escape_html(option)));
                            }
                        }
                        html.push_str("</ul>");
                    }
                }
                QuestionType::ShortAnswer => {
                    let answer = match &question.correct_answer {
                        QuizAnswer::Index(answer) => answer.to_string(),
                        QuizAnswer::Text(answer) => answer.clone(),
                    };
                    html.push_str(&format!(
                        "<p class=\"answer\">{}</p>",
                        escape_html(&answer)
                    ));
                }
            }
            html.push_str("</li>");
        }
        html.push_str("</ol></article>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: serde_json::Value) -> RichContent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_cover_every_kind() {
        let registry = ViewRegistry::with_defaults();
        for kind in RichContentKind::iter() {
            assert!(registry.builders.contains_key(&kind), "missing {kind}");
        }
    }

    #[test]
    fn empty_registry_renders_notice() {
        let registry = ViewRegistry::new();
        let table = content(json!({"type":"table","title":"T","data":[["a"]]}));
        assert_eq!(registry.render(&table), unsupported_notice());
    }

    #[test]
    fn registered_builder_overrides_default() {
        struct Fixed;
        impl RichViewBuilder for Fixed {
            fn kind(&self) -> RichContentKind {
                RichContentKind::Table
            }
            fn build(&self, _: &RichContent) -> String {
                "custom".to_string()
            }
        }
        let mut registry = ViewRegistry::with_defaults();
        registry.register(Box::new(Fixed));
        let table = content(json!({"type":"table","title":"T","data":[["a"]]}));
        assert_eq!(registry.render(&table), "custom");
    }

    #[test]
    fn table_view_escapes_cells_and_embeds_export_data() {
        let table = content(json!({
            "type": "table",
            "title": "T",
            "data": [["<b>H</b>"], ["v"]]
        }));
        let html = ViewRegistry::with_defaults().render(&table);
        assert!(html.contains("<th>&lt;b&gt;H&lt;/b&gt;</th>"));
        assert!(html.contains("<td>v</td>"));
        assert!(html.contains("data-table="));
    }

    #[test]
    fn chart_view_pairs_labels_with_values() {
        let chart = content(json!({
            "type": "chart",
            "title": "Sales",
            "chartType": "pie",
            "labels": ["Q1", "Q2"],
            "values": [1.5, 2.0]
        }));
        let html = ViewRegistry::with_defaults().render(&chart);
        assert!(html.contains("data-chart-type=\"pie\""));
        assert!(html.contains("<li data-value=\"1.5\">Q1: 1.5</li>"));
    }

    #[test]
    fn report_view_marks_document_export_surface() {
        let report = content(json!({
            "type": "report",
            "title": "R",
            "sections": [{"heading": "H", "body": "Some **bold** text"}]
        }));
        let html = ViewRegistry::with_defaults().render(&report);
        assert!(html.contains("data-export=\"document\""));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn news_view_lists_articles_with_their_outlet() {
        let news = content(json!({
            "type": "news_report",
            "headline": "Markets",
            "summary": "Up.",
            "articles": [{"title": "Rally", "source": "Wire", "summary": "Stocks rose."}]
        }));
        let html = ViewRegistry::with_defaults().render(&news);
        assert!(html.contains("rich-news"));
        assert!(html.contains("data-export=\"document\""));
        assert!(html.contains("<span class=\"article-source\">Wire</span>"));
    }

    #[test]
    fn study_explanation_view_renders_markdown_body_and_key_points() {
        let explanation = content(json!({
            "type": "study_explanation",
            "topic": "Osmosis",
            "explanation": "Water moves via **diffusion**.",
            "keyPoints": ["passive transport"]
        }));
        let html = ViewRegistry::with_defaults().render(&explanation);
        assert!(html.contains("<h2>Osmosis</h2>"));
        assert!(html.contains("<strong>diffusion</strong>"));
        assert!(html.contains("<ul class=\"key-points\"><li>passive transport</li></ul>"));
    }

    #[test]
    fn review_view_renders_both_card_sides() {
        let review = content(json!({
            "type": "study_review",
            "topic": "Verbs",
            "flashcards": [{"front": "ir", "back": "to go"}]
        }));
        let html = ViewRegistry::with_defaults().render(&review);
        assert!(html.contains("<div class=\"front\">ir</div>"));
        assert!(html.contains("<div class=\"back\">to go</div>"));
    }

    #[test]
    fn code_project_view_reuses_fence_toolbar() {
        let project = content(json!({
            "type": "code_project",
            "name": "demo",
            "description": "d",
            "files": [{"path": "src/main.rs", "language": "rust", "content": "fn main() {}"}]
        }));
        let html = ViewRegistry::with_defaults().render(&project);
        assert!(html.contains("<h3>src/main.rs</h3>"));
        assert!(html.contains("code-copy"));
        assert!(html.contains("language-rust"));
    }

    #[test]
    fn quiz_view_marks_the_correct_option() {
        let quiz = content(json!({
            "type": "study_quiz",
            "topic": "Geo",
            "quiz": [{
                "type": "multiple_choice",
                "question": "Capital of France?",
                "options": ["Lyon", "Paris"],
                "correctAnswer": 1
            }]
        }));
        let html = ViewRegistry::with_defaults().render(&quiz);
        assert!(html.contains("<li>Lyon</li>"));
        assert!(html.contains("<li data-correct=\"true\">Paris</li>"));
    }
}
