use brant::models::content::RichContentKind;
use brant::models::message::ChunkPayload;
use brant::models::source::GroundingSource;
use brant::render;
use brant::stream::{drive, StreamAccumulator, StreamChunkSource, StreamEvent};
use futures::{stream, StreamExt};
use indoc::indoc;

fn feed(parts: &[&str]) -> StreamAccumulator {
    let mut accumulator = StreamAccumulator::new();
    for part in parts {
        accumulator
            .append(ChunkPayload::text(*part))
            .expect("append while streaming");
    }
    accumulator
}

fn final_html(parts: &[&str]) -> String {
    let mut accumulator = StreamAccumulator::new();
    let mut html = String::new();
    for part in parts {
        html = accumulator
            .append(ChunkPayload::text(*part))
            .expect("append while streaming")
            .html();
    }
    html
}

#[test]
fn chunked_render_equals_one_shot_render() {
    let text = indoc! {"
        # Report

        Numbers for **Q3** are in:

        |Region|Total|
        |-|-|
        |West|41|

        ```py
        print(sum(totals))
        ```

        > see the *appendix*
    "};

    let splits: Vec<Vec<&str>> = vec![
        text.split_inclusive('\n').collect(),
        vec![&text[..7], &text[7..]],
        vec![&text[..1], &text[1..40], &text[40..]],
    ];
    let expected = render::render_html(text);
    for parts in splits {
        assert_eq!(final_html(&parts), expected);
    }
}

#[test]
fn re_rendering_never_double_escapes() {
    let html = final_html(&["AT&T ", "< tests > ", "done"]);
    assert_eq!(html, render::render_html("AT&T < tests > done"));
    assert!(html.contains("AT&amp;T"));
    assert!(!html.contains("&amp;amp;"));
}

#[test]
fn table_appears_only_once_its_separator_exists() {
    let mut accumulator = feed(&["|A|B|\n"]);
    let before = accumulator
        .append(ChunkPayload::text(""))
        .expect("append while streaming");
    assert!(before
        .document
        .blocks
        .iter()
        .all(|block| matches!(block, render::Block::Paragraph { .. })));

    let after = accumulator
        .append(ChunkPayload::text("|-|-|\n|1|2|"))
        .expect("append while streaming");
    match &after.document.blocks[0] {
        render::Block::Table { data, .. } => {
            assert_eq!(data.rows, vec![vec!["A", "B"], vec!["1", "2"]]);
        }
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn unterminated_fence_is_literal_even_after_completion() {
    let mut accumulator = feed(&["```js\nconst x = 1;"]);
    let message = accumulator.complete().expect("first completion");
    let text = message.as_plain_text().expect("stays prose");
    let html = render::render_html(text);
    assert!(!html.contains("code-block"));
    assert!(html.contains("```js"));
}

#[test]
fn fence_closed_by_a_later_chunk_becomes_a_block() {
    let html = final_html(&["```js\nconst x", " = 1;\n", "```"]);
    assert!(html.contains("code-block"));
    assert!(html.contains("const x = 1;"));
}

#[test]
fn envelope_resolves_rich_and_discards_markdown() {
    let mut accumulator = feed(&[
        r#"{"type":"chart","title":"Sales","#,
        r#""chartType":"bar","labels":["Q1","Q2"],"values":[10,12]}"#,
    ]);
    let message = accumulator.complete().expect("completion");
    let rich = message.as_rich().expect("classified rich");
    assert_eq!(rich.kind(), RichContentKind::Chart);
    assert!(message.as_plain_text().is_none());
}

#[test]
fn prose_wrapped_envelope_still_classifies() {
    let mut accumulator = feed(&[
        "Here you go: ",
        r#"{"type":"resume","name":"Ada","summary":"Engineer","#,
        r#""experience":[],"education":[],"skills":["Rust"]}"#,
        " Anything else?",
    ]);
    let message = accumulator.complete().expect("completion");
    assert_eq!(
        message.as_rich().map(|rich| rich.kind()),
        Some(RichContentKind::Resume)
    );
}

#[test]
fn invalid_quiz_resolves_plain_with_full_text() {
    let text = r#"{"type":"study_quiz","topic":"G","quiz":[{"type":"multiple_choice","question":"Q?","options":["a","b","c"],"correctAnswer":5}]}"#;
    let mut accumulator = feed(&[text]);
    let message = accumulator.complete().expect("completion");
    assert_eq!(message.as_plain_text(), Some(text));
}

#[tokio::test]
async fn driven_stream_renders_each_chunk_then_resolves() {
    let parts = ["He", "llo **wo", "rld**"];
    let source = StreamChunkSource::new(stream::iter(
        parts
            .iter()
            .map(|part| Ok(ChunkPayload::text(*part)))
            .collect::<Vec<_>>(),
    ));
    let events: Vec<_> = drive(source).collect().await;

    let renders = events
        .iter()
        .filter(|event| matches!(event, Ok(StreamEvent::Render(_))))
        .count();
    assert_eq!(renders, parts.len());

    match events.last() {
        Some(Ok(StreamEvent::Resolved(message))) => {
            assert_eq!(message.as_plain_text(), Some("Hello **world**"));
        }
        other => panic!("expected resolution, got {other:?}"),
    }
}

#[tokio::test]
async fn driven_stream_carries_latest_sources_to_resolution() {
    let source = StreamChunkSource::new(stream::iter(vec![
        Ok(ChunkPayload::text("cited ")
            .with_sources(vec![GroundingSource::new("https://a.example", "A")])),
        Ok(ChunkPayload::text("claim")
            .with_sources(vec![GroundingSource::new("https://b.example", "B")])),
    ]));
    let events: Vec<_> = drive(source).collect().await;
    match events.last() {
        Some(Ok(StreamEvent::Resolved(message))) => {
            assert_eq!(message.sources.len(), 1);
            assert_eq!(message.sources[0].uri, "https://b.example");
        }
        other => panic!("expected resolution, got {other:?}"),
    }
}
