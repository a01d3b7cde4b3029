//! Owns the growing text buffer for one in-flight message.
//!
//! Every append re-runs the full markdown pipeline over the cumulative
//! buffer; block boundaries can shift as later chunks arrive (a table's
//! separator row may not exist yet), so nothing is patched incrementally.
//! Completion is terminal and triggers classification exactly once.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};

use crate::classify;
use crate::errors::{RenderError, RenderResult};
use crate::models::message::{ChunkPayload, Message};
use crate::models::source::GroundingSource;
use crate::render;
use crate::render::node::Document;

/// Where chunks come from. The network transport behind this seam is not
/// this crate's concern; anything that can hand over text fragments in
/// arrival order qualifies.
#[async_trait]
pub trait ChunkSource: Send {
    /// Returns the next chunk, or `None` once the stream is exhausted.
    async fn next_chunk(&mut self) -> anyhow::Result<Option<ChunkPayload>>;
}

/// Adapts any fallible `futures::Stream` of chunks into a [`ChunkSource`].
pub struct StreamChunkSource<S> {
    inner: S,
}

impl<S> StreamChunkSource<S> {
    pub fn new(inner: S) -> Self {
        StreamChunkSource { inner }
    }
}

#[async_trait]
impl<S> ChunkSource for StreamChunkSource<S>
where
    S: Stream<Item = anyhow::Result<ChunkPayload>> + Send + Unpin,
{
    async fn next_chunk(&mut self) -> anyhow::Result<Option<ChunkPayload>> {
        self.inner.next().await.transpose()
    }
}

/// One intermediate render of the partial buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub document: Document,
    pub sources: Vec<GroundingSource>,
}

impl RenderSnapshot {
    pub fn html(&self) -> String {
        render::html::document_to_html(&self.document)
    }
}

/// Events produced while driving a chunk source to resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The buffer grew and was re-rendered.
    Render(RenderSnapshot),
    /// The stream ended and the message was classified.
    Resolved(Message),
}

/// The two-state accumulator: `Streaming` accepts appends, `Complete` is
/// terminal. The buffer is append-only and owned by exactly one message.
pub struct StreamAccumulator {
    buffer: String,
    sources: Vec<GroundingSource>,
    complete: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        StreamAccumulator {
            buffer: String::new(),
            sources: Vec::new(),
            complete: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Appends a chunk and re-renders the whole buffer. A chunk's `sources`
    /// list, when present, replaces the carried one.
    pub fn append(&mut self, chunk: ChunkPayload) -> RenderResult<RenderSnapshot> {
        if self.complete {
            return Err(RenderError::StreamComplete(
                "cannot append to a completed message".to_string(),
            ));
        }
        self.buffer.push_str(&chunk.text);
        if let Some(sources) = chunk.sources {
            self.sources = sources;
        }
        tracing::trace!(buffer_len = self.buffer.len(), "appended chunk");
        Ok(RenderSnapshot {
            document: render::parse(&self.buffer),
            sources: self.sources.clone(),
        })
    }

    /// Seals the buffer and classifies it. Runs at most once; later calls
    /// and appends are rejected.
    pub fn complete(&mut self) -> RenderResult<Message> {
        if self.complete {
            return Err(RenderError::StreamComplete(
                "message was already classified".to_string(),
            ));
        }
        self.complete = true;
        let content = classify::classify(&self.buffer);
        tracing::debug!(rich = content.is_rich(), "stream resolved");
        Ok(Message::assistant(content).with_sources(self.sources.clone()))
    }
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        StreamAccumulator::new()
    }
}

/// Pulls a source dry, yielding a render after every chunk and the resolved
/// message at the end. Transport failures surface as stream errors.
pub fn drive<S>(source: S) -> BoxStream<'static, RenderResult<StreamEvent>>
where
    S: ChunkSource + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut source = source;
        let mut accumulator = StreamAccumulator::new();
        loop {
            let chunk = source
                .next_chunk()
                .await
                .map_err(|error| RenderError::Internal(error.to_string()))?;
            match chunk {
                Some(chunk) => {
                    let snapshot = accumulator.append(chunk)?;
                    yield StreamEvent::Render(snapshot);
                }
                None => break,
            }
        }
        let message = accumulator.complete()?;
        yield StreamEvent::Resolved(message);
    })
}
