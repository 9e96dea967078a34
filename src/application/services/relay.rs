use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::domain::{ports::TokenStream, ChatError};

/// Guarantees the close transition is observed exactly once on every exit
/// path: normal completion, upstream error, or the caller dropping the
/// output stream mid-flight (client disconnect).
struct StreamGuard {
    fragments: usize,
    finished: bool,
}

impl StreamGuard {
    fn new() -> Self {
        Self {
            fragments: 0,
            finished: false,
        }
    }

    fn finish(&mut self, outcome: &'static str) {
        self.finished = true;
        debug!(fragments = self.fragments, outcome, "Stream closed");
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                fragments = self.fragments,
                "Stream dropped before completion"
            );
        }
    }
}

/// Forwards model fragments to the response channel in production order.
///
/// Fragments are encoded to bytes one at a time; the full response is never
/// buffered. Empty fragments are skipped. The first upstream error ends the
/// stream as `StreamInterrupted` with nothing emitted after it; there are no
/// retries at this layer. Dropping the returned stream releases the upstream
/// sequence.
pub fn relay(mut upstream: TokenStream) -> impl Stream<Item = Result<Bytes, ChatError>> {
    stream! {
        let mut guard = StreamGuard::new();

        while let Some(fragment) = upstream.next().await {
            match fragment {
                Ok(text) if text.is_empty() => continue,
                Ok(text) => {
                    guard.fragments += 1;
                    yield Ok(Bytes::from(text));
                }
                Err(e) => {
                    guard.finish("failed");
                    let e = match e {
                        interrupted @ ChatError::StreamInterrupted(_) => interrupted,
                        other => ChatError::interrupted(other.to_string()),
                    };
                    yield Err(e);
                    return;
                }
            }
        }

        guard.finish("completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn upstream(items: Vec<Result<String, ChatError>>) -> TokenStream {
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn relays_fragments_in_order_then_closes() {
        let source = upstream(vec![
            Ok("Pro".to_string()),
            Ok("f".to_string()),
            Ok("X".to_string()),
        ]);

        let chunks: Vec<_> = relay(source).collect().await;
        let bytes: Vec<Bytes> = chunks.into_iter().map(|c| c.unwrap()).collect();

        assert_eq!(bytes, vec![Bytes::from("Pro"), Bytes::from("f"), Bytes::from("X")]);
    }

    #[tokio::test]
    async fn skips_empty_fragments() {
        let source = upstream(vec![
            Ok(String::new()),
            Ok("a".to_string()),
            Ok(String::new()),
            Ok("b".to_string()),
        ]);

        let bytes: Vec<Bytes> = relay(source).map(|c| c.unwrap()).collect().await;
        assert_eq!(bytes, vec![Bytes::from("a"), Bytes::from("b")]);
    }

    #[tokio::test]
    async fn upstream_error_is_terminal_after_emitted_fragments() {
        let source = upstream(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Err(ChatError::generation_start("boom")),
            Ok("never".to_string()),
        ]);

        let items: Vec<_> = relay(source).collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("one"));
        assert_eq!(items[1].as_ref().unwrap(), &Bytes::from("two"));
        assert!(matches!(
            items[2].as_ref().unwrap_err(),
            ChatError::StreamInterrupted(_)
        ));
    }

    #[tokio::test]
    async fn interrupted_errors_pass_through_without_rewrapping() {
        let source = upstream(vec![
            Ok("partial".to_string()),
            Err(ChatError::interrupted("model hiccup")),
        ]);

        let items: Vec<_> = relay(source).collect().await;

        let err = items[1].as_ref().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Generation interrupted mid-stream: model hiccup"
        );
    }

    #[tokio::test]
    async fn empty_upstream_closes_without_output() {
        let items: Vec<_> = relay(upstream(vec![])).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn dropping_relay_releases_upstream() {
        let source = upstream(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let mut relayed = Box::pin(relay(source));

        let first = relayed.next().await.unwrap().unwrap();
        assert_eq!(first, Bytes::from("a"));
        drop(relayed);
    }
}
