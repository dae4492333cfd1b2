//! Per-cycle fetch tasks.
//!
//! Every navigation cycle owns one [`JoinSet`]. Starting a profile load
//! replaces the set, which aborts whatever the previous cycle still had in
//! flight. Results travel back to the UI loop over an unbounded channel and
//! carry their cycle generation so the reducer can drop late arrivals.

use crate::api::DeckClient;
use crate::app_core::state::{AppAction, CardRequest, FetchEvent};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

pub struct CycleTasks {
    client: DeckClient,
    events: UnboundedSender<FetchEvent>,
    tasks: JoinSet<()>,
}

impl CycleTasks {
    pub fn new(client: DeckClient, events: UnboundedSender<FetchEvent>) -> Self {
        Self {
            client,
            events,
            tasks: JoinSet::new(),
        }
    }

    /// Number of tasks started in the current cycle that have not been reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn dispatch(&mut self, action: AppAction) {
        match action {
            AppAction::LoadProfile {
                generation,
                user_id,
            } => {
                self.abort_all();
                tracing::debug!("[CYCLE] {} started for user {}", generation, user_id);
                let client = self.client.clone();
                let events = self.events.clone();
                self.tasks.spawn(async move {
                    let event = match client.fetch_profile(user_id).await {
                        Ok(profile) => FetchEvent::ProfileLoaded {
                            generation,
                            profile,
                        },
                        Err(error) => FetchEvent::ProfileFailed { generation, error },
                    };
                    let _ = events.send(event);
                });
            }
            AppAction::LoadCards {
                generation,
                requests,
            } => {
                for request in requests {
                    let client = self.client.clone();
                    let events = self.events.clone();
                    self.tasks
                        .spawn(paint_card(client, events, generation, request));
                }
            }
        }
    }

    pub fn abort_all(&mut self) {
        // Dropping the set aborts every task still in it.
        drop(std::mem::take(&mut self.tasks));
    }
}

/// Fetches one character, reports it, then fetches and reports its image.
async fn paint_card(
    client: DeckClient,
    events: UnboundedSender<FetchEvent>,
    generation: u64,
    request: CardRequest,
) {
    let CardRequest { slot, character_id } = request;

    let record = match client.fetch_character(character_id).await {
        Ok(record) => record,
        Err(error) => {
            let _ = events.send(FetchEvent::CharacterFailed {
                generation,
                slot,
                error,
            });
            return;
        }
    };

    let image_url = record.image.clone();
    if events
        .send(FetchEvent::CharacterLoaded {
            generation,
            slot,
            record,
        })
        .is_err()
    {
        return;
    }

    let event = match client.fetch_image(&image_url).await {
        Ok(texture) => FetchEvent::ImageLoaded {
            generation,
            slot,
            texture,
        },
        Err(error) => FetchEvent::ImageFailed {
            generation,
            slot,
            error,
        },
    };
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Answers successive connections with the given responses in order, then
    /// with 500. Returns the base URL and a count of requests served.
    async fn serve_sequence(
        responses: impl FnOnce(&str) -> Vec<(&'static str, Vec<u8>)>,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let mut responses = responses(&base).into_iter();
        let served = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&served);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                    let read = socket.read(&mut buf).await.unwrap_or(0);
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..read]);
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let (status_line, body) = responses
                    .next()
                    .unwrap_or(("HTTP/1.1 500 Internal Server Error", Vec::new()));
                let head = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });
        (base, served)
    }

    fn client_for(base: &str) -> DeckClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        DeckClient::with_client(http, base, base)
    }

    #[tokio::test]
    async fn test_paint_card_reports_character_then_image_failure() {
        let (base, served) = serve_sequence(|base| {
            let character = format!(
                r#"{{"id": 2, "name": "Morty Smith", "status": "Alive", "species": "Human", "image": "{base}/avatar/2.jpeg"}}"#
            );
            vec![
                ("HTTP/1.1 200 OK", character.into_bytes()),
                ("HTTP/1.1 404 Not Found", Vec::new()),
            ]
        })
        .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = CardRequest {
            slot: 1,
            character_id: 2,
        };

        paint_card(client_for(&base), tx, 7, request).await;

        match rx.recv().await.unwrap() {
            FetchEvent::CharacterLoaded {
                generation,
                slot,
                record,
            } => {
                assert_eq!((generation, slot), (7, 1));
                assert_eq!(record.name, "Morty Smith");
                assert_eq!(record.subtitle(), "Alive - Human");
            }
            other => panic!("expected character, got {other:?}"),
        }
        match rx.recv().await.unwrap() {
            FetchEvent::ImageFailed {
                generation,
                slot,
                error,
            } => {
                assert_eq!((generation, slot), (7, 1));
                match error {
                    FetchError::Status { url, status } => {
                        assert_eq!(status, 404);
                        assert!(url.ends_with("/avatar/2.jpeg"));
                    }
                    other => panic!("expected status error, got {other:?}"),
                }
            }
            other => panic!("expected image failure, got {other:?}"),
        }
        assert!(rx.recv().await.is_none());
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_paint_card_character_failure_skips_image() {
        let (base, served) =
            serve_sequence(|_| vec![("HTTP/1.1 404 Not Found", b"{}".to_vec())]).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = CardRequest {
            slot: 0,
            character_id: 9999,
        };

        paint_card(client_for(&base), tx, 3, request).await;

        match rx.recv().await.unwrap() {
            FetchEvent::CharacterFailed {
                generation,
                slot,
                error,
            } => {
                assert_eq!((generation, slot), (3, 0));
                assert!(matches!(error, FetchError::Status { status: 404, .. }));
            }
            other => panic!("expected character failure, got {other:?}"),
        }
        assert!(rx.recv().await.is_none());
        assert_eq!(served.load(Ordering::SeqCst), 1);
    }

    /// A server that accepts connections and never answers.
    async fn silent_server() -> (String, TcpListener) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (base, listener)
    }

    #[tokio::test]
    async fn test_new_profile_load_aborts_previous_cycle() {
        let (base, _listener) = silent_server().await;
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = DeckClient::with_client(http, &base, &base);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = CycleTasks::new(client, tx);

        tasks.dispatch(AppAction::LoadProfile {
            generation: 1,
            user_id: 1,
        });
        tasks.dispatch(AppAction::LoadCards {
            generation: 1,
            requests: vec![
                CardRequest {
                    slot: 0,
                    character_id: 1,
                },
                CardRequest {
                    slot: 1,
                    character_id: 2,
                },
            ],
        });
        assert_eq!(tasks.len(), 3);

        tasks.dispatch(AppAction::LoadProfile {
            generation: 2,
            user_id: 2,
        });
        assert_eq!(tasks.len(), 1);

        tasks.abort_all();
        assert!(tasks.is_empty());

        // Nothing from either cycle ever reports back.
        let received = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(received.is_err());
    }
}
