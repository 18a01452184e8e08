use crate::{
    domain::BoardState,
    error::{BoardError, Result},
    storage::{persist, Storage},
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

enum Message {
    Save(Arc<BoardState>),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Background writer that persists each committed board state
///
/// Mutation callers never wait on it: [`Autosave::listener`] only queues
/// the new state. Write failures are logged and dropped, so memory stays
/// ahead of disk rather than being rolled back.
pub struct Autosave {
    sender: mpsc::UnboundedSender<Message>,
    task: JoinHandle<()>,
}

impl Autosave {
    /// Starts the writer task on the current tokio runtime
    pub fn spawn(storage: Arc<dyn Storage>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(storage, receiver));
        Self { sender, task }
    }

    /// Subscriber to hand to [`crate::store::BoardStore::subscribe`]
    pub fn listener(&self) -> impl FnMut(&Arc<BoardState>) + Send + 'static {
        let sender = self.sender.clone();
        move |state: &Arc<BoardState>| {
            if sender.send(Message::Save(Arc::clone(state))).is_err() {
                warn!("autosave has stopped, board change was not persisted");
            }
        }
    }

    /// Waits until every state queued so far has been written (or has failed)
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(Message::Flush(ack))
            .map_err(|_| stopped())?;
        done.await.map_err(|_| stopped())
    }

    /// Writes whatever is queued, then stops the task
    pub async fn shutdown(self) -> Result<()> {
        // the task may already be gone; awaiting it below still succeeds
        let _ = self.sender.send(Message::Shutdown);
        self.task
            .await
            .map_err(|err| BoardError::StorageError(format!("autosave task failed: {}", err)))
    }
}

fn stopped() -> BoardError {
    BoardError::StorageError("autosave has stopped".to_string())
}

async fn run(storage: Arc<dyn Storage>, mut receiver: mpsc::UnboundedReceiver<Message>) {
    let mut held = None;
    loop {
        let message = match held.take() {
            Some(message) => message,
            None => match receiver.recv().await {
                Some(message) => message,
                None => break,
            },
        };

        match message {
            Message::Save(mut state) => {
                // a burst of commits is written once, as its newest state
                let mut skipped = 0usize;
                while let Ok(next) = receiver.try_recv() {
                    match next {
                        Message::Save(newer) => {
                            state = newer;
                            skipped += 1;
                        }
                        other => {
                            held = Some(other);
                            break;
                        }
                    }
                }
                if skipped > 0 {
                    debug!(skipped, "coalesced queued board states");
                }

                if let Err(err) = persist(storage.as_ref(), &state).await {
                    warn!(error = %err, "failed to persist board snapshot");
                }
            }
            Message::Flush(ack) => {
                let _ = ack.send(());
            }
            Message::Shutdown => break,
        }
    }
    debug!("autosave stopped");
}
