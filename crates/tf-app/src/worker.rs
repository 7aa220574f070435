use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::thread::{self, JoinHandle};

use log::{info, warn};
use winit::event_loop::EventLoopProxy;

use tf_core::api::{GenerationRequest, HealthReport};
use tf_core::upload::UploadedImage;

use crate::api::ApiClient;
use crate::error::AppError;
use crate::events::{ApiEvent, TfEvent};

pub enum WorkerCommand {
    Generate {
        person: UploadedImage,
        style_guide: UploadedImage,
        request: GenerationRequest,
    },
    FetchPreview(String),
    Shutdown,
}

/// Runs HTTP against the generation service off the UI thread, reporting
/// back through the event loop proxy. Generation and preview fetches go
/// through a single command loop, which keeps at most one generation
/// request in flight. Health probes get their own short-lived threads so
/// the status badge still answers while a generation blocks the loop.
pub struct ApiWorker {
    client: ApiClient,
    event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,
    command_tx: Sender<WorkerCommand>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ApiWorker {
    pub fn new(client: ApiClient, event_loop_proxy: Arc<EventLoopProxy<TfEvent>>) -> Self {
        let (cmd_tx, cmd_rx) = channel::<WorkerCommand>();

        let loop_client = client.clone();
        let loop_proxy = event_loop_proxy.clone();

        let thread_handle = thread::spawn(move || {
            let emit = |event: ApiEvent| {
                // The event loop may already be gone during shutdown
                let _ = loop_proxy.send_event(TfEvent::Api(event));
            };

            loop {
                match cmd_rx.recv() {
                    Ok(WorkerCommand::Generate {
                        person,
                        style_guide,
                        request,
                    }) => match loop_client.generate(&person, &style_guide, &request) {
                        Ok(result) => emit(ApiEvent::Generated(result)),
                        Err(e) => emit(ApiEvent::GenerationFailed(e.user_message())),
                    },

                    Ok(WorkerCommand::FetchPreview(path)) => match loop_client.fetch(&path) {
                        Ok(bytes) => emit(ApiEvent::PreviewLoaded(Arc::new(bytes))),
                        Err(e) => {
                            warn!("could not fetch result image {path}: {e}");
                            emit(ApiEvent::PreviewFailed(e.user_message()));
                        }
                    },

                    Ok(WorkerCommand::Shutdown) | Err(_) => break,
                }
            }
        });

        Self {
            client,
            event_loop_proxy,
            command_tx: cmd_tx,
            thread_handle: Some(thread_handle),
        }
    }

    /// Probe the service on a thread of its own; the answer arrives as a
    /// `HealthOk`/`HealthFailed` event even while the command loop is busy.
    pub fn check_health(&self) {
        let proxy = self.event_loop_proxy.clone();
        spawn_health_probe(self.client.clone(), move |outcome| {
            let event = match outcome {
                Ok(report) => {
                    info!("service healthy (models ready: {})", report.models_ready());
                    ApiEvent::HealthOk(report)
                }
                Err(e) => {
                    warn!("health check failed: {e}");
                    ApiEvent::HealthFailed(e.user_message())
                }
            };
            let _ = proxy.send_event(TfEvent::Api(event));
        });
    }

    pub fn generate(
        &self,
        person: UploadedImage,
        style_guide: UploadedImage,
        request: GenerationRequest,
    ) -> Result<(), String> {
        self.send(WorkerCommand::Generate {
            person,
            style_guide,
            request,
        })
    }

    pub fn fetch_preview(&self, path: String) -> Result<(), String> {
        self.send(WorkerCommand::FetchPreview(path))
    }

    fn send(&self, command: WorkerCommand) -> Result<(), String> {
        self.command_tx
            .send(command)
            .map_err(|e| format!("failed to reach API worker: {e}"))
    }

    pub fn shutdown(&mut self) {
        let _ = self.command_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ApiWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_health_probe<F>(client: ApiClient, report: F) -> JoinHandle<()>
where
    F: FnOnce(Result<HealthReport, AppError>) + Send + 'static,
{
    thread::spawn(move || report(client.health()))
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::Duration;

    use url::Url;

    use super::*;

    // Nothing listens on the discard port, so the probe fails fast with a
    // connection error instead of waiting out its deadline.
    #[test]
    fn test_health_probe_answers_off_the_command_loop() {
        let base = Url::parse("http://127.0.0.1:9/").unwrap();
        let client = ApiClient::new(base).unwrap();

        let (tx, rx) = channel();
        let handle = spawn_health_probe(client, move |outcome| {
            let _ = tx.send(outcome.is_err());
        });

        let failed = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(failed);
        let _ = handle.join();
    }
}
