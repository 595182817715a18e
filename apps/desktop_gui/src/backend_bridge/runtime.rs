//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{load_character_page, CatalogClient, CatalogSource, ClientConfig};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::portraits::decode_portrait;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: ClientConfig) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match CatalogClient::new(&config) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    tracing::error!("failed to build catalog client: {err}");
                    return;
                }
            };
            tracing::info!(base_url = client.base_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!("Browsing {}", client.base_url())));

            let source: Arc<dyn CatalogSource> = Arc::new(client);
            while let Ok(cmd) = cmd_rx.recv() {
                let source = Arc::clone(&source);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    handle_command(source.as_ref(), cmd, &ui_tx).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

/// Runs one command to completion and posts its outcome to the UI. Results
/// carry the generation of the request that produced them; the UI decides
/// whether they are still wanted.
pub async fn handle_command(
    source: &dyn CatalogSource,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    let event = match cmd {
        BackendCommand::LoadEpisodes(request) => {
            let result = source
                .fetch_episodes(request.page_ref.as_ref())
                .await
                .map_err(|err| UiError::from_fetch(UiErrorContext::EpisodeList, &err));
            UiEvent::EpisodesLoaded {
                generation: request.generation,
                page: request.page,
                result,
            }
        }
        BackendCommand::LoadCharacters(request) => {
            let result = load_character_page(source, request.episode_id, request.page)
                .await
                .map_err(|err| UiError::from_fetch(UiErrorContext::CharacterGrid, &err));
            UiEvent::CharactersLoaded {
                generation: request.generation,
                result,
            }
        }
        BackendCommand::FetchPortrait {
            character_id,
            image_url,
        } => match source.fetch_bytes(&image_url).await {
            Ok(bytes) => match decode_portrait(&bytes) {
                Ok(image) => UiEvent::PortraitLoaded {
                    character_id,
                    image,
                },
                Err(reason) => UiEvent::PortraitFailed {
                    character_id,
                    reason,
                },
            },
            Err(err) => UiEvent::PortraitFailed {
                character_id,
                reason: err.to_string(),
            },
        },
    };

    if ui_tx.send(event).is_err() {
        tracing::warn!("ui event queue closed; dropping backend result");
    }
}
