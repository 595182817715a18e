use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::ViewerState;
use crate::ui::{
    panels::{self, CharacterGridAction, EpisodeListAction, EPISODE_PANEL_WIDTH},
    portraits::PortraitBoard,
    widgets::PageNavigation,
};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub base_url: String,
}

pub struct ViewerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    state: ViewerState,
    portraits: PortraitBoard,

    base_url: String,
    status: String,
    startup_error: Option<UiError>,
    mounted: bool,
}

impl ViewerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: ViewerState::default(),
            portraits: PortraitBoard::default(),
            base_url: startup.base_url,
            status: "Starting".to_string(),
            startup_error: None,
            mounted: false,
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(cmd) = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.settle_unsent(cmd);
        }
    }

    /// A command that never reached the backend fails its pane right away,
    /// so the pane stops loading and offers a retry.
    fn settle_unsent(&mut self, cmd: BackendCommand) {
        let reason = self.status.clone();
        match cmd {
            BackendCommand::LoadEpisodes(request) => {
                self.state.apply_episodes(
                    request.generation,
                    request.page,
                    Err(UiError::from_message(UiErrorContext::EpisodeList, reason)),
                );
            }
            BackendCommand::LoadCharacters(request) => {
                self.state.apply_characters(
                    request.generation,
                    Err(UiError::from_message(UiErrorContext::CharacterGrid, reason)),
                );
            }
            BackendCommand::FetchPortrait { character_id, .. } => {
                self.portraits.failed(character_id, reason);
            }
        }
    }

    fn ensure_mounted(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        let request = self.state.mount();
        self.dispatch(BackendCommand::LoadEpisodes(request));
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.status = err.summary();
                    if err.context() == UiErrorContext::BackendStartup {
                        self.startup_error = Some(err);
                    }
                }
                UiEvent::EpisodesLoaded {
                    generation,
                    page,
                    result,
                } => {
                    if let Some(request) = self.state.apply_episodes(generation, page, result) {
                        self.portraits.clear();
                        self.dispatch(BackendCommand::LoadCharacters(request));
                    }
                }
                UiEvent::CharactersLoaded { generation, result } => {
                    if self.state.apply_characters(generation, result) {
                        self.request_portraits();
                    }
                }
                UiEvent::PortraitLoaded {
                    character_id,
                    image,
                } => {
                    self.portraits.loaded(character_id, image);
                }
                UiEvent::PortraitFailed {
                    character_id,
                    reason,
                } => {
                    tracing::debug!(character_id = character_id.0, "portrait unavailable: {reason}");
                    self.portraits.failed(character_id, reason);
                }
            }
        }
    }

    fn request_portraits(&mut self) {
        let wanted: Vec<BackendCommand> = self
            .portraits
            .sync_page(self.state.characters.characters())
            .into_iter()
            .map(|character| BackendCommand::FetchPortrait {
                character_id: character.id,
                image_url: character.image_url.clone(),
            })
            .collect();
        tracing::debug!(
            requested = wanted.len(),
            tracked = self.portraits.len(),
            "requesting portraits"
        );
        for cmd in wanted {
            self.dispatch(cmd);
        }
    }

    fn handle_episode_action(&mut self, action: EpisodeListAction) {
        let request = match action {
            EpisodeListAction::Select(episode_id) => {
                if let Some(request) = self.state.select_episode(episode_id) {
                    self.portraits.clear();
                    self.dispatch(BackendCommand::LoadCharacters(request));
                }
                return;
            }
            EpisodeListAction::Navigate(PageNavigation::Previous) => self.state.episodes.prev_page(),
            EpisodeListAction::Navigate(PageNavigation::Next) => self.state.episodes.next_page(),
            EpisodeListAction::Navigate(PageNavigation::Page(page)) => {
                self.state.episodes.go_to_page(page)
            }
            EpisodeListAction::Retry => self.state.episodes.retry(),
        };
        if let Some(request) = request {
            self.dispatch(BackendCommand::LoadEpisodes(request));
        }
    }

    fn handle_grid_action(&mut self, action: CharacterGridAction) {
        let request = match action {
            CharacterGridAction::Navigate(PageNavigation::Previous) => {
                self.state.characters.prev_page()
            }
            CharacterGridAction::Navigate(PageNavigation::Next) => {
                self.state.characters.next_page()
            }
            CharacterGridAction::Navigate(PageNavigation::Page(page)) => {
                self.state.characters.go_to_page(page)
            }
            CharacterGridAction::Retry => self.state.characters.retry(),
        };
        if let Some(request) = request {
            self.dispatch(BackendCommand::LoadCharacters(request));
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_mounted();
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(&self.base_url).weak());
                });
            });
        });

        let mut episode_action = None;
        egui::SidePanel::left("episode_list_panel")
            .default_width(EPISODE_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                episode_action =
                    panels::episode_list(ui, &self.state.episodes, self.state.selected_episode());
            });

        let mut grid_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.startup_error {
                ui.colored_label(ui.visuals().error_fg_color, err.summary());
                ui.add_space(6.0);
            }
            grid_action = panels::character_grid(ui, &self.state.characters, &mut self.portraits);
        });

        if let Some(action) = episode_action {
            self.handle_episode_action(action);
        }
        if let Some(action) = grid_action {
            self.handle_grid_action(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::{bounded, Receiver, Sender};
    use shared::{
        domain::{
            Character, CharacterId, CharacterPage, Episode, EpisodeId, EpisodePage, PageInfo,
        },
        paging::local_page_info,
    };

    use super::*;
    use crate::controller::reducer::CharacterRequest;

    struct Harness {
        app: ViewerApp,
        cmd_rx: Receiver<BackendCommand>,
        ui_tx: Sender<UiEvent>,
    }

    fn harness() -> Harness {
        let (cmd_tx, cmd_rx) = bounded(64);
        let (ui_tx, ui_rx) = bounded(64);
        let app = ViewerApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                base_url: "http://catalog.test/api".to_string(),
            },
        );
        Harness { app, cmd_rx, ui_tx }
    }

    fn drain(rx: &Receiver<BackendCommand>) -> Vec<BackendCommand> {
        rx.try_iter().collect()
    }

    fn episodes() -> EpisodePage {
        EpisodePage {
            results: (1..=2)
                .map(|id| Episode {
                    id: EpisodeId(id),
                    name: format!("Episode {id}"),
                    episode_code: format!("S01E0{id}"),
                    air_date: String::new(),
                })
                .collect(),
            page_info: PageInfo {
                total_pages: 1,
                total_count: 2,
                ..PageInfo::default()
            },
        }
    }

    fn characters(episode_id: EpisodeId, count: usize) -> CharacterPage {
        CharacterPage {
            episode_id,
            page: 1,
            characters: (1..=count as i64)
                .map(|id| Character {
                    id: CharacterId(id),
                    name: format!("Character {id}"),
                    image_url: format!("http://catalog.test/avatar/{id}.jpeg"),
                    status: String::new(),
                    species: String::new(),
                })
                .collect(),
            total_count: count as u32,
            page_info: local_page_info(count, 1, 20),
        }
    }

    #[test]
    fn mount_loads_first_page_then_default_episode_then_portraits() {
        let mut h = harness();
        h.app.ensure_mounted();
        h.app.ensure_mounted();

        let commands = drain(&h.cmd_rx);
        assert_eq!(commands.len(), 1, "mount issues a single fetch");
        let BackendCommand::LoadEpisodes(request) = &commands[0] else {
            panic!("expected LoadEpisodes");
        };
        assert_eq!(request.page, 1);

        h.ui_tx
            .send(UiEvent::EpisodesLoaded {
                generation: request.generation,
                page: 1,
                result: Ok(episodes()),
            })
            .expect("send");
        h.app.process_ui_events();

        let commands = drain(&h.cmd_rx);
        assert_eq!(commands.len(), 1);
        let BackendCommand::LoadCharacters(grid_request) = &commands[0] else {
            panic!("expected LoadCharacters");
        };
        assert_eq!(grid_request.episode_id, EpisodeId(1));
        assert_eq!(h.app.state.selected_episode(), Some(EpisodeId(1)));

        h.ui_tx
            .send(UiEvent::CharactersLoaded {
                generation: grid_request.generation,
                result: Ok(characters(EpisodeId(1), 3)),
            })
            .expect("send");
        h.app.process_ui_events();

        let portrait_requests = drain(&h.cmd_rx)
            .into_iter()
            .filter(|cmd| matches!(cmd, BackendCommand::FetchPortrait { .. }))
            .count();
        assert_eq!(portrait_requests, 3);
    }

    #[test]
    fn stale_character_results_request_no_portraits() {
        let mut h = harness();
        h.app.handle_episode_action(EpisodeListAction::Select(EpisodeId(1)));
        h.app.handle_episode_action(EpisodeListAction::Select(EpisodeId(2)));
        let commands = drain(&h.cmd_rx);
        let generations: Vec<u64> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                BackendCommand::LoadCharacters(request) => Some(request.generation),
                _ => None,
            })
            .collect();
        assert_eq!(generations.len(), 2);

        h.ui_tx
            .send(UiEvent::CharactersLoaded {
                generation: generations[0],
                result: Ok(characters(EpisodeId(1), 5)),
            })
            .expect("send");
        h.app.process_ui_events();

        assert!(drain(&h.cmd_rx).is_empty());
        assert!(h.app.state.characters.is_loading());
    }

    #[test]
    fn unsent_commands_fail_their_pane_instead_of_loading_forever() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded(1);
        let mut app = ViewerApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                base_url: "http://catalog.test/api".to_string(),
            },
        );
        app.ensure_mounted();
        assert!(app.state.episodes.is_loading());

        app.handle_episode_action(EpisodeListAction::Select(EpisodeId(3)));
        assert!(app.status.contains("queue is full"));
        assert!(!app.state.characters.is_loading());
        assert!(app
            .state
            .characters
            .error()
            .is_some_and(|message| message.contains("queue is full")));

        drain(&cmd_rx);
        app.handle_episode_action(EpisodeListAction::Select(EpisodeId(3)));
        let commands = drain(&cmd_rx);
        assert!(matches!(
            commands.as_slice(),
            [BackendCommand::LoadCharacters(CharacterRequest {
                episode_id: EpisodeId(3),
                ..
            })]
        ));
        assert!(app.state.characters.is_loading());
    }

    #[test]
    fn disconnected_backend_fails_the_episode_list() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded(1);
        drop(cmd_rx);
        let mut app = ViewerApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                base_url: "http://catalog.test/api".to_string(),
            },
        );
        app.ensure_mounted();

        assert!(!app.state.episodes.is_loading());
        assert!(app.state.episodes.error().is_some());
    }

    #[test]
    fn startup_failure_is_kept_for_display() {
        let mut h = harness();
        h.ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "invalid base url 'nope'",
            )))
            .expect("send");
        h.app.process_ui_events();

        assert!(h.app.startup_error.is_some());
        assert!(h.app.status.contains("invalid base url"));
    }
}
