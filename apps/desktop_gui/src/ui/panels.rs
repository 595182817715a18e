//! The two panes of the viewer. Panels only read state and report what the
//! user clicked; the app applies the action.

use eframe::egui;
use shared::domain::EpisodeId;

use crate::controller::reducer::{CharacterGridState, EpisodeListState};
use crate::ui::{
    portraits::{texture_for, PortraitBoard, PortraitState},
    widgets::{character_card, pagination_bar, PageNavigation, PortraitView, CARD_WIDTH},
};

pub const EPISODE_PANEL_WIDTH: f32 = 300.0;
const GRID_SPACING: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeListAction {
    Select(EpisodeId),
    Navigate(PageNavigation),
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterGridAction {
    Navigate(PageNavigation),
    Retry,
}

fn error_row(ui: &mut egui::Ui, message: &str) -> bool {
    let mut retry = false;
    ui.horizontal_wrapped(|ui| {
        ui.colored_label(ui.visuals().error_fg_color, message);
        retry = ui.button("Retry").clicked();
    });
    retry
}

pub fn episode_list(
    ui: &mut egui::Ui,
    state: &EpisodeListState,
    selected: Option<EpisodeId>,
) -> Option<EpisodeListAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.heading("Episodes");
        if state.total_pages() > 0 {
            ui.small(
                egui::RichText::new(format!(
                    "Page {} of {}",
                    state.current_page(),
                    state.total_pages()
                ))
                .weak(),
            );
        }
    });
    ui.add_space(6.0);

    egui::TopBottomPanel::bottom("episode_pagination")
        .show_separator_line(false)
        .show_inside(ui, |ui| {
            ui.add_space(6.0);
            if let Some(nav) = pagination_bar(
                ui,
                &state.page_items(),
                state.prev_enabled(),
                state.next_enabled(),
            ) {
                action = Some(EpisodeListAction::Navigate(nav));
            }
        });

    if let Some(message) = state.error() {
        if error_row(ui, message) {
            action = Some(EpisodeListAction::Retry);
        }
        ui.add_space(4.0);
    }
    if state.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading episodes…");
        });
    }

    egui::ScrollArea::vertical()
        .id_salt("episode_list_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for episode in state.episodes() {
                let is_selected = selected == Some(episode.id);
                let mut response = ui.selectable_label(is_selected, episode.display_label());
                if !episode.air_date.is_empty() {
                    response = response.on_hover_text(format!("Aired {}", episode.air_date));
                }
                if response.clicked() {
                    action = Some(EpisodeListAction::Select(episode.id));
                }
            }
        });

    action
}

pub fn character_grid(
    ui: &mut egui::Ui,
    state: &CharacterGridState,
    portraits: &mut PortraitBoard,
) -> Option<CharacterGridAction> {
    let mut action = None;

    ui.heading("Characters");
    if let Some(episode_id) = state.episode_id() {
        if !state.is_loading() && state.error().is_none() {
            ui.small(
                egui::RichText::new(format!(
                    "Episode {episode_id} · {} characters · page {} of {}",
                    state.total_count(),
                    state.current_page(),
                    state.total_pages().max(1)
                ))
                .weak(),
            );
        }
    }
    ui.add_space(6.0);

    egui::TopBottomPanel::bottom("character_pagination")
        .show_separator_line(false)
        .show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                if let Some(nav) = pagination_bar(
                    ui,
                    &state.page_items(),
                    state.prev_enabled(),
                    state.next_enabled(),
                ) {
                    action = Some(CharacterGridAction::Navigate(nav));
                }
            });
        });

    if state.episode_id().is_none() {
        ui.label("Select an episode to see its characters.");
        return action;
    }
    if state.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
        return action;
    }
    if let Some(message) = state.error() {
        if error_row(ui, message) {
            action = Some(CharacterGridAction::Retry);
        }
        return action;
    }
    if state.characters().is_empty() {
        ui.label("No characters found");
        return action;
    }

    let columns = ((ui.available_width() + GRID_SPACING) / (CARD_WIDTH + GRID_SPACING))
        .floor()
        .max(1.0) as usize;
    let ctx = ui.ctx().clone();

    egui::ScrollArea::vertical()
        .id_salt("character_grid_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("character_grid")
                .spacing([GRID_SPACING, GRID_SPACING])
                .show(ui, |ui| {
                    for (index, character) in state.characters().iter().enumerate() {
                        let view = match portraits.state_mut(character.id) {
                            Some(portrait @ PortraitState::Ready { .. }) => {
                                match texture_for(&ctx, character.id, portrait) {
                                    Some(texture) => PortraitView::Ready(texture),
                                    None => PortraitView::Unavailable,
                                }
                            }
                            Some(PortraitState::Failed(_)) => PortraitView::Unavailable,
                            Some(PortraitState::Loading) | None => PortraitView::Loading,
                        };
                        character_card(ui, character, view);
                        if (index + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
        });

    action
}
