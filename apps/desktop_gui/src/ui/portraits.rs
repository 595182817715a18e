//! Character portraits: decoding fetched image bytes and tracking per-card
//! texture state for the page currently on screen.

use std::collections::{hash_map::Entry, HashMap};

use eframe::egui;
use shared::domain::{Character, CharacterId};

pub const PORTRAIT_MAX_EDGE: u32 = 256;

#[derive(Clone)]
pub struct PortraitImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_portrait(bytes: &[u8]) -> Result<PortraitImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    // Only shrink; small portraits keep their own size.
    let resized = if dynamic.width().max(dynamic.height()) > PORTRAIT_MAX_EDGE {
        dynamic.thumbnail(PORTRAIT_MAX_EDGE, PORTRAIT_MAX_EDGE)
    } else {
        dynamic
    }
    .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PortraitImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

pub enum PortraitState {
    Loading,
    Ready {
        image: PortraitImage,
        texture: Option<egui::TextureHandle>,
    },
    Failed(String),
}

#[derive(Default)]
pub struct PortraitBoard {
    states: HashMap<CharacterId, PortraitState>,
}

impl PortraitBoard {
    /// Keeps state only for `characters` and returns the ones whose
    /// portrait still has to be requested.
    pub fn sync_page<'a>(&mut self, characters: &'a [Character]) -> Vec<&'a Character> {
        self.states
            .retain(|id, _| characters.iter().any(|character| character.id == *id));
        let mut wanted = Vec::new();
        for character in characters {
            if let Entry::Vacant(slot) = self.states.entry(character.id) {
                slot.insert(PortraitState::Loading);
                wanted.push(character);
            }
        }
        wanted
    }

    /// Stores a decoded portrait if its card is still on screen.
    pub fn loaded(&mut self, character_id: CharacterId, image: PortraitImage) {
        if let Some(state) = self.states.get_mut(&character_id) {
            *state = PortraitState::Ready {
                image,
                texture: None,
            };
        }
    }

    pub fn failed(&mut self, character_id: CharacterId, reason: String) {
        if let Some(state) = self.states.get_mut(&character_id) {
            *state = PortraitState::Failed(reason);
        }
    }

    pub fn state_mut(&mut self, character_id: CharacterId) -> Option<&mut PortraitState> {
        self.states.get_mut(&character_id)
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}

/// Lazily uploads the decoded pixels as a texture and returns it.
pub fn texture_for(
    ctx: &egui::Context,
    character_id: CharacterId,
    state: &mut PortraitState,
) -> Option<egui::TextureHandle> {
    let PortraitState::Ready { image, texture } = state else {
        return None;
    };
    if texture.is_none() {
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        *texture = Some(ctx.load_texture(
            format!("character_portrait_{}", character_id.0),
            color_image,
            egui::TextureOptions::LINEAR,
        ));
    }
    texture.clone()
}
