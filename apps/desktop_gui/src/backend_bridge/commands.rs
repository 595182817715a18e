//! Backend commands queued from UI to backend worker.

use shared::domain::CharacterId;

use crate::controller::reducer::{CharacterRequest, EpisodeRequest};

pub enum BackendCommand {
    LoadEpisodes(EpisodeRequest),
    LoadCharacters(CharacterRequest),
    FetchPortrait {
        character_id: CharacterId,
        image_url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadEpisodes(_) => "load_episodes",
            Self::LoadCharacters(_) => "load_characters",
            Self::FetchPortrait { .. } => "fetch_portrait",
        }
    }
}
