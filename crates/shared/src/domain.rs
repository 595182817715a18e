use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EpisodeId);
id_newtype!(CharacterId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub name: String,
    #[serde(rename = "episode")]
    pub episode_code: String,
    #[serde(default)]
    pub air_date: String,
}

impl Episode {
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.episode_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
}

/// A pagination token as handed out by the catalog: either a bare page
/// number or the absolute link the server returned in `info.next`/`info.prev`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRef {
    Number(u32),
    Link(String),
}

impl PageRef {
    /// Page number this token points at, reading the `page` query parameter
    /// for links. A link without one is the first page.
    pub fn page_number(&self) -> Option<u32> {
        match self {
            Self::Number(page) => Some(*page),
            Self::Link(link) => {
                let parsed = url::Url::parse(link).ok()?;
                let page = parsed
                    .query_pairs()
                    .find(|(key, _)| key == "page")
                    .map(|(_, value)| value.into_owned());
                match page {
                    Some(value) => value.parse().ok(),
                    None => Some(1),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub next: Option<PageRef>,
    pub prev: Option<PageRef>,
    pub total_pages: u32,
    pub total_count: u32,
}

impl PageInfo {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodePage {
    pub results: Vec<Episode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPage {
    pub episode_id: EpisodeId,
    pub page: u32,
    pub characters: Vec<Character>,
    pub total_count: u32,
    pub page_info: PageInfo,
}
