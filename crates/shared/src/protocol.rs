use serde::{Deserialize, Serialize};

use crate::domain::{Episode, EpisodeId, EpisodePage, PageInfo, PageRef};

/// `info` block of every paginated catalog listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListInfo {
    #[serde(default)]
    pub count: u32,
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

impl From<ListInfo> for PageInfo {
    fn from(info: ListInfo) -> Self {
        Self {
            next: info.next.map(PageRef::Link),
            prev: info.prev.map(PageRef::Link),
            total_pages: info.pages,
            total_count: info.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeListResponse {
    pub info: ListInfo,
    pub results: Vec<Episode>,
}

impl From<EpisodeListResponse> for EpisodePage {
    fn from(response: EpisodeListResponse) -> Self {
        Self {
            results: response.results,
            page_info: response.info.into(),
        }
    }
}

/// Single-episode record; only the fields the viewer needs beyond [`Episode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub id: EpisodeId,
    #[serde(default)]
    pub characters: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_maps_links_to_page_refs() {
        let raw = r#"{
            "info": {
                "count": 51,
                "pages": 3,
                "next": "https://rickandmortyapi.com/api/episode?page=2",
                "prev": null
            },
            "results": [
                {"id": 1, "name": "Pilot", "episode": "S01E01", "air_date": "December 2, 2013"},
                {"id": 2, "name": "Lawnmower Dog", "episode": "S01E02"}
            ]
        }"#;
        let page: EpisodePage = serde_json::from_str::<EpisodeListResponse>(raw)
            .expect("decode list")
            .into();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.page_info.total_pages, 3);
        assert_eq!(page.page_info.total_count, 51);
        assert_eq!(
            page.page_info.next.as_ref().and_then(PageRef::page_number),
            Some(2)
        );
        assert!(!page.page_info.has_prev());
    }

    #[test]
    fn episode_detail_ignores_unused_fields() {
        let detail: EpisodeDetail = serde_json::from_str(
            r#"{"id":28,"name":"The Ricklantis Mixup","characters":["https://x.test/character/1"],"url":"u","created":"c"}"#,
        )
        .expect("decode detail");
        assert_eq!(detail.id, EpisodeId(28));
        assert_eq!(detail.characters.len(), 1);
    }
}
