use serde::de::DeserializeOwned;
use serde_json::json;

use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::CratedigError;

use super::types::{
    Album, Artist, FeaturedPlaylistsResponse, Page, Playlist, SearchResponse, SnapshotResponse,
    TimeRange, Track, UserProfile,
};

/// Default page size for search and top-item queries.
const PAGE_LIMIT: usize = 20;

/// Typed wrappers over the provider's privileged endpoints. Every call
/// routes through the dispatcher; nothing here touches tokens directly.
pub struct MusicClient {
    dispatcher: Dispatcher,
    base_url: String,
}

impl MusicClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let base_url = dispatcher
            .session()
            .provider()
            .api_base_url
            .trim_end_matches('/')
            .to_string();
        Self {
            dispatcher,
            base_url,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Track>, CratedigError> {
        let resp: SearchResponse = self.get(&self.search_url(query, "track")).await?;
        Ok(resp.tracks.map(|page| page.items).unwrap_or_default())
    }

    pub async fn search_artists(&self, query: &str) -> Result<Vec<Artist>, CratedigError> {
        let resp: SearchResponse = self.get(&self.search_url(query, "artist")).await?;
        Ok(resp.artists.map(|page| page.items).unwrap_or_default())
    }

    pub async fn search_albums(&self, query: &str) -> Result<Vec<Album>, CratedigError> {
        let resp: SearchResponse = self.get(&self.search_url(query, "album")).await?;
        Ok(resp.albums.map(|page| page.items).unwrap_or_default())
    }

    pub async fn current_user(&self) -> Result<UserProfile, CratedigError> {
        self.get(&format!("{}/me", self.base_url)).await
    }

    pub async fn user_playlists(&self) -> Result<Vec<Playlist>, CratedigError> {
        let page: Page<Playlist> = self.get(&format!("{}/me/playlists", self.base_url)).await?;
        Ok(page.items)
    }

    /// Create a playlist owned by the current user. The provider keys
    /// playlist creation by user id, so the profile is resolved first.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist, CratedigError> {
        let user = self.current_user().await?;
        let request = ApiRequest::post(format!(
            "{}/users/{}/playlists",
            self.base_url,
            encode_query(&user.id)
        ))
        .json(json!({
            "name": name,
            "description": description,
            "public": public,
        }));
        self.send(request).await
    }

    pub async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<SnapshotResponse, CratedigError> {
        let request = ApiRequest::post(format!(
            "{}/playlists/{}/tracks",
            self.base_url,
            encode_query(playlist_id)
        ))
        .json(json!({ "uris": track_uris }));
        self.send(request).await
    }

    pub async fn featured_playlists(&self) -> Result<Vec<Playlist>, CratedigError> {
        let resp: FeaturedPlaylistsResponse = self
            .get(&format!("{}/browse/featured-playlists", self.base_url))
            .await?;
        Ok(resp.playlists.items)
    }

    pub async fn top_tracks(&self, time_range: TimeRange) -> Result<Vec<Track>, CratedigError> {
        let page: Page<Track> = self
            .get(&format!(
                "{}/me/top/tracks?time_range={}&limit={PAGE_LIMIT}",
                self.base_url,
                time_range.as_str()
            ))
            .await?;
        Ok(page.items)
    }

    pub async fn top_artists(&self, time_range: TimeRange) -> Result<Vec<Artist>, CratedigError> {
        let page: Page<Artist> = self
            .get(&format!(
                "{}/me/top/artists?time_range={}&limit={PAGE_LIMIT}",
                self.base_url,
                time_range.as_str()
            ))
            .await?;
        Ok(page.items)
    }

    fn search_url(&self, query: &str, kind: &str) -> String {
        format!(
            "{}/search?q={}&type={kind}&limit={PAGE_LIMIT}",
            self.base_url,
            encode_query(query)
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, CratedigError> {
        self.send(ApiRequest::get(url)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, CratedigError> {
        let response = self.dispatcher.dispatch(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CratedigError::RequestFailed(format!("HTTP {status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| CratedigError::MalformedResponse(e.to_string()))
    }
}

fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
