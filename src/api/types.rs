use serde::{Deserialize, Serialize};

use crate::error::CratedigError;

/// Time window for personalized top-item queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Short,
    Medium,
    Long,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Short => "short_term",
            TimeRange::Medium => "medium_term",
            TimeRange::Long => "long_term",
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = CratedigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" | "short_term" => Ok(TimeRange::Short),
            "medium" | "medium_term" => Ok(TimeRange::Medium),
            "long" | "long_term" => Ok(TimeRange::Long),
            other => Err(CratedigError::RequestFailed(format!(
                "Unknown time range '{other}': expected short, medium, or long"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub uri: String,
}

impl Track {
    /// "3:05"-style display of the track length.
    pub fn duration_display(&self) -> String {
        let total_secs = self.duration_ms / 1000;
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One page of a paged collection. Only `items` matters to us; the cursor
/// fields are passed over.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Page<Track>>,
    pub artists: Option<Page<Artist>>,
    pub albums: Option<Page<Album>>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedPlaylistsResponse {
    pub playlists: Page<Playlist>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_parsing() {
        assert_eq!("short".parse::<TimeRange>().unwrap(), TimeRange::Short);
        assert_eq!(
            "medium_term".parse::<TimeRange>().unwrap(),
            TimeRange::Medium
        );
        assert_eq!("long".parse::<TimeRange>().unwrap(), TimeRange::Long);
        assert!("forever".parse::<TimeRange>().is_err());
    }

    #[test]
    fn time_range_wire_values() {
        assert_eq!(TimeRange::Short.as_str(), "short_term");
        assert_eq!(TimeRange::Medium.as_str(), "medium_term");
        assert_eq!(TimeRange::Long.as_str(), "long_term");
    }

    #[test]
    fn deserialize_track_with_nested_album() {
        let json = r#"{
            "id": "t1",
            "name": "So What",
            "artists": [{"id": "a1", "name": "Miles Davis", "uri": "artist:a1"}],
            "album": {"id": "al1", "name": "Kind of Blue", "release_date": "1959-08-17"},
            "duration_ms": 545000,
            "uri": "track:t1"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.name, "So What");
        assert_eq!(track.artist_names(), "Miles Davis");
        assert_eq!(track.album.as_ref().unwrap().name, "Kind of Blue");
        assert_eq!(track.duration_display(), "9:05");
    }

    #[test]
    fn deserialize_track_minimal() {
        let json = r#"{"id": "t1", "name": "Untitled"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.artists.is_empty());
        assert!(track.album.is_none());
        assert_eq!(track.duration_display(), "0:00");
    }

    #[test]
    fn artist_names_joins_multiple() {
        let track = Track {
            id: "t".into(),
            name: "Duet".into(),
            artists: vec![
                Artist {
                    id: "a1".into(),
                    name: "First".into(),
                    genres: vec![],
                    uri: String::new(),
                },
                Artist {
                    id: "a2".into(),
                    name: "Second".into(),
                    genres: vec![],
                    uri: String::new(),
                },
            ],
            album: None,
            duration_ms: 0,
            uri: String::new(),
        };
        assert_eq!(track.artist_names(), "First, Second");
    }

    #[test]
    fn deserialize_search_response_with_one_kind() {
        let json = r#"{"tracks": {"items": [{"id": "t1", "name": "One"}]}}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.tracks.unwrap().items.len(), 1);
        assert!(resp.artists.is_none());
        assert!(resp.albums.is_none());
    }

    #[test]
    fn deserialize_user_profile_without_display_name() {
        let json = r#"{"id": "u1"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.display_name.is_none());
    }

    #[test]
    fn deserialize_featured_playlists() {
        let json = r#"{"playlists": {"items": [
            {"id": "p1", "name": "Morning Coffee", "description": "easy listening"}
        ]}}"#;
        let resp: FeaturedPlaylistsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.playlists.items[0].name, "Morning Coffee");
    }
}
