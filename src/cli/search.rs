use std::io::IsTerminal;

use crate::error::CratedigError;

use super::output::{print_albums, print_artists, print_tracks, resolve_output_mode};

/// Run the search command for one result kind.
pub async fn run_search(query: &str, kind: &str, json: bool) -> Result<(), CratedigError> {
    // Reject a bad kind before building the client or touching config.
    if !matches!(
        kind,
        "track" | "tracks" | "artist" | "artists" | "album" | "albums"
    ) {
        return Err(CratedigError::RequestFailed(format!(
            "Unknown search kind '{kind}': expected track, artist, or album"
        )));
    }

    let client = crate::client_from_config()?;
    let mode = resolve_output_mode(json);
    let is_tty = std::io::stdout().is_terminal();

    match kind {
        "track" | "tracks" => {
            let tracks = client.search_tracks(query).await?;
            print_tracks(&tracks, mode, is_tty);
        }
        "artist" | "artists" => {
            let artists = client.search_artists(query).await?;
            print_artists(&artists, mode, is_tty);
        }
        _ => {
            let albums = client.search_albums(query).await?;
            print_albums(&albums, mode, is_tty);
        }
    }
    Ok(())
}
