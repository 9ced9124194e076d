use std::io::IsTerminal;

use crate::api::types::TimeRange;
use crate::error::CratedigError;

use super::output::{print_artists, print_playlists, print_tracks, resolve_output_mode};

pub async fn run_featured(json: bool) -> Result<(), CratedigError> {
    let client = crate::client_from_config()?;
    let playlists = client.featured_playlists().await?;
    print_playlists(
        &playlists,
        resolve_output_mode(json),
        std::io::stdout().is_terminal(),
    );
    Ok(())
}

/// Show the user's most-played tracks or artists for a time window.
pub async fn run_top(kind: &str, time_range: &str, json: bool) -> Result<(), CratedigError> {
    let range: TimeRange = time_range.parse()?;
    if !matches!(kind, "tracks" | "artists") {
        return Err(CratedigError::RequestFailed(format!(
            "Unknown top kind '{kind}': expected tracks or artists"
        )));
    }

    let client = crate::client_from_config()?;
    let mode = resolve_output_mode(json);
    let is_tty = std::io::stdout().is_terminal();

    if kind == "tracks" {
        let tracks = client.top_tracks(range).await?;
        print_tracks(&tracks, mode, is_tty);
    } else {
        let artists = client.top_artists(range).await?;
        print_artists(&artists, mode, is_tty);
    }
    Ok(())
}
