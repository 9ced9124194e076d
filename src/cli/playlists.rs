use std::io::IsTerminal;

use crate::error::CratedigError;

use super::output::{print_playlists, resolve_output_mode, OutputMode};

pub async fn run_playlist_list(json: bool) -> Result<(), CratedigError> {
    let client = crate::client_from_config()?;
    let playlists = client.user_playlists().await?;
    print_playlists(
        &playlists,
        resolve_output_mode(json),
        std::io::stdout().is_terminal(),
    );
    Ok(())
}

pub async fn run_playlist_create(
    name: &str,
    description: &str,
    public: bool,
    json: bool,
) -> Result<(), CratedigError> {
    let client = crate::client_from_config()?;
    let playlist = client.create_playlist(name, description, public).await?;

    match resolve_output_mode(json) {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&playlist).unwrap_or_default()
        ),
        OutputMode::Pretty => {
            println!("Created playlist '{}' ({})", playlist.name, playlist.id);
        }
    }
    Ok(())
}

pub async fn run_playlist_add(
    playlist_id: &str,
    track_uris: &[String],
    json: bool,
) -> Result<(), CratedigError> {
    if track_uris.is_empty() {
        return Err(CratedigError::RequestFailed(
            "No track URIs given; nothing to add".to_string(),
        ));
    }

    let client = crate::client_from_config()?;
    let snapshot = client
        .add_tracks_to_playlist(playlist_id, track_uris)
        .await?;

    match resolve_output_mode(json) {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "snapshotId": snapshot.snapshot_id,
            }))
            .unwrap_or_default()
        ),
        OutputMode::Pretty => {
            println!(
                "Added {} track(s) to {playlist_id} (snapshot {})",
                track_uris.len(),
                snapshot.snapshot_id
            );
        }
    }
    Ok(())
}
