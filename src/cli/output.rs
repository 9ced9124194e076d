use colored::Colorize;

use crate::api::types::{Album, Artist, Playlist, Track, UserProfile};
use crate::error::CratedigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

pub fn resolve_output_mode(json: bool) -> OutputMode {
    if json {
        OutputMode::Json
    } else {
        OutputMode::Pretty
    }
}

pub fn print_error(err: &CratedigError, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&err.to_json()).unwrap_or_default()
        );
    } else {
        eprintln!("{err}");
        if let Some(url) = err.authorize_url() {
            eprintln!("Authorize at: {url}");
        }
    }
}

pub fn print_tracks(tracks: &[Track], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(tracks),
        OutputMode::Pretty => {
            if tracks.is_empty() {
                println!("No tracks found.");
                return;
            }
            for (i, track) in tracks.iter().enumerate() {
                let name = styled(&track.name, is_tty, |s| s.bold().to_string());
                let album = track
                    .album
                    .as_ref()
                    .map(|a| format!("  [{}]", a.name))
                    .unwrap_or_default();
                println!(
                    "{:2}. {} - {} ({}){}",
                    i + 1,
                    name,
                    track.artist_names(),
                    track.duration_display(),
                    album
                );
            }
        }
    }
}

pub fn print_artists(artists: &[Artist], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(artists),
        OutputMode::Pretty => {
            if artists.is_empty() {
                println!("No artists found.");
                return;
            }
            for (i, artist) in artists.iter().enumerate() {
                let name = styled(&artist.name, is_tty, |s| s.bold().to_string());
                if artist.genres.is_empty() {
                    println!("{:2}. {}", i + 1, name);
                } else {
                    let genres = artist.genres.join(", ");
                    let genres = styled(&genres, is_tty, |s| s.dimmed().to_string());
                    println!("{:2}. {} ({})", i + 1, name, genres);
                }
            }
        }
    }
}

pub fn print_albums(albums: &[Album], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(albums),
        OutputMode::Pretty => {
            if albums.is_empty() {
                println!("No albums found.");
                return;
            }
            for (i, album) in albums.iter().enumerate() {
                let name = styled(&album.name, is_tty, |s| s.bold().to_string());
                let artists = album
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                match &album.release_date {
                    Some(date) => println!("{:2}. {} - {} ({})", i + 1, name, artists, date),
                    None => println!("{:2}. {} - {}", i + 1, name, artists),
                }
            }
        }
    }
}

pub fn print_playlists(playlists: &[Playlist], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(playlists),
        OutputMode::Pretty => {
            if playlists.is_empty() {
                println!("No playlists found.");
                return;
            }
            for (i, playlist) in playlists.iter().enumerate() {
                let name = styled(&playlist.name, is_tty, |s| s.bold().to_string());
                let id = styled(&playlist.id, is_tty, |s| s.dimmed().to_string());
                match playlist.description.as_deref() {
                    Some(desc) if !desc.is_empty() => {
                        println!("{:2}. {} [{}] - {}", i + 1, name, id, desc)
                    }
                    _ => println!("{:2}. {} [{}]", i + 1, name, id),
                }
            }
        }
    }
}

pub fn print_profile(user: &UserProfile, mode: OutputMode) {
    match mode {
        OutputMode::Json => print_json(user),
        OutputMode::Pretty => {
            match &user.display_name {
                Some(name) => println!("{} ({})", name, user.id),
                None => println!("{}", user.id),
            }
            if let Some(email) = &user.email {
                println!("{email}");
            }
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn styled(s: &str, is_tty: bool, f: impl Fn(&str) -> String) -> String {
    if is_tty {
        f(s)
    } else {
        s.to_string()
    }
}
