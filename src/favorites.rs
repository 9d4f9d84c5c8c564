//! Favourite tracks and playlists.
//!
//! An in-memory collection owned by the caller. Operations that stamp an id
//! or a time go through [`JourneyEngine`](crate::engine::JourneyEngine); the
//! rest are plain methods here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::track::Track;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSong {
    pub id: String,
    /// Id of the catalog track this favourite points at.
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteSong {
    pub(crate) fn from_track(id: String, track: &Track, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            song_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            image_url: track.image_url.clone(),
            added_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub songs: Vec<FavoriteSong>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub(crate) fn new(id: String, name: &str, description: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            songs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn contains(&self, song_id: &str) -> bool {
        self.songs.iter().any(|s| s.song_id == song_id)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorites {
    #[serde(default)]
    favorite_songs: Vec<FavoriteSong>,
    #[serde(default)]
    playlists: Vec<Playlist>,
}

impl Favorites {
    pub fn favorite_songs(&self) -> &[FavoriteSong] {
        &self.favorite_songs
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, playlist_id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == playlist_id)
    }

    /// Whether any favourite points at catalog track `song_id`.
    #[must_use]
    pub fn is_favorite(&self, song_id: &str) -> bool {
        self.favorite_songs.iter().any(|f| f.song_id == song_id)
    }

    /// Drops the favourite with `favorite_id`. Returns whether one was found.
    pub fn remove_favorite(&mut self, favorite_id: &str) -> bool {
        let before = self.favorite_songs.len();
        self.favorite_songs.retain(|f| f.id != favorite_id);
        self.favorite_songs.len() != before
    }

    pub(crate) fn insert_favorite(&mut self, favorite: FavoriteSong) {
        self.favorite_songs.push(favorite);
    }

    pub(crate) fn insert_playlist(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    fn playlist_mut(&mut self, playlist_id: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| EngineError::UnknownPlaylist(playlist_id.to_string()))
    }

    pub(crate) fn add_to_playlist(
        &mut self,
        playlist_id: &str,
        song: &FavoriteSong,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let playlist = self.playlist_mut(playlist_id)?;
        if playlist.contains(&song.song_id) {
            return Ok(false);
        }

        playlist.songs.push(song.clone());
        playlist.updated_at = now;
        Ok(true)
    }

    pub(crate) fn remove_from_playlist(
        &mut self,
        playlist_id: &str,
        song_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let playlist = self.playlist_mut(playlist_id)?;
        let Some(index) = playlist.songs.iter().position(|s| s.song_id == song_id) else {
            return Ok(false);
        };

        playlist.songs.remove(index);
        playlist.updated_at = now;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn favorite(id: &str, song_id: &str) -> FavoriteSong {
        let track = Track::new(song_id, "Weightless", "Marconi Union", "Weightless", 480);
        FavoriteSong::from_track(id.to_string(), &track, day(1))
    }

    #[test]
    fn test_remove_favorite() {
        let mut favorites = Favorites::default();
        favorites.insert_favorite(favorite("fav1", "song1"));
        favorites.insert_favorite(favorite("fav2", "song2"));

        assert!(favorites.remove_favorite("fav1"));
        assert!(!favorites.remove_favorite("fav1"));
        assert!(!favorites.is_favorite("song1"));
        assert!(favorites.is_favorite("song2"));
    }

    #[test]
    fn test_playlist_add_is_idempotent_and_bumps_updated_at() {
        let mut favorites = Favorites::default();
        favorites.insert_playlist(Playlist::new("p1".to_string(), "Chill", "", day(1)));
        let song = favorite("fav1", "song1");

        assert_eq!(favorites.add_to_playlist("p1", &song, day(2)), Ok(true));
        assert_eq!(favorites.add_to_playlist("p1", &song, day(3)), Ok(false));

        let playlist = favorites.playlist("p1").unwrap();
        assert_eq!(playlist.songs.len(), 1);
        assert_eq!(playlist.created_at, day(1));
        assert_eq!(playlist.updated_at, day(2));
    }

    #[test]
    fn test_remove_from_playlist() {
        let mut favorites = Favorites::default();
        favorites.insert_playlist(Playlist::new("p1".to_string(), "Chill", "", day(1)));
        favorites
            .add_to_playlist("p1", &favorite("fav1", "song1"), day(2))
            .unwrap();

        assert_eq!(favorites.remove_from_playlist("p1", "song9", day(3)), Ok(false));
        assert_eq!(favorites.playlist("p1").unwrap().updated_at, day(2));

        assert_eq!(favorites.remove_from_playlist("p1", "song1", day(4)), Ok(true));
        let playlist = favorites.playlist("p1").unwrap();
        assert!(playlist.songs.is_empty());
        assert_eq!(playlist.updated_at, day(4));
    }

    #[test]
    fn test_unknown_playlist() {
        let mut favorites = Favorites::default();
        let result = favorites.remove_from_playlist("nope", "song1", day(1));
        assert_eq!(result, Err(EngineError::UnknownPlaylist("nope".to_string())));
    }
}
