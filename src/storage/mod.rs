use anyhow::Context;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS lyrics_cache (
  song_key TEXT PRIMARY KEY,
  artist TEXT NOT NULL,
  title TEXT NOT NULL,
  lyrics TEXT NOT NULL,
  fetched_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Cache the raw remote lyrics block for a track
    pub fn cache_lyrics(
        &self,
        artist: &str,
        title: &str,
        lyrics: &str,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(song_key, artist, title, lyrics, fetched_at)
VALUES(?1, ?2, ?3, ?4, ?5)
ON CONFLICT(song_key) DO UPDATE SET
  lyrics=excluded.lyrics,
  fetched_at=excluded.fetched_at
"#,
                params![song_key(artist, title), artist, title, lyrics, now_unix],
            )
            .context("cache lyrics")?;
        Ok(())
    }

    /// Get cached lyrics
    pub fn get_lyrics(&self, artist: &str, title: &str) -> anyhow::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lyrics FROM lyrics_cache WHERE song_key=?1")
            .context("prepare lyrics cache")?;
        let mut rows = stmt
            .query(params![song_key(artist, title)])
            .context("query lyrics cache")?;
        if let Some(row) = rows.next().context("read lyrics cache row")? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn clear_lyrics(&self) -> anyhow::Result<usize> {
        self.conn
            .execute("DELETE FROM lyrics_cache", [])
            .context("clear lyrics cache")
    }
}

fn song_key(artist: &str, title: &str) -> String {
    format!(
        "{}\u{1f}{}",
        artist.trim().to_lowercase(),
        title.trim().to_lowercase()
    )
}

/// Cloneable handle that opens a fresh connection per call.
///
/// `rusqlite::Connection` is not `Sync`, so background tasks carry the path
/// and run each call on the blocking pool.
#[derive(Debug, Clone)]
pub struct LyricsCache {
    path: PathBuf,
}

impl LyricsCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    pub async fn get(&self, artist: &str, title: &str) -> anyhow::Result<Option<String>> {
        let this = self.clone();
        let (artist, title) = (artist.to_string(), title.to_string());
        tokio::task::spawn_blocking(move || this.open()?.get_lyrics(&artist, &title))
            .await
            .context("join lyrics cache read")?
    }

    pub async fn put(&self, artist: &str, title: &str, lyrics: &str) -> anyhow::Result<()> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let this = self.clone();
        let (artist, title, lyrics) = (artist.to_string(), title.to_string(), lyrics.to_string());
        tokio::task::spawn_blocking(move || this.open()?.cache_lyrics(&artist, &title, &lyrics, now))
            .await
            .context("join lyrics cache write")?
    }

    pub fn clear(&self) -> anyhow::Result<usize> {
        self.open()?.clear_lyrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lrcplay-storage-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("cache.sqlite3")
    }

    #[test]
    fn test_cache_roundtrip_is_case_insensitive() {
        let storage = Storage::open(&temp_db("roundtrip")).unwrap();
        assert_eq!(storage.get_lyrics("Artist", "Song").unwrap(), None);

        storage.cache_lyrics("Artist", "Song", "la la", 1).unwrap();
        assert_eq!(
            storage.get_lyrics(" artist", "SONG ").unwrap().as_deref(),
            Some("la la")
        );

        storage.cache_lyrics("artist", "song", "updated", 2).unwrap();
        assert_eq!(
            storage.get_lyrics("Artist", "Song").unwrap().as_deref(),
            Some("updated")
        );
    }

    #[test]
    fn test_clear() {
        let cache = LyricsCache::new(temp_db("clear"));
        cache.open().unwrap().cache_lyrics("a", "b", "c", 0).unwrap();
        assert_eq!(cache.clear().unwrap(), 1);
        assert_eq!(cache.open().unwrap().get_lyrics("a", "b").unwrap(), None);
    }

    #[tokio::test]
    async fn test_handle_put_get() {
        let cache = LyricsCache::new(temp_db("handle"));
        cache.put("x", "y", "words").await.unwrap();
        assert_eq!(cache.get("X", "Y").await.unwrap().as_deref(), Some("words"));
    }
}
