use crate::domain_model::parse_cookie_header;
use crate::domain_port::StoreError;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Carries the cookie jar across CLI invocations, the way a browser keeps its
/// cookies between page loads. One `name=value` per line. Attributes other
/// than the path are not kept; the backend re-issues cookies on refresh.
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CookieFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_into(&self, jar: &Jar, url: &Url) -> Result<usize, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let mut loaded = 0;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !line.contains('=') {
                return Err(StoreError::Corrupt(format!(
                    "{}: malformed cookie line",
                    self.path.display()
                )));
            }
            jar.add_cookie_str(&format!("{}; Path=/", line), url);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub async fn save_from(&self, jar: &Jar, url: &Url) -> Result<(), StoreError> {
        let header = jar
            .cookies(url)
            .and_then(|v| v.to_str().map(str::to_owned).ok())
            .unwrap_or_default();
        let mut text = String::new();
        for (name, value) in parse_cookie_header(&header) {
            text.push_str(name);
            text.push('=');
            text.push_str(value);
            text.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        restrict_permissions(&self.path).await
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &std::path::Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| StoreError::Io(e.to_string()))
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &std::path::Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_jar_contents() {
        let dir = tempfile::tempdir().unwrap();
        let url: Url = "http://localhost:5000/api/".parse().unwrap();
        let file = CookieFile::new(dir.path().join("cookies"));

        let jar = Jar::default();
        jar.add_cookie_str("accessToken=a.b.c; Path=/", &url);
        jar.add_cookie_str("refreshToken=opaque; Path=/; HttpOnly", &url);
        file.save_from(&jar, &url).await.unwrap();

        let restored = Jar::default();
        assert_eq!(file.load_into(&restored, &url).await.unwrap(), 2);
        let header = restored.cookies(&url).unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("accessToken=a.b.c"));
        assert!(header.contains("refreshToken=opaque"));
    }

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let url: Url = "http://localhost:5000/api/".parse().unwrap();
        let file = CookieFile::new(dir.path().join("absent"));
        assert_eq!(file.load_into(&Jar::default(), &url).await.unwrap(), 0);
    }
}
