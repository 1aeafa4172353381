use std::path::{Path, PathBuf};
use tokio::fs;

/// One file per record under a directory. Records are replaced whole.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub async fn open(p: impl AsRef<Path>) -> crate::Result<Self> {
        let p = p.as_ref();
        fs::create_dir_all(p).await?;
        Ok(Self(p.to_owned()))
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.0.join(format!("{key}.json"))
    }

    pub async fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let path = self.record_path(key);
        if fs::try_exists(&path).await? {
            Ok(Some(fs::read_to_string(&path).await?))
        } else {
            Ok(None)
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> crate::Result<()> {
        let path = self.record_path(key);
        // a half-written record would read back as malformed, so swap it in whole
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
