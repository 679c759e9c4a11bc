//! The local data directory where downloaded sources and derived tables are kept.
//!
//! The directory is resolved in this order:
//!
//! 1. An explicit path (the `--data-dir` CLI option).
//! 2. The [`HOME_ENV`] environment variable.
//! 3. `~/.data/ideogen`.


#[cfg(feature = "download")]
use crate::utils;
use color_eyre::eyre::{ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "IDEOGEN_HOME";
/// Name of the sub-directory under `~/.data` used by default.
pub const MODULE: &str = "ideogen";

/// A directory of data files.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Store {
    /// Root directory of the store.
    pub root: PathBuf,
}

impl Display for Store {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

impl Store {
    /// Returns a [`Store`] rooted at `root`. The directory is not created.
    pub fn new<P>(root: &P) -> Self
    where
        P: AsRef<Path> + ?Sized,
    {
        Store { root: root.as_ref().to_path_buf() }
    }

    /// Returns the [`Store`] for `data_dir`, falling back to [`Store::default_root`].
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use ideogen::Store;
    /// use std::path::PathBuf;
    ///
    /// let store = Store::resolve(Some(PathBuf::from("test/store")))?;
    /// assert_eq!(store.join("refseq_human.tsv"), PathBuf::from("test/store/refseq_human.tsv"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self, Report> {
        let root = match data_dir {
            Some(root) => root,
            None => Store::default_root()?,
        };
        debug!("Using data directory: {root:?}");
        Ok(Store { root })
    }

    /// Returns the default root: [`HOME_ENV`] if set, otherwise `~/.data/ideogen`.
    pub fn default_root() -> Result<PathBuf, Report> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|root| !root.is_empty()) {
            return Ok(PathBuf::from(root));
        }
        let home = dirs::home_dir()
            .wrap_err("Failed to locate the home directory.")
            .suggestion(format!("Set the {HOME_ENV} environment variable or pass --data-dir."))?;
        Ok(home.join(".data").join(MODULE))
    }

    /// Returns the path of `name` inside the store.
    pub fn join<P>(&self, name: &P) -> PathBuf
    where
        P: AsRef<Path> + ?Sized,
    {
        self.root.join(name)
    }

    /// Creates the root directory if needed.
    pub fn create(&self) -> Result<(), Report> {
        if !self.root.exists() {
            info!("Creating data directory: {:?}", self.root);
            std::fs::create_dir_all(&self.root)
                .wrap_err_with(|| format!("Failed to create directory: {:?}", self.root))?;
        }
        Ok(())
    }

    /// Returns true if `name` exists inside the store.
    pub fn contains<P>(&self, name: &P) -> bool
    where
        P: AsRef<Path> + ?Sized,
    {
        self.join(name).exists()
    }

    /// Removes `name` from the store. Missing files are not an error.
    pub fn remove<P>(&self, name: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let path = self.join(name);
        if path.exists() {
            info!("Removing: {path:?}");
            std::fs::remove_file(&path).wrap_err_with(|| format!("Failed to remove: {path:?}"))?;
        }
        Ok(())
    }

    /// Returns the local path of `url`, downloading it first if it is missing or `force` is set.
    #[cfg(feature = "download")]
    pub async fn ensure(&self, url: &str, force: bool) -> Result<PathBuf, Report> {
        let path = self.join(&utils::url_file_name(url)?);
        if path.exists() && !force {
            debug!("Using cached download: {path:?}");
            return Ok(path);
        }
        self.create()?;
        info!("Downloading: {url}");
        utils::download_file(url, &path).await
    }
}
