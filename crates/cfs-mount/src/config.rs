use std::path::Path;

use serde::{Deserialize, Serialize};

use cfs_tree::validate_name;
use cfs_types::{ModePolicy, Permissions, BLOCK_SIZE, DEFAULT_CAPACITY, MAX_CAPACITY};

use crate::error::{MountError, MountResult};

/// Settings for one mount session.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```toml
/// capacity = 8
/// mode_policy = "revert"
///
/// [layout]
/// root_file = "counter"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Number of slots in the content store.
    pub capacity: usize,
    /// Counter value files created after mount start from.
    pub creation_seed: i64,
    pub mode_policy: ModePolicy,
    pub file_permissions: u32,
    pub directory_permissions: u32,
    /// Block size reported by `statfs` and used as the drain chunk size.
    pub block_size: u32,
    pub layout: LayoutConfig,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            creation_seed: 0,
            mode_policy: ModePolicy::Sticky,
            file_permissions: Permissions::FILE.bits(),
            directory_permissions: Permissions::DIRECTORY.bits(),
            block_size: BLOCK_SIZE,
            layout: LayoutConfig::default(),
        }
    }
}

/// Names of the nodes created at mount time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// File in the root directory.
    pub root_file: String,
    /// Directory in the root directory.
    pub directory: String,
    /// File inside `directory`.
    pub directory_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_file: "contador1".into(),
            directory: "carpeta1".into(),
            directory_file: "contador2".into(),
        }
    }
}

impl MountConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> MountResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| MountError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> MountResult<Self> {
        let input = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&input)
    }

    pub fn to_toml(&self) -> MountResult<String> {
        toml::to_string_pretty(self).map_err(|e| MountError::Config(e.to_string()))
    }

    /// Check every field that has constraints beyond its type.
    pub fn validate(&self) -> MountResult<()> {
        if self.capacity > MAX_CAPACITY {
            return Err(MountError::Config(format!(
                "capacity must be at most {MAX_CAPACITY}, got {}",
                self.capacity
            )));
        }
        self.file_perm()?;
        self.dir_perm()?;
        if self.block_size == 0 || !self.block_size.is_power_of_two() {
            return Err(MountError::Config(format!(
                "block_size must be a power of two, got {}",
                self.block_size
            )));
        }
        let layout = &self.layout;
        for name in [&layout.root_file, &layout.directory, &layout.directory_file] {
            validate_name(name)?;
        }
        if layout.root_file == layout.directory {
            return Err(MountError::Config(format!(
                "layout.root_file and layout.directory are both {:?}",
                layout.root_file
            )));
        }
        Ok(())
    }

    pub fn file_perm(&self) -> MountResult<Permissions> {
        Ok(Permissions::new(self.file_permissions)?)
    }

    pub fn dir_perm(&self) -> MountResult<Permissions> {
        Ok(Permissions::new(self.directory_permissions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = MountConfig::default();
        assert_eq!(c.capacity, 50);
        assert_eq!(c.creation_seed, 0);
        assert_eq!(c.mode_policy, ModePolicy::Sticky);
        assert_eq!(c.layout.root_file, "contador1");
        assert_eq!(c.layout.directory, "carpeta1");
        assert_eq!(c.layout.directory_file, "contador2");
        assert_eq!(c.file_permissions, 0o644);
        assert_eq!(c.directory_permissions, 0o755);
        assert_eq!(c.block_size, 4096);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = MountConfig::from_toml_str(
            r#"
            capacity = 8
            mode_policy = "revert"

            [layout]
            root_file = "counter"
            "#,
        )
        .unwrap();
        assert_eq!(c.capacity, 8);
        assert_eq!(c.mode_policy, ModePolicy::Revert);
        assert_eq!(c.layout.root_file, "counter");
        assert_eq!(c.layout.directory, "carpeta1");
        assert_eq!(c.block_size, 4096);
    }

    #[test]
    fn octal_permissions() {
        let c = MountConfig::from_toml_str("file_permissions = 0o600").unwrap();
        assert_eq!(c.file_perm().unwrap().bits(), 0o600);
    }

    #[test]
    fn toml_roundtrip() {
        let c = MountConfig {
            capacity: 3,
            creation_seed: 10,
            ..MountConfig::default()
        };
        let text = c.to_toml().unwrap();
        assert_eq!(MountConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = MountConfig::from_toml_str(r#"mode_policy = "sometimes""#).unwrap_err();
        assert!(matches!(err, MountError::Config(_)));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(MountConfig::from_toml_str("file_permissions = 0o17777").is_err());
        assert!(MountConfig::from_toml_str("block_size = 1000").is_err());
        assert!(MountConfig::from_toml_str("block_size = 0").is_err());
        assert!(MountConfig::from_toml_str("capacity = 65537").is_err());
        assert!(MountConfig::from_toml_str("capacity = 65536").is_ok());
        assert!(MountConfig::from_toml_str("[layout]\ndirectory = \"a/b\"").is_err());
        assert!(MountConfig::from_toml_str("[layout]\ndirectory = \"contador1\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 2\ncreation_seed = -5").unwrap();
        let c = MountConfig::load(file.path()).unwrap();
        assert_eq!(c.capacity, 2);
        assert_eq!(c.creation_seed, -5);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MountConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MountError::Io(_)));
    }
}
