use std::path::{Path, PathBuf};

use abitype::codec::DecodeOptions;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    function::FunctionDescriptor,
    interface::Interface,
    magic::{ENV_MANIFEST_PATH, MANIFEST_DIR_NAME, MANIFEST_FILE_NAME},
    registry::ErrorRegistry,
    utils::error::{AbiError, AbiResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSection {
    /// Require decoded inputs to be the canonical encoding of their value.
    pub validate: bool,
}

impl Default for CodecSection {
    fn default() -> Self {
        Self { validate: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// Canonical signature, e.g. `balanceOf(address)`.
    pub signature: String,
    /// Output list, e.g. `(uint256)`. No outputs when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub signature: String,
}

/// Interface manifest: codec settings plus the functions and failure cases of
/// an interface, in textual signature form.
///
/// ```toml
/// [codec]
/// validate = true
///
/// [[functions]]
/// signature = "balanceOf(address)"
/// outputs = "(uint256)"
///
/// [[errors]]
/// signature = "InsufficientBalance(address,uint256,uint256)"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiManifest {
    pub codec: CodecSection,
    pub functions: Vec<FunctionEntry>,
    pub errors: Vec<ErrorEntry>,
}

impl AbiManifest {
    /// Get the default path to the manifest file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_MANIFEST_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push(MANIFEST_DIR_NAME);
        path.push(MANIFEST_FILE_NAME);
        path
    }

    /// Parse a manifest from TOML text. `origin` names the text in errors.
    pub fn from_toml_str(text: &str, origin: &str) -> AbiResult<Self> {
        toml::from_str(text).map_err(|source| AbiError::ManifestParse {
            source,
            file: origin.to_string(),
        })
    }

    /// Load a manifest from a TOML file.
    pub fn load_from_toml(path: &Path) -> AbiResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let manifest = Self::from_toml_str(&text, &path.display().to_string())?;
        info!(
            "Loaded manifest '{}' ({} functions, {} errors)",
            path.display(),
            manifest.functions.len(),
            manifest.errors.len()
        );
        Ok(manifest)
    }

    /// Save the manifest to a TOML file, creating parent directories.
    pub fn save_to_toml(&self, path: &Path) -> AbiResult<()> {
        let text = toml::to_string(self).map_err(|source| AbiError::ManifestSerialize {
            source,
            file: path.display().to_string(),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, text)?;
        Ok(())
    }

    /// Parse every function entry into an [`Interface`].
    pub fn build_interface(&self) -> AbiResult<Interface> {
        let functions = self
            .functions
            .iter()
            .map(|entry| match &entry.outputs {
                Some(outputs) => FunctionDescriptor::parse_with_outputs(&entry.signature, outputs),
                None => FunctionDescriptor::parse(&entry.signature),
            })
            .collect::<AbiResult<Vec<_>>>()?;
        Interface::new(functions)
    }

    /// Parse every error entry into an [`ErrorRegistry`].
    pub fn build_error_registry(&self) -> AbiResult<ErrorRegistry> {
        let errors = self
            .errors
            .iter()
            .map(|entry| FunctionDescriptor::parse(&entry.signature))
            .collect::<AbiResult<Vec<_>>>()?;
        ErrorRegistry::new(errors)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            validate: self.codec.validate,
        }
    }
}
