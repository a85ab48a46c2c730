/// Width of a function or failure selector, in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// Name of the environment variable containing the path to the interface manifest.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/abicore/manifest.toml` or `$HOME/.config/abicore/manifest.toml`
///  (2) on Windows: `%APPDATA%\abicore\manifest.toml`
pub const ENV_MANIFEST_PATH: &str = "ABI_MANIFEST_PATH";

/// Directory holding the manifest under the platform configuration directory.
pub const MANIFEST_DIR_NAME: &str = "abicore";

/// File name of the manifest.
pub const MANIFEST_FILE_NAME: &str = "manifest.toml";
