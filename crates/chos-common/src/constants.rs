//! Reserved names and default deployment paths.

/// Environment that anchors the registry. Always loaded first.
pub const ROOT_ENV: &str = "root";

/// Sentinel environment describing the binds presently active.
pub const CURRENT_ENV: &str = "CURRENT";

/// Directory holding one file per environment.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/chos.d";

/// Site configuration file carrying the `%SHELL` and `%ENV` sections.
pub const DEFAULT_SITE_CONFIG: &str = "/etc/chos";

/// Per-user marker file naming the selected environment, relative to `$HOME`.
pub const MARKER_FILE: &str = ".chos";

/// Environment selected when the marker file is missing or empty.
pub const DEFAULT_ENV: &str = "default";

/// `PATH` handed to the switched session regardless of the caller's.
pub const DEFAULT_PATH: &str = "/usr/local/bin:/bin:/usr/bin";

/// Uid that must own every configuration file.
pub const TRUSTED_UID: u32 = 0;

/// Mount point of the unmodified base system.
pub const BASE_ROOT: &str = "/local";

/// Where the chrooted view lands while the base system is root.
pub const BASE_PUT_OLD: &str = "/local/chos2";

/// Staging root that environment binds are mounted into.
pub const NEW_ROOT: &str = "/chos2";

/// Where the base system stays reachable once an environment is root.
pub const NEW_PUT_OLD: &str = "/chos2/local";

/// Section header for alias lookups in the site configuration.
pub const SHELL_SECTION: &str = "%SHELL";

/// Section header for passed-through variables in the site configuration.
pub const ENV_SECTION: &str = "%ENV";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "chos";
