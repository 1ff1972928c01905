//! Integration tests for loading and switching.
//!
//! These tests are implemented in:
//! `crates/chos-core/tests/configure_and_switch.rs`
//!
//! Covered scenarios:
//! - `loads_one_environment_per_regular_file`: one environment per file, `root` first
//! - `binds_keep_file_order`: bind order matches line order
//! - `one_token_line_aborts_the_load`: malformed line fails the whole load
//! - `untrusted_owner_is_rejected`: files not owned by the trusted uid are refused
//! - `missing_root_is_config_not_found`: `root` must exist
//! - `switch_into_alt_from_base_system`: mounts in order, then pivots
//! - `switch_away_from_current_environment`: unmounts `CURRENT` in reverse first
//! - `unknown_target_touches_nothing`: no kernel calls for unknown names
//!
//! A real switch needs `CAP_SYS_ADMIN` and the `/local` and `/chos2` mount
//! points, so the kernel path is exercised manually on a staging node.
