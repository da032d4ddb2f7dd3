//! Build version of this binary.
//!
//! Release builds set `DOCKHAND_PROVIDER_VERSION` at compile time, e.g.
//! `DOCKHAND_PROVIDER_VERSION=1.2.3 cargo build --release`.

/// Version handed to the provider factory. `"dev"` for untagged builds.
pub const VERSION: &str = match option_env!("DOCKHAND_PROVIDER_VERSION") {
    Some(version) => version,
    None => "dev",
};
