include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Version collaborator: the release identifier attached to error reports.
#[derive(Debug)]
pub struct Version;

impl Version {
    pub fn current_str() -> &'static str {
        PKG_VERSION
    }

    /// Version string plus the build profile, used by `cmd-util --version`.
    pub fn long() -> String {
        format!("{} ({})", PKG_VERSION, PROFILE)
    }
}
