use std::time::Duration;

pub const PROFILE_FULL: &str = "full";
pub const PROFILE_COMMON: &str = "common";
pub const PROFILE_QUICK: &str = "quick";

/// Defaults a profile contributes before the file and overrides apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub profile: String,
    pub label_filter: String,
    pub timeout: Duration,
}

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Preset for a known profile name.
pub fn preset(profile: &str) -> Option<Preset> {
    let (label_filter, timeout) = match profile {
        PROFILE_FULL => ("all", 24 * HOUR),
        PROFILE_COMMON => ("common", 24 * HOUR),
        PROFILE_QUICK => ("common", HOUR),
        _ => return None,
    };
    Some(Preset {
        profile: profile.to_string(),
        label_filter: label_filter.to_string(),
        timeout,
    })
}
