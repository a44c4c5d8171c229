// ABOUTME: Wwise SDK version metadata exposed for diagnostics
// ABOUTME: One record per release, display names and the combined plugin id

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// SDK branch the bundled catalog was taken from
pub const BRANCH: &str = "wwise_v2016.2";

/// Build date of the bundled SDK release
pub const BUILD_DATE: BuildDate = BuildDate {
    year: 2017,
    month: 5,
    day: 30,
};

/// Calendar date of an SDK build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildDate {
    /// Year
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month
    pub day: u8,
}

impl fmt::Display for BuildDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Version of the Wwise SDK
///
/// Ordered by major, minor, sub-minor, then build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkVersion {
    /// Major version (the release year)
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Sub-minor version
    pub sub_minor: u32,
    /// Build number, 0 when unknown
    pub build: u32,
    /// Optional release nickname
    pub nickname: Option<String>,
}

impl SdkVersion {
    /// Create a version without nickname
    pub const fn new(major: u32, minor: u32, sub_minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            sub_minor,
            build,
            nickname: None,
        }
    }

    /// Release the bundled catalog matches
    pub const fn current() -> Self {
        Self::new(2016, 2, 4, 6098)
    }

    /// `vMAJOR.MINOR.SUB`
    pub fn version_name_short(&self) -> String {
        format!("v{}.{}.{}", self.major, self.minor, self.sub_minor)
    }

    /// Short name followed by `_nickname` when one is set
    pub fn version_name(&self) -> String {
        match &self.nickname {
            Some(nick) => format!("{}_{}", self.version_name_short(), nick),
            None => self.version_name_short(),
        }
    }

    /// `(major << 8) | minor`, the value plugins are stamped with
    pub fn combined(&self) -> u32 {
        (self.major << 8) | self.minor
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version_name())?;
        if self.build > 0 {
            write!(f, " Build: {}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for SdkVersion {
    type Err = Error;

    /// Parses `vMAJOR.MINOR.SUB[_nickname][ Build: N]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Config(format!("invalid SDK version: {s:?}"));

        let (name, build) = match s.trim().split_once(" Build: ") {
            Some((name, build)) => (name, build.trim().parse().map_err(|_| invalid())?),
            None => (s.trim(), 0),
        };

        let name = name.strip_prefix('v').ok_or_else(invalid)?;
        let (numbers, nickname) = match name.split_once('_') {
            Some((numbers, nick)) if !nick.is_empty() => (numbers, Some(nick.to_string())),
            Some(_) => return Err(invalid()),
            None => (name, None),
        };

        let parts: Vec<u32> = numbers
            .split('.')
            .map(|p| p.parse().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;
        let [major, minor, sub_minor] = parts[..] else {
            return Err(invalid());
        };

        Ok(Self {
            major,
            minor,
            sub_minor,
            build,
            nickname,
        })
    }
}
