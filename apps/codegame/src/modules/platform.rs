//! Platform detection for module downloads.
//!
//! Module releases publish one archive per OS/architecture pair, named after
//! the Go toolchain identifiers the modules are built with
//! (`codegame-cli-go-linux-amd64.tar.gz`, `codegame-cli-go-windows-amd64.zip`).
//!
//! ## Supported Platforms
//!
//! - Linux, macOS (`darwin`) and Windows
//! - `amd64`, `arm64`, `386` and `arm`

use anyhow::Result;
use std::fmt;

use crate::errors::CodegameError;

/// Host operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Darwin,
    /// Windows
    Windows,
}

impl Os {
    /// Returns the identifier used in release asset names.
    #[must_use = "returns the OS string without side effects"]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
        }
    }

    fn from_rust(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Darwin),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

/// Host CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// `x86_64`
    Amd64,
    /// `aarch64`
    Arm64,
    /// 32-bit x86
    I386,
    /// 32-bit ARM
    Arm,
}

impl Arch {
    /// Returns the identifier used in release asset names.
    #[must_use = "returns the architecture string without side effects"]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::I386 => "386",
            Self::Arm => "arm",
        }
    }

    fn from_rust(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Self::Amd64),
            "aarch64" => Some(Self::Arm64),
            "x86" => Some(Self::I386),
            "arm" => Some(Self::Arm),
            _ => None,
        }
    }
}

/// An OS/architecture pair with prebuilt module releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

/// Archive format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// gzip-compressed tarball
    TarGz,
    /// zip archive
    Zip,
}

impl ArchiveFormat {
    /// File extension without a leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

impl Platform {
    /// Creates a platform from its parts.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detects the current platform from the compile-time target.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::UnsupportedPlatform`] if the OS or architecture
    /// has no prebuilt modules.
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_parts(os: &str, arch: &str) -> Result<Self> {
        match (Os::from_rust(os), Arch::from_rust(arch)) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(CodegameError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }
            .into()),
        }
    }

    /// Returns the executable file extension for this platform.
    ///
    /// Returns `.exe` on Windows, empty string on Unix platforms.
    #[must_use = "returns the extension string without side effects"]
    pub fn executable_extension(self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Returns whether this platform is Windows.
    #[must_use = "returns platform check result without side effects"]
    pub fn is_windows(self) -> bool {
        matches!(self.os, Os::Windows)
    }

    /// Returns the archive format releases use on this platform.
    #[must_use]
    pub fn archive_format(self) -> ArchiveFormat {
        if self.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    /// Returns the release asset name for `artifact` on this platform.
    ///
    /// Example: `codegame-cli-go-linux-amd64.tar.gz`.
    #[must_use]
    pub fn asset_name(self, artifact: &str) -> String {
        format!(
            "{artifact}-{}-{}.{}",
            self.os.as_str(),
            self.arch.as_str(),
            self.archive_format().extension()
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
