//! Capability tier selection.
//!
//! Every operation runs on one of three tiers:
//!
//! | Tier     | x86_64          | aarch64 | other |
//! |----------|-----------------|---------|-------|
//! | `Wide`   | AVX2 (256-bit)  | -       | -     |
//! | `Narrow` | SSE4.2 (128-bit)| NEON    | -     |
//! | `Scalar` | always          | always  | always|
//!
//! The CPU is probed once per process and the answer is cached, so choosing a
//! tier costs a single load per call. The `SIMDSCAN_TIER` environment variable
//! (`scalar`, `narrow`, `wide`) caps the detected tier; it can never select a
//! tier the CPU does not support.

use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};

/// Environment variable that caps the detected tier.
pub const TIER_ENV_VAR: &str = "SIMDSCAN_TIER";

/// Execution tier, ordered from least to most capable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Plain scalar loops. Always available.
    Scalar,
    /// 128-bit vectors (SSE4.2 or NEON).
    Narrow,
    /// 256-bit vectors (AVX2).
    Wide,
}

impl Tier {
    /// Every tier, least capable first.
    pub const ALL: [Tier; 3] = [Tier::Scalar, Tier::Narrow, Tier::Wide];

    /// Returns the best tier this process may use.
    ///
    /// The first call probes the CPU and reads `SIMDSCAN_TIER`; later calls
    /// return the cached result.
    #[inline]
    pub fn detect() -> Tier {
        static DETECTED: OnceLock<Tier> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let hardware = Self::hardware();
            let tier = match std::env::var(TIER_ENV_VAR) {
                Ok(raw) => match raw.parse::<Tier>() {
                    Ok(cap) => hardware.min(cap),
                    Err(_) => {
                        warn!("ignoring {TIER_ENV_VAR}={raw:?}: expected scalar, narrow or wide");
                        hardware
                    }
                },
                Err(_) => hardware,
            };
            debug!("simdscan tier: {tier} (hardware supports {hardware})");
            tier
        })
    }

    /// Best tier the hardware supports, ignoring the environment override.
    pub fn hardware() -> Tier {
        Tier::ALL
            .into_iter()
            .rev()
            .find(|tier| tier.supported())
            .unwrap_or(Tier::Scalar)
    }

    /// Whether the running CPU can execute this tier.
    pub fn supported(self) -> bool {
        match self {
            Tier::Scalar => true,
            Tier::Narrow => has_narrow(),
            Tier::Wide => has_wide(),
        }
    }

    /// Every tier the running CPU can execute, least capable first.
    pub fn available() -> Vec<Tier> {
        Tier::ALL.into_iter().filter(|tier| tier.supported()).collect()
    }

    /// Register width of the tier in bytes.
    #[inline]
    pub const fn register_bytes(self) -> usize {
        match self {
            Tier::Scalar => 8,
            Tier::Narrow => 16,
            Tier::Wide => 32,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Scalar => "scalar",
            Tier::Narrow => "narrow",
            Tier::Wide => "wide",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(Tier::Scalar),
            "narrow" => Ok(Tier::Narrow),
            "wide" => Ok(Tier::Wide),
            _ => Err(()),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn has_wide() -> bool {
    is_x86_feature_detected!("avx2")
}

#[cfg(target_arch = "x86_64")]
fn has_narrow() -> bool {
    is_x86_feature_detected!("sse4.2")
}

#[cfg(target_arch = "aarch64")]
fn has_wide() -> bool {
    false
}

#[cfg(target_arch = "aarch64")]
fn has_narrow() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn has_wide() -> bool {
    false
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn has_narrow() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_is_always_available() {
        assert!(Tier::Scalar.supported());
        assert_eq!(Tier::available().first(), Some(&Tier::Scalar));
    }

    #[test]
    fn test_detect_never_exceeds_hardware() {
        assert!(Tier::detect() <= Tier::hardware());
        assert!(Tier::detect().supported());
    }

    #[test]
    fn test_wide_implies_narrow() {
        if Tier::Wide.supported() {
            assert!(Tier::Narrow.supported());
        }
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("wide".parse::<Tier>(), Ok(Tier::Wide));
        assert_eq!(" Narrow ".parse::<Tier>(), Ok(Tier::Narrow));
        assert_eq!("SCALAR".parse::<Tier>(), Ok(Tier::Scalar));
        assert!("avx512".parse::<Tier>().is_err());
    }

    #[test]
    fn test_register_width_grows_with_tier() {
        assert!(Tier::Scalar.register_bytes() < Tier::Narrow.register_bytes());
        assert!(Tier::Narrow.register_bytes() < Tier::Wide.register_bytes());
        assert_eq!(Tier::Wide.to_string(), "wide");
    }
}
