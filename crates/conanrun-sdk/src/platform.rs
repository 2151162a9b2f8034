//! Host platform detection.
//!
//! The runner never inspects the host directly; it asks a [`PlatformProbe`].
//! [`HostPlatform`] reports the OS the binary was compiled for, and
//! [`FixedPlatform`] reports a preset value so command tables can be checked
//! for every platform from any machine.

use std::env;

use crate::types::Platform;

/// Source of the platform the commands are assembled for.
pub trait PlatformProbe {
    fn probe(&self) -> Platform;
}

/// Probes the running host via `std::env::consts::OS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl PlatformProbe for HostPlatform {
    fn probe(&self) -> Platform {
        let platform = Platform::from_os(env::consts::OS);
        log::debug!("probed host platform: {}", platform);
        platform
    }
}

/// Always reports the platform it was constructed with.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform(pub Platform);

impl PlatformProbe for FixedPlatform {
    fn probe(&self) -> Platform {
        self.0
    }
}

impl<P: PlatformProbe + ?Sized> PlatformProbe for &P {
    fn probe(&self) -> Platform {
        (**self).probe()
    }
}
