//! Coarse classifications of a position: stellar population and named region.

use crate::spiral::ArmName;
use serde::Serialize;
use std::fmt;

/// Age/metallicity population driving the stellar type tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Population {
    ThinDisk,
    ThickDisk,
    Bulge,
    Halo,
}

impl Population {
    pub const ALL: [Population; 4] = [
        Population::ThinDisk,
        Population::ThickDisk,
        Population::Bulge,
        Population::Halo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Population::ThinDisk => "thin disk",
            Population::ThickDisk => "thick disk",
            Population::Bulge => "bulge",
            Population::Halo => "halo",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named zone of the galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    GalacticCenter,
    CentralBulge,
    Arm(ArmName),
    InnerDisk,
    MidDisk,
    OuterDisk,
    Halo,
}

impl Region {
    pub fn label(self) -> &'static str {
        match self {
            Region::GalacticCenter => "galactic center",
            Region::CentralBulge => "central bulge",
            Region::Arm(arm) => arm.label(),
            Region::InnerDisk => "inner disk",
            Region::MidDisk => "mid disk",
            Region::OuterDisk => "outer disk",
            Region::Halo => "halo",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
