//! Volume and file identifiers
//!
//! A file id looks like `3,01637037d6`: the volume id, a comma, then the
//! needle key and cookie the volume server understands.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one volume (shard) in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeId(u32);

impl VolumeId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VolumeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for VolumeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map(VolumeId)
            .map_err(|_| Error::InvalidVolumeId(s.to_string()))
    }
}

/// Anything a caller may hand over as a volume id.
///
/// Integers of any width and numeric strings are accepted and normalized to
/// the canonical [`VolumeId`]; negative or out of range values are rejected.
pub trait ToVolumeId {
    fn to_volume_id(&self) -> Result<VolumeId>;
}

impl ToVolumeId for VolumeId {
    fn to_volume_id(&self) -> Result<VolumeId> {
        Ok(*self)
    }
}

macro_rules! int_to_volume_id {
    ($($t:ty),*) => {
        $(
            impl ToVolumeId for $t {
                fn to_volume_id(&self) -> Result<VolumeId> {
                    u32::try_from(*self)
                        .map(VolumeId)
                        .map_err(|_| Error::InvalidVolumeId(self.to_string()))
                }
            }
        )*
    };
}

int_to_volume_id!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl ToVolumeId for str {
    fn to_volume_id(&self) -> Result<VolumeId> {
        self.parse()
    }
}

impl ToVolumeId for String {
    fn to_volume_id(&self) -> Result<VolumeId> {
        self.as_str().parse()
    }
}

impl ToVolumeId for FileId {
    fn to_volume_id(&self) -> Result<VolumeId> {
        Ok(self.volume_id)
    }
}

impl<T: ToVolumeId + ?Sized> ToVolumeId for &T {
    fn to_volume_id(&self) -> Result<VolumeId> {
        (**self).to_volume_id()
    }
}

/// Parsed `"<volumeId>,<key>"` file identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId {
    volume_id: VolumeId,
    key: String,
}

impl FileId {
    pub fn volume_id(&self) -> VolumeId {
        self.volume_id
    }

    /// Needle key and cookie, everything after the comma
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for FileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFileId(s.to_string());

        let (volume, key) = s.trim().split_once(',').ok_or_else(invalid)?;
        if key.is_empty() || key.contains(',') {
            return Err(invalid());
        }
        let volume_id = volume.parse().map_err(|_| invalid())?;

        Ok(Self {
            volume_id,
            key: key.to_string(),
        })
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.volume_id, self.key)
    }
}
