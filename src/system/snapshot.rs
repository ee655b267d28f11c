/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use super::{SimulationError, SnapshotSnafu, SolarSystem};
use crate::bodies::BodyRole;
use crate::dynamics::Particle;
use crate::errors::{DecodingError, InputOutputError, IntegrityError};
use crate::file2heap;
use crate::math::Vector3;
use bytes::Bytes;
use core::fmt;
use core::str::FromStr;
use der::asn1::{OctetStringRef, Utf8StringRef};
use der::{Decode, Encode, Reader, SliceReader, Writer};
use hifitime::Epoch;
use log::{error, info, trace, warn};
use snafu::prelude::*;
use std::fs::File;
use std::io::Write as IoWrite;
use std::path::Path;

/// The current version of the snapshot format. Files carrying any other version are
/// refused on load.
pub const SNAPSHOT_VERSION: Semver = Semver {
    major: 0,
    minor: 2,
    patch: 0,
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SnapshotError {
    #[snafu(display("input/output error while {action}: {source}"))]
    SnapIO {
        action: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("{source} while reading the snapshot file"))]
    SnapRead { source: InputOutputError },
    #[snafu(display("when {action}, {source}"))]
    SnapDecoding {
        action: &'static str,
        source: DecodingError,
    },
    #[snafu(display("snapshot integrity check failed: {source}"))]
    SnapIntegrity { source: IntegrityError },
}

/// Semantic versioning, encoded as a single octet string of 3 bytes of content.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Semver {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Encode for Semver {
    fn encoded_len(&self) -> der::Result<der::Length> {
        let data: [u8; 3] = [self.major, self.minor, self.patch];
        let as_octet_string = OctetStringRef::new(&data).unwrap();
        as_octet_string.encoded_len()
    }

    fn encode(&self, encoder: &mut impl Writer) -> der::Result<()> {
        let data: [u8; 3] = [self.major, self.minor, self.patch];
        let as_octet_string = OctetStringRef::new(&data).unwrap();
        as_octet_string.encode(encoder)
    }
}

impl<'a> Decode<'a> for Semver {
    fn decode<R: Reader<'a>>(decoder: &mut R) -> der::Result<Self> {
        let data: OctetStringRef = decoder.decode()?;
        if data.len() != der::Length::new(3) {
            return Err(der::Error::new(
                der::ErrorKind::Incomplete {
                    expected_len: der::Length::new(3),
                    actual_len: data.len(),
                },
                der::Length::new(0),
            ));
        }
        Ok(Self {
            major: data.as_bytes()[0],
            minor: data.as_bytes()[1],
            patch: data.as_bytes()[2],
        })
    }
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One body of the persisted particle map: the descriptor and the full dynamical state.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyRecord {
    pub name: String,
    /// Role tag: 0 star, 1 planet, 2 moon, 3 minor body, 4 free particle.
    pub role: u8,
    /// Name of the center body; empty for heliocentric entries.
    pub center: String,
    pub mass_kg: f64,
    pub mu_m3_s2: f64,
    pub diameter_m: f64,
    pub position_m: [f64; 3],
    pub velocity_m_s: [f64; 3],
}

impl BodyRecord {
    pub const ROLE_STAR: u8 = 0;
    pub const ROLE_PLANET: u8 = 1;
    pub const ROLE_MOON: u8 = 2;
    pub const ROLE_MINOR: u8 = 3;
    pub const ROLE_FREE: u8 = 4;

    pub(crate) fn role_of(role: BodyRole) -> u8 {
        match role {
            BodyRole::Star => Self::ROLE_STAR,
            BodyRole::Planet => Self::ROLE_PLANET,
            BodyRole::Moon => Self::ROLE_MOON,
            BodyRole::MinorBody => Self::ROLE_MINOR,
        }
    }

    fn check_finite(&self) -> Result<(), IntegrityError> {
        for (value, variable) in [
            (self.mass_kg, "mass"),
            (self.mu_m3_s2, "mu"),
            (self.diameter_m, "diameter"),
        ] {
            if !value.is_finite() {
                return Err(IntegrityError::NonFinite { variable });
            }
        }
        for axis in 0..3 {
            if !self.position_m[axis].is_finite() {
                return Err(IntegrityError::NonFinite { variable: "position" });
            }
            if !self.velocity_m_s[axis].is_finite() {
                return Err(IntegrityError::NonFinite { variable: "velocity" });
            }
        }
        Ok(())
    }
}

impl Encode for BodyRecord {
    fn encoded_len(&self) -> der::Result<der::Length> {
        Utf8StringRef::new(&self.name)?.encoded_len()?
            + self.role.encoded_len()?
            + Utf8StringRef::new(&self.center)?.encoded_len()?
            + self.mass_kg.encoded_len()?
            + self.mu_m3_s2.encoded_len()?
            + self.diameter_m.encoded_len()?
            + self.position_m.encoded_len()?
            + self.velocity_m_s.encoded_len()?
    }

    fn encode(&self, encoder: &mut impl Writer) -> der::Result<()> {
        Utf8StringRef::new(&self.name)?.encode(encoder)?;
        self.role.encode(encoder)?;
        Utf8StringRef::new(&self.center)?.encode(encoder)?;
        self.mass_kg.encode(encoder)?;
        self.mu_m3_s2.encode(encoder)?;
        self.diameter_m.encode(encoder)?;
        self.position_m.encode(encoder)?;
        self.velocity_m_s.encode(encoder)
    }
}

impl<'a> Decode<'a> for BodyRecord {
    fn decode<R: Reader<'a>>(decoder: &mut R) -> der::Result<Self> {
        let name = decoder.decode::<Utf8StringRef<'a>>()?.as_str().to_string();
        let role = decoder.decode()?;
        let center = decoder.decode::<Utf8StringRef<'a>>()?.as_str().to_string();
        Ok(Self {
            name,
            role,
            center,
            mass_kg: decoder.decode()?,
            mu_m3_s2: decoder.decode()?,
            diameter_m: decoder.decode()?,
            position_m: decoder.decode()?,
            velocity_m_s: decoder.decode()?,
        })
    }
}

/// The complete persisted state of a [`SolarSystem`]: format version, creation date,
/// simulation timestamp, the relativity flag, and the body records packed in a
/// checksummed byte payload.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot {
    pub version: Semver,
    pub creation_date: Epoch,
    pub epoch: Epoch,
    pub use_general_relativity: bool,
    pub body_count: u32,
    pub data_checksum: u32,
    pub bytes: Bytes,
}

impl SimulationSnapshot {
    /// Captures the provided simulation into a snapshot.
    pub fn from_solar_system(solar: &SolarSystem) -> Result<Self, SnapshotError> {
        let mut buf = vec![];
        for (name, particle) in solar.system.iter() {
            let (role, center, diameter_m) = match solar.constants().get(name) {
                Some(body) => (
                    BodyRecord::role_of(body.role),
                    body.center.unwrap_or("").to_string(),
                    body.diameter_m,
                ),
                None => (BodyRecord::ROLE_FREE, String::new(), 0.0),
            };
            let record = BodyRecord {
                name: name.clone(),
                role,
                center,
                mass_kg: particle.mass_kg(),
                mu_m3_s2: particle.mu_m3_s2(),
                diameter_m,
                position_m: particle.position_m.into(),
                velocity_m_s: particle.velocity_m_s.into(),
            };
            record
                .encode_to_vec(&mut buf)
                .map_err(|err| DecodingError::DecodingDer { err })
                .context(SnapDecodingSnafu {
                    action: "encoding a body record",
                })?;
        }
        let bytes = Bytes::from(buf);
        let data_checksum = crc32fast::hash(&bytes);
        Ok(Self {
            version: SNAPSHOT_VERSION,
            creation_date: Epoch::now().unwrap_or(solar.epoch()),
            epoch: solar.epoch(),
            use_general_relativity: solar.system.use_general_relativity,
            body_count: solar.system.len() as u32,
            data_checksum,
            bytes,
        })
    }

    /// Compute the CRC32 of the underlying bytes
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(&self.bytes)
    }

    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let computed = self.crc32();
        if computed == self.data_checksum {
            Ok(())
        } else {
            error!(
                "[integrity] expected hash {} but computed {computed}",
                self.data_checksum
            );
            Err(IntegrityError::ChecksumInvalid {
                expected: self.data_checksum,
                computed,
            })
        }
    }

    /// Decodes the packed body records, verifying the declared count.
    pub fn records(&self) -> Result<Vec<BodyRecord>, SnapshotError> {
        let mut reader = SliceReader::new(&self.bytes)
            .map_err(|err| DecodingError::DecodingDer { err })
            .context(SnapDecodingSnafu {
                action: "opening the body records",
            })?;
        let mut records = Vec::with_capacity(self.body_count as usize);
        for _ in 0..self.body_count {
            let record: BodyRecord = reader
                .decode()
                .map_err(|err| DecodingError::DecodingDer { err })
                .context(SnapDecodingSnafu {
                    action: "decoding a body record",
                })?;
            if record.role > BodyRecord::ROLE_FREE {
                return Err(SnapshotError::SnapDecoding {
                    action: "validating a body record",
                    source: DecodingError::UnknownRole { tag: record.role },
                });
            }
            record.check_finite().context(SnapIntegritySnafu)?;
            records.push(record);
        }
        if !reader.is_finished() {
            // Trailing bytes mean the payload holds more records than declared.
            return Err(SnapshotError::SnapDecoding {
                action: "checking for trailing data",
                source: DecodingError::BodyCount {
                    declared: self.body_count,
                    decoded: self.body_count + 1,
                },
            });
        }
        Ok(records)
    }

    /// Try to load a snapshot from a pointer of bytes, checking the integrity first.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        match Self::from_der(bytes) {
            Ok(snap) => {
                trace!("[try_from_bytes] loaded snapshot successfully");
                if snap.version != SNAPSHOT_VERSION {
                    return Err(SnapshotError::SnapDecoding {
                        action: "checking the snapshot version",
                        source: DecodingError::FormatVersion {
                            got: snap.version,
                            exp: SNAPSHOT_VERSION,
                        },
                    });
                }
                snap.check_integrity().context(SnapIntegritySnafu)?;
                Ok(snap)
            }
            Err(_) => {
                // If the whole structure does not parse, try the version alone to be
                // helpful about incompatible files.
                let version_bytes = bytes
                    .get(0..5)
                    .ok_or(DecodingError::InaccessibleBytes {
                        start: 0,
                        end: 5,
                        size: bytes.len(),
                    })
                    .context(SnapDecodingSnafu {
                        action: "checking the snapshot version",
                    })?;
                match Semver::from_der(version_bytes) {
                    Ok(version) if version != SNAPSHOT_VERSION => {
                        Err(SnapshotError::SnapDecoding {
                            action: "checking the snapshot version",
                            source: DecodingError::FormatVersion {
                                got: version,
                                exp: SNAPSHOT_VERSION,
                            },
                        })
                    }
                    Ok(_) => Err(SnapshotError::SnapDecoding {
                        action: "loading the snapshot",
                        source: DecodingError::InaccessibleBytes {
                            start: 0,
                            end: bytes.len(),
                            size: bytes.len(),
                        },
                    }),
                    Err(err) => {
                        error!("snapshot bytes not in HELION format");
                        Err(SnapshotError::SnapDecoding {
                            action: "loading the version",
                            source: DecodingError::DecodingDer { err },
                        })
                    }
                }
            }
        }
    }

    /// Loads a snapshot from the provided file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = file2heap!(path).context(SnapReadSnafu)?;
        Self::try_from_bytes(&bytes)
    }

    /// Saves this snapshot to the provided file. When `overwrite` is false and the file
    /// exists, the operation is refused.
    pub fn save_as<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if path.exists() {
            if !overwrite {
                return Err(SnapshotError::SnapIO {
                    action: "creating the snapshot file",
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "file exists and overwrite flag set to false",
                    ),
                });
            }
            warn!("[save_as] overwriting {}", path.display());
        }

        let mut buf = vec![];
        self.encode_to_vec(&mut buf)
            .map_err(|err| DecodingError::DecodingDer { err })
            .context(SnapDecodingSnafu {
                action: "encoding the snapshot",
            })?;
        let mut file = File::create(path).context(SnapIOSnafu {
            action: "creating the snapshot file",
        })?;
        file.write_all(&buf).context(SnapIOSnafu {
            action: "writing the snapshot to the file",
        })?;
        info!("[OK] snapshot saved to {}", path.display());
        Ok(())
    }
}

impl Encode for SimulationSnapshot {
    fn encoded_len(&self) -> der::Result<der::Length> {
        let (centuries, nanoseconds) = self.epoch.to_tai_parts();
        self.version.encoded_len()?
            + Utf8StringRef::new(&format!("{}", self.creation_date))?.encoded_len()?
            + centuries.encoded_len()?
            + nanoseconds.encoded_len()?
            + (self.use_general_relativity as u8).encoded_len()?
            + self.body_count.encoded_len()?
            + self.data_checksum.encoded_len()?
            + OctetStringRef::new(&self.bytes)?.encoded_len()?
    }

    fn encode(&self, encoder: &mut impl Writer) -> der::Result<()> {
        let (centuries, nanoseconds) = self.epoch.to_tai_parts();
        self.version.encode(encoder)?;
        Utf8StringRef::new(&format!("{}", self.creation_date))?.encode(encoder)?;
        centuries.encode(encoder)?;
        nanoseconds.encode(encoder)?;
        (self.use_general_relativity as u8).encode(encoder)?;
        self.body_count.encode(encoder)?;
        self.data_checksum.encode(encoder)?;
        OctetStringRef::new(&self.bytes)?.encode(encoder)
    }
}

impl<'a> Decode<'a> for SimulationSnapshot {
    fn decode<R: Reader<'a>>(decoder: &mut R) -> der::Result<Self> {
        let version = decoder.decode()?;
        let creation_date =
            Epoch::from_str(decoder.decode::<Utf8StringRef<'a>>()?.as_str()).unwrap();
        let centuries: i16 = decoder.decode()?;
        let nanoseconds: u64 = decoder.decode()?;
        let gr_flag: u8 = decoder.decode()?;
        let body_count = decoder.decode()?;
        let data_checksum = decoder.decode()?;
        let bytes: OctetStringRef = decoder.decode()?;
        Ok(Self {
            version,
            creation_date,
            epoch: Epoch::from_tai_parts(centuries, nanoseconds),
            use_general_relativity: gr_flag != 0,
            body_count,
            data_checksum,
            bytes: Bytes::copy_from_slice(bytes.as_bytes()),
        })
    }
}

impl fmt::Display for SimulationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HELION snapshot v{} at {} with {} bodies",
            self.version, self.epoch, self.body_count
        )
    }
}

impl SolarSystem {
    /// Serializes the full simulation state to the provided file. A failure leaves any
    /// prior on-disk state unaffected.
    pub fn save_state<P: AsRef<Path>>(&self, path: P) -> Result<(), SimulationError> {
        let snapshot = SimulationSnapshot::from_solar_system(self).context(SnapshotSnafu {
            action: "saving the simulation state",
        })?;
        snapshot.save_as(path, true).context(SnapshotSnafu {
            action: "saving the simulation state",
        })
    }

    /// Restores the full simulation state from the provided file. On any failure the
    /// running simulation is left exactly as it was.
    pub fn load_state<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SimulationError> {
        let snapshot = SimulationSnapshot::load(path).context(SnapshotSnafu {
            action: "loading the simulation state",
        })?;
        *self = Self::from_snapshot(&snapshot)?;
        Ok(())
    }

    /// Rebuilds a simulation from a snapshot: the particle map in its stored order, the
    /// timestamp, the relativity flag, and the oblate strategies from the catalogue.
    pub fn from_snapshot(snapshot: &SimulationSnapshot) -> Result<Self, SimulationError> {
        let records = snapshot.records().context(SnapshotSnafu {
            action: "decoding the simulation state",
        })?;

        let constants = crate::bodies::Constants::builtin();
        let ephemeris = crate::ephemeris::kepler::KeplerEphemeris::from_constants(&constants);
        let mut system = crate::propagation::ParticleSystem::new();
        system.use_general_relativity = snapshot.use_general_relativity;

        for record in &records {
            let mut particle = Particle::new(
                record.mass_kg,
                Vector3::from(record.position_m),
                Vector3::from(record.velocity_m_s),
            );
            particle.set_mu_m3_s2(record.mu_m3_s2);
            if let Some(oblateness) = constants.get(&record.name).and_then(|b| b.oblateness) {
                let model = crate::dynamics::OblateGravity::try_new(
                    oblateness.oblate_mu_m3_s2,
                    oblateness.eq_radius_m,
                    oblateness.zonal,
                    oblateness.pole,
                )
                .context(super::PhysicsSnafu {
                    action: "rebuilding the oblate attractors",
                })?;
                particle = particle.with_oblateness(model);
            }
            system.insert(&record.name, particle);
        }

        let mut me = Self {
            constants,
            ephemeris,
            system,
            epoch: snapshot.epoch,
            stepped: true,
            traces: indexmap::IndexMap::new(),
        };
        me.refresh_traces();
        Ok(me)
    }
}
