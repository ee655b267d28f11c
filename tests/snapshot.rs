/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use helion::prelude::*;
use helion::system::snapshot::SnapshotError;
use std::fs;

fn scratch_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(name)
}

/// Saving after a day of propagation and loading into a fresh simulation restores every
/// particle bit-for-bit, along with the timestamp and the iteration order.
#[test]
fn save_load_roundtrip_is_exact() {
    let mut solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    solar.advance_forward(24);

    let path = scratch_file("helion_roundtrip.shs");
    solar.save_state(&path).unwrap();

    let snapshot = SimulationSnapshot::load(&path).unwrap();
    let restored = SolarSystem::from_snapshot(&snapshot).unwrap();

    assert_eq!(restored.epoch(), solar.epoch());
    assert_eq!(restored.system.len(), solar.system.len());
    for ((name_a, original), (name_b, loaded)) in
        solar.system.iter().zip(restored.system.iter())
    {
        assert_eq!(name_a, name_b, "iteration order changed");
        assert_eq!(loaded.position_m, original.position_m, "{name_a} position");
        assert_eq!(loaded.velocity_m_s, original.velocity_m_s, "{name_a} velocity");
        assert_eq!(loaded.mass_kg(), original.mass_kg(), "{name_a} mass");
        assert_eq!(loaded.mu_m3_s2(), original.mu_m3_s2(), "{name_a} mu");
        assert_eq!(
            loaded.model.is_oblate(),
            original.model.is_oblate(),
            "{name_a} strategy"
        );
    }

    fs::remove_file(path).unwrap();
}

/// `load_state` replaces the running simulation, and the restored system keeps propagating
/// identically to the one that was saved.
#[test]
fn load_state_resumes_the_propagation() {
    let mut saved = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    saved.advance_forward(10);
    let path = scratch_file("helion_resume.shs");
    saved.save_state(&path).unwrap();

    let mut resumed = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2010, 3, 4)).unwrap();
    resumed.load_state(&path).unwrap();
    assert_eq!(resumed.epoch(), saved.epoch());

    saved.advance_forward(24);
    resumed.advance_forward(24);
    for (name, particle) in saved.system.iter() {
        let (pos, vel) = resumed.state_of(name).unwrap();
        assert_eq!(pos, particle.position_m, "{name} diverged after resume");
        assert_eq!(vel, particle.velocity_m_s, "{name} diverged after resume");
    }

    fs::remove_file(path).unwrap();
}

/// A truncated file is refused and the running simulation is untouched.
#[test]
fn malformed_files_leave_the_simulation_unchanged() {
    let start = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
    let mut solar = SolarSystem::try_new(start).unwrap();
    solar.advance_forward(3);
    let epoch_before = solar.epoch();

    let good = scratch_file("helion_truncated.shs");
    solar.save_state(&good).unwrap();
    let mut bytes = fs::read(&good).unwrap();
    bytes.truncate(bytes.len() / 2);
    let bad = scratch_file("helion_truncated_bad.shs");
    fs::write(&bad, &bytes).unwrap();

    assert!(matches!(
        solar.load_state(&bad),
        Err(helion::system::SimulationError::Snapshot { .. })
    ));
    assert_eq!(solar.epoch(), epoch_before);

    // A missing file surfaces the IO failure the same way.
    assert!(SimulationSnapshot::load(scratch_file("helion_no_such_file.shs")).is_err());
    // And corrupting a byte of the payload trips the checksum.
    let mut corrupt = fs::read(&good).unwrap();
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0xff;
    let corrupted = scratch_file("helion_corrupt.shs");
    fs::write(&corrupted, &corrupt).unwrap();
    assert!(matches!(
        SimulationSnapshot::load(&corrupted),
        Err(SnapshotError::SnapIntegrity { .. } | SnapshotError::SnapDecoding { .. })
    ));

    fs::remove_file(good).unwrap();
    fs::remove_file(bad).unwrap();
    fs::remove_file(corrupted).unwrap();
}
