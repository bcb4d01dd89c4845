//! Integration tests for IERS EOP (finals2000A.all) loading.
//!
//! Requires the finals2000A.all data file. Skips gracefully if absent.

use std::path::Path;

use cirs_time::{EopKernel, EopProvider, JulianDate};

const EOP_PATH: &str = "../../data/finals2000A.all";

fn load_eop() -> Option<EopKernel> {
    if !Path::new(EOP_PATH).exists() {
        eprintln!("Skipping eop_integration: {EOP_PATH} not found");
        return None;
    }
    EopKernel::load(Path::new(EOP_PATH)).ok()
}

#[test]
fn load_real_file() {
    let Some(eop) = load_eop() else { return };
    let data = eop.data();
    assert!(
        data.len() > 10_000,
        "Expected >10000 entries, got {}",
        data.len()
    );
}

#[test]
fn values_within_physical_bounds() {
    let Some(eop) = load_eop() else { return };
    let data = eop.data();
    let (start, end) = data.range();
    let mut mjd = start;
    while mjd <= end {
        let rec = data.at_mjd(mjd).unwrap();
        assert!(rec.dut1.abs() < 0.9, "DUT1 at MJD {mjd} = {}", rec.dut1);
        assert!(rec.x_pole.abs() < 1.0 && rec.y_pole.abs() < 1.0);
        if let (Some(dx), Some(dy)) = (rec.dx, rec.dy) {
            // Celestial pole offsets stay well below 1 mas for 2000A.
            assert!(dx.abs() < 5.0 && dy.abs() < 5.0, "dX/dY at MJD {mjd}");
        }
        mjd += 100.0;
    }
}

#[test]
fn pole_offsets_on_2020_jan_1() {
    let Some(eop) = load_eop() else { return };
    let mjd = 58849.0;
    let (start, end) = eop.data().range();
    if mjd < start || mjd > end {
        eprintln!("EOP file doesn't cover 2020-01-01, skipping");
        return;
    }
    let resp = eop.lookup(JulianDate::from_mjd(mjd)).unwrap();
    let (dx, dy) = (resp.dx.unwrap(), resp.dy.unwrap());
    // A few tenths of a milliarcsecond, in radians.
    assert!(dx.abs() < 5e-9 && dy.abs() < 5e-9, "dX {dx} dY {dy}");
}
