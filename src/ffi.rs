//! C ABI bindings for embedding the draining model in native front ends

use crate::cli_api::{compute_scenario, ScenarioInputs};
use crate::draining::water_height;
use crate::jet::jet_drop;
use std::os::raw::{c_double, c_int};
use std::ptr;

pub const FFI_OK: c_int = 0;
pub const FFI_NULL_POINTER: c_int = -1;
pub const FFI_INVALID_INPUT: c_int = -2;

// FFI-safe structures with C-compatible layouts

#[repr(C)]
pub struct FFIScenarioInputs {
    pub container_diameter: c_double, // m
    pub orifice_diameter: c_double,   // m
    pub orifice_height: c_double,     // m
    pub max_time: c_double,           // s
}

#[repr(C)]
#[derive(Default)]
pub struct FFIScenarioSummary {
    pub exit_velocity: c_double,    // m/s
    pub max_range: c_double,        // m
    pub flow_rate: c_double,        // m³/s
    pub total_liters: c_double,     // l
    pub impact_time: c_double,      // s
    pub outflow_end_time: c_double, // s, NAN when there is no outflow
}

#[repr(C)]
pub struct FFIHeadProfile {
    pub times: *mut c_double,
    pub heads: *mut c_double,
    pub count: c_int,
}

fn convert_inputs(inputs: &FFIScenarioInputs) -> ScenarioInputs {
    ScenarioInputs {
        container_diameter: inputs.container_diameter,
        orifice_diameter: inputs.orifice_diameter,
        orifice_height: inputs.orifice_height,
        max_time: inputs.max_time,
    }
}

// Water level at a given time for the given areas
#[no_mangle]
pub extern "C" fn torricelli_water_height(
    time_s: c_double,
    container_area: c_double,
    orifice_area: c_double,
) -> c_double {
    water_height(time_s, container_area, orifice_area)
}

// Jet drop below the orifice at a horizontal distance
#[no_mangle]
pub extern "C" fn torricelli_jet_drop(x_m: c_double, velocity_mps: c_double) -> c_double {
    jet_drop(x_m, velocity_mps)
}

// Compute the scenario summary into `out`
#[no_mangle]
pub extern "C" fn torricelli_compute_summary(
    inputs: *const FFIScenarioInputs,
    out: *mut FFIScenarioSummary,
) -> c_int {
    if inputs.is_null() || out.is_null() {
        return FFI_NULL_POINTER;
    }

    let inputs = unsafe { &*inputs };
    let result = match compute_scenario(convert_inputs(inputs)) {
        Ok(result) => result,
        Err(_) => return FFI_INVALID_INPUT,
    };

    let summary = result.summary;
    let out = unsafe { &mut *out };
    *out = FFIScenarioSummary {
        exit_velocity: summary.exit_velocity,
        max_range: summary.max_range,
        flow_rate: summary.flow_rate,
        total_liters: summary.total_liters,
        impact_time: summary.impact_time,
        outflow_end_time: summary.outflow_end_time.unwrap_or(f64::NAN),
    };
    FFI_OK
}

// Height above the orifice over time; free with `torricelli_free_head_profile`
#[no_mangle]
pub extern "C" fn torricelli_compute_head_profile(
    inputs: *const FFIScenarioInputs,
) -> *mut FFIHeadProfile {
    if inputs.is_null() {
        return ptr::null_mut();
    }

    let inputs = unsafe { &*inputs };
    let result = match compute_scenario(convert_inputs(inputs)) {
        Ok(result) => result,
        Err(_) => return ptr::null_mut(),
    };

    let count = result.times.len();
    let mut times = result.times.into_boxed_slice();
    let mut heads = result.heads.into_boxed_slice();
    let profile = Box::new(FFIHeadProfile {
        times: times.as_mut_ptr(),
        heads: heads.as_mut_ptr(),
        count: count as c_int,
    });
    // Ownership moves to the caller until the free call
    std::mem::forget(times);
    std::mem::forget(heads);

    Box::into_raw(profile)
}

// Free a profile returned by `torricelli_compute_head_profile`
#[no_mangle]
pub extern "C" fn torricelli_free_head_profile(profile: *mut FFIHeadProfile) {
    if !profile.is_null() {
        unsafe {
            let profile = Box::from_raw(profile);
            let count = profile.count as usize;
            if !profile.times.is_null() {
                drop(Vec::from_raw_parts(profile.times, count, count));
            }
            if !profile.heads.is_null() {
                drop(Vec::from_raw_parts(profile.heads, count, count));
            }
        }
    }
}
