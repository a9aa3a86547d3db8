// WASM bindings so a browser front end can drive the scenario solver
use wasm_bindgen::prelude::*;

use crate::cli_api::{ScenarioInputs, TorricelliError};
use crate::report::JsonReport;

#[wasm_bindgen]
pub struct WasmTorricelli;

fn to_js(err: TorricelliError) -> JsValue {
    JsValue::from_str(err.message())
}

#[wasm_bindgen]
impl WasmTorricelli {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        WasmTorricelli
    }

    /// Solve one scenario and return the JSON report (summary plus the four charts)
    #[wasm_bindgen(js_name = computeScenario)]
    pub fn compute_scenario(
        &self,
        container_diameter: f64,
        orifice_diameter: f64,
        orifice_height: f64,
        max_time: f64,
    ) -> Result<String, JsValue> {
        let inputs = ScenarioInputs {
            container_diameter,
            orifice_diameter,
            orifice_height,
            max_time,
        };
        JsonReport::for_inputs(inputs).map_err(to_js)
    }
}

impl Default for WasmTorricelli {
    fn default() -> Self {
        Self::new()
    }
}
