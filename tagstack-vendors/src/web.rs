//! `VendorClient` backed by a global function on `window`.

use crate::client::{VendorCall, VendorClient};
use crate::error::ClientError;
use js_sys::{Array, Function, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};

fn js_err(value: JsValue) -> ClientError {
    ClientError::Rejected(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Calls `window[name](command, target?, params?)`.
#[derive(Debug, Clone)]
pub struct GlobalFunctionClient {
    name: &'static str,
    stub: &'static str,
    clear_on_reset: bool,
}

impl GlobalFunctionClient {
    /// `window.gtag`, queueing into `window.dataLayer` until `gtag.js` loads.
    pub fn gtag() -> Self {
        Self {
            name: "gtag",
            stub: "window.dataLayer = window.dataLayer || [];\
                   window.gtag = window.gtag || function(){ window.dataLayer.push(arguments); };",
            clear_on_reset: false,
        }
    }

    /// `window.fbq`, queueing into `fbq.queue` until `fbevents.js` loads.
    pub fn fbq() -> Self {
        Self {
            name: "fbq",
            stub: "if (!window.fbq) {\
                     var n = window.fbq = function(){ n.queue.push(Array.prototype.slice.call(arguments)); };\
                     n.queue = [];\
                   }",
            clear_on_reset: true,
        }
    }

    fn function(&self) -> Result<Function, ClientError> {
        let window = web_sys::window().ok_or_else(|| ClientError::NotLoaded(self.name.into()))?;
        Reflect::get(&window, &JsValue::from_str(self.name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ClientError::NotLoaded(self.name.into()))
    }
}

impl VendorClient for GlobalFunctionClient {
    fn install(&self) -> Result<(), ClientError> {
        Function::new_no_args(self.stub)
            .call0(&JsValue::NULL)
            .map(|_| ())
            .map_err(js_err)
    }

    fn call(&self, call: VendorCall) -> Result<(), ClientError> {
        let function = self.function()?;

        let args = Array::new();
        args.push(&JsValue::from_str(&call.command));
        if let Some(target) = &call.target {
            args.push(&JsValue::from_str(target));
        }
        if let Some(params) = &call.params {
            let encoded = serde_json::to_string(params)?;
            args.push(&JSON::parse(&encoded).map_err(js_err)?);
        }

        function.apply(&JsValue::NULL, &args).map(|_| ()).map_err(js_err)
    }

    fn reset(&self) {
        if !self.clear_on_reset {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = Reflect::set(&window, &JsValue::from_str(self.name), &JsValue::UNDEFINED);
        }
    }
}
