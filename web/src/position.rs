use geomerge_core::GeoSample;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Geolocation, PositionError, PositionOptions};

/// Bounded wait for the one-shot snap request.
const ONCE_TIMEOUT_MS: u32 = 10_000;

/// Thin wrapper over the browser geolocation API: at most one continuous
/// watch at a time, idempotent stop, and a bounded one-shot request. Each
/// sample is independent; a terminal watch error is reported through the
/// error callback after the registration is already gone browser-side.
pub(crate) struct GeoWatcher {
    watch: Option<WatchHandle>,
}

struct WatchHandle {
    id: i32,
    // closures must outlive the browser-side watch registration
    _on_sample: Closure<dyn FnMut(web_sys::Position)>,
    _on_error: Closure<dyn FnMut(PositionError)>,
}

impl GeoWatcher {
    pub(crate) fn new() -> Self {
        Self { watch: None }
    }

    fn geolocation() -> Result<Geolocation, String> {
        gloo::utils::window()
            .navigator()
            .geolocation()
            .map_err(|_| "geolocation is not available".to_owned())
    }

    fn sample_from(position: &web_sys::Position) -> GeoSample {
        let coords = position.coords();
        GeoSample {
            lat: coords.latitude(),
            lng: coords.longitude(),
            accuracy: coords.accuracy(),
        }
    }

    /// Starts the continuous watch. A no-op when one is already running.
    pub(crate) fn watch(
        &mut self,
        mut on_sample: impl FnMut(GeoSample) + 'static,
        mut on_error: impl FnMut(String) + 'static,
    ) -> Result<(), String> {
        if self.watch.is_some() {
            return Ok(());
        }

        let geolocation = Self::geolocation()?;
        let sample_cb: Closure<dyn FnMut(web_sys::Position)> =
            Closure::new(move |position: web_sys::Position| {
                on_sample(Self::sample_from(&position));
            });
        let error_cb: Closure<dyn FnMut(PositionError)> =
            Closure::new(move |err: PositionError| {
                on_error(format!("position watch failed: {}", err.message()));
            });

        let options = PositionOptions::new();
        options.set_enable_high_accuracy(true);
        let id = geolocation
            .watch_position_with_error_callback_and_options(
                sample_cb.as_ref().unchecked_ref(),
                Some(error_cb.as_ref().unchecked_ref()),
                &options,
            )
            .map_err(|err| format!("could not start position watch: {:?}", err))?;
        log::debug!("position watch {} started", id);

        self.watch = Some(WatchHandle {
            id,
            _on_sample: sample_cb,
            _on_error: error_cb,
        });
        Ok(())
    }

    /// Stops the watch. Safe to call when no watch is active, or repeatedly.
    pub(crate) fn stop(&mut self) {
        if let Some(handle) = self.watch.take() {
            log::debug!("position watch {} stopped", handle.id);
            if let Ok(geolocation) = Self::geolocation() {
                geolocation.clear_watch(handle.id);
            }
        }
    }

    /// One-shot position request. Resolves to exactly one of the callbacks
    /// within the bounded wait; the browser reports a timeout as an error.
    pub(crate) fn request_once(
        on_sample: impl FnOnce(GeoSample) + 'static,
        on_error: impl FnOnce(String) + 'static,
    ) {
        let geolocation = match Self::geolocation() {
            Ok(geolocation) => geolocation,
            Err(err) => {
                on_error(err);
                return;
            }
        };

        let sample_cb = Closure::once(move |position: web_sys::Position| {
            on_sample(Self::sample_from(&position));
        });
        let error_cb = Closure::once(move |err: PositionError| {
            on_error(format!("position request failed: {}", err.message()));
        });

        let options = PositionOptions::new();
        options.set_enable_high_accuracy(true);
        options.set_timeout(ONCE_TIMEOUT_MS);
        if let Err(err) = geolocation.get_current_position_with_error_callback_and_options(
            sample_cb.as_ref().unchecked_ref(),
            Some(error_cb.as_ref().unchecked_ref()),
            &options,
        ) {
            log::error!("could not request position: {:?}", err);
            return;
        }

        // the browser holds the only reference from here on
        sample_cb.forget();
        error_cb.forget();
    }
}

impl Drop for GeoWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
