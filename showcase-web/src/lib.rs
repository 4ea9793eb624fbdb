/// Showcase Web - the scroll-driven stage exposed to JavaScript
///
/// The page owns rendering and the frame loop; each frame it hands the
/// stage a scroll progress and reads back the pose and material mode to
/// apply to its own scene graph. Model bytes are fetched by the page and
/// passed in once they arrive.
use showcase_core::{AssetError, AssetHandle, AssetLoader, SceneHost, Showcase};
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebShowcase {
    stage: Showcase,
    asset: Option<AssetHandle>,
}

#[wasm_bindgen]
impl WebShowcase {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebShowcase {
        WebShowcase {
            stage: Showcase::default(),
            asset: None,
        }
    }

    /// Hand over the fetched model. Parse failures keep the placeholder.
    #[wasm_bindgen(js_name = loadStl)]
    pub fn load_stl(&mut self, name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let result = AssetLoader::from_bytes(name, bytes);
        let message = result.as_ref().err().map(|e| e.to_string());
        self.asset = Some(match result {
            Ok(model) => AssetHandle::ready(model),
            Err(e) => AssetHandle::failed(name, e),
        });
        match message {
            Some(message) => Err(JsValue::from_str(&message)),
            None => Ok(()),
        }
    }

    /// The page could not fetch the model; stay on the placeholder
    #[wasm_bindgen(js_name = failLoad)]
    pub fn fail_load(&mut self, name: &str) {
        self.asset = Some(AssetHandle::failed(name, AssetError::Canceled));
    }

    /// Advance one frame. Returns the new mode name when it changed.
    pub fn tick(&mut self, progress: Option<f64>, dt_seconds: f64) -> Option<String> {
        if let Some(asset) = self.asset.as_mut() {
            self.stage.poll_assets(asset);
        }
        let dt = frame_delta(dt_seconds);
        self.stage
            .frame(progress, dt)
            .map(|change| change.to.name().to_string())
    }

    /// Current page scroll progress in the browser window
    #[wasm_bindgen(js_name = pageProgress)]
    pub fn page_progress() -> Option<f64> {
        let window = web_sys::window()?;
        let root = window.document()?.document_element()?;
        let viewport = window.inner_height().ok()?.as_f64()?;
        let scrollable = root.scroll_height() as f64 - viewport;
        if scrollable <= 0.0 {
            return Some(0.0);
        }
        let scrolled = window.scroll_y().ok()?;
        Some((scrolled / scrollable).clamp(0.0, 1.0))
    }

    #[wasm_bindgen(getter, js_name = rotationX)]
    pub fn rotation_x(&self) -> f32 {
        self.stage.active_model().rotation().x
    }

    #[wasm_bindgen(getter, js_name = rotationY)]
    pub fn rotation_y(&self) -> f32 {
        self.stage.active_model().rotation().y
    }

    #[wasm_bindgen(getter, js_name = positionX)]
    pub fn position_x(&self) -> f32 {
        self.stage.active_model().pose.position.x
    }

    #[wasm_bindgen(getter, js_name = floatY)]
    pub fn float_y(&self) -> f32 {
        self.stage.group_pose().position.y
    }

    #[wasm_bindgen(getter)]
    pub fn wireframe(&self) -> bool {
        self.stage
            .controller()
            .state()
            .is_some_and(|state| state.wireframe())
    }

    #[wasm_bindgen(getter)]
    pub fn fallback(&self) -> bool {
        self.stage.is_fallback()
    }

    /// "loading", "ready" or "unavailable"
    #[wasm_bindgen(getter, js_name = assetStatus)]
    pub fn asset_status(&self) -> String {
        self.stage.asset_status().to_string()
    }
}

impl Default for WebShowcase {
    fn default() -> Self {
        Self::new()
    }
}

/// Negative, NaN and unrepresentable deltas count as no time passing
fn frame_delta(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
    log::debug!("showcase-web ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &[u8] = b"solid truck
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid truck
";

    #[test]
    fn test_placeholder_until_loaded() {
        let mut showcase = WebShowcase::new();
        assert_eq!(showcase.tick(Some(0.9), 0.016), None);
        assert!(showcase.fallback());
        assert!(!showcase.wireframe());
        assert_eq!(showcase.asset_status(), "loading");
    }

    #[test]
    fn test_loaded_model_switches_to_wireframe() {
        let mut showcase = WebShowcase::new();
        showcase.load_stl("truck", TRIANGLE).unwrap();
        assert_eq!(showcase.tick(Some(0.9), 0.016).as_deref(), Some("wireframe"));
        assert!(!showcase.fallback());
        assert!(showcase.wireframe());
        assert_eq!(showcase.asset_status(), "ready");
        assert!(showcase.position_x() > -2.0);
    }

    #[test]
    fn test_unusable_frame_delta_is_zero() {
        assert_eq!(frame_delta(f64::INFINITY), Duration::ZERO);
        assert_eq!(frame_delta(f64::NAN), Duration::ZERO);
        assert_eq!(frame_delta(-0.5), Duration::ZERO);
        assert_eq!(frame_delta(1e30), Duration::ZERO);
        assert_eq!(frame_delta(0.5), Duration::from_millis(500));

        let mut showcase = WebShowcase::new();
        showcase.load_stl("truck", TRIANGLE).unwrap();
        assert_eq!(showcase.tick(Some(0.3), f64::INFINITY), None);
        assert!(!showcase.wireframe());
    }

    #[test]
    fn test_failed_load_keeps_placeholder() {
        let mut showcase = WebShowcase::new();
        showcase.fail_load("truck");
        assert_eq!(showcase.tick(Some(0.7), 0.016), None);
        assert!(showcase.fallback());
        assert_eq!(showcase.asset_status(), "unavailable");
    }
}
