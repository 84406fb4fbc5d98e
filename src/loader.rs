use hero_core::{HeroError, Renderer, SharedHero};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Fetch and parse the model in the background, then hand the result to the
/// hero. Bytes arriving after teardown are discarded unparsed.
pub fn spawn_model_load<R: Renderer + 'static>(path: String, hero: &SharedHero<R>) {
    let hero = hero.clone();
    spawn_local(async move {
        let bytes = fetch_bytes(&path).await;
        match hero.try_borrow_mut() {
            Ok(mut hero) => {
                hero.model_fetched(bytes);
            }
            Err(_) => log::warn!("[loader] scene busy; dropped {}", path),
        }
    });
}

pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, HeroError> {
    let fail = |reason: String| HeroError::Fetch {
        path: path.to_string(),
        reason,
    };
    let window = web::window().ok_or_else(|| fail("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?
        .dyn_into::<web::Response>()
        .map_err(|e| fail(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(fail(format!("HTTP {}", resp.status())));
    }
    let promise = resp.array_buffer().map_err(|e| fail(format!("{:?}", e)))?;
    let buf = JsFuture::from(promise)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
    log::info!("[loader] fetched {} ({} bytes)", path, bytes.len());
    Ok(bytes)
}
