mod dom;
mod scheduler;

pub use dom::*;
pub use scheduler::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::api::RunConfig;
use common::results::{self, MapDimensions, Mode};
use common::{GameData, PlaybackSession};
use wasm_bindgen::prelude::*;

type Session = PlaybackSession<DomView, IntervalScheduler>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

/// Step-by-step replay of a recorded game in the page.
#[wasm_bindgen]
pub struct Visualizer {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl Visualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(game_data_json: &str, handles: DomHandles) -> Result<Visualizer, JsValue> {
        let data = GameData::from_json(game_data_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse game data: {}", e)))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;

        let (width, height) = data
            .snapshots
            .first()
            .map(|first| (first.width(), first.height()))
            .unwrap_or((0, 0));
        let view = DomView::mount(document, handles, width, height)?;

        let slot: SessionSlot<DomView> = Rc::default();
        let scheduler = IntervalScheduler::new(window, slot.clone());
        let session = PlaybackSession::new(data, view, scheduler)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = Rc::new(RefCell::new(session));
        *slot.borrow_mut() = Rc::downgrade(&session);
        Ok(Visualizer { session })
    }

    pub fn first(&self) {
        self.session.borrow_mut().first();
    }

    pub fn previous(&self) {
        self.session.borrow_mut().previous();
    }

    pub fn next(&self) {
        self.session.borrow_mut().next();
    }

    pub fn last(&self) {
        self.session.borrow_mut().last();
    }

    pub fn play(&self) {
        self.session.borrow_mut().play();
    }

    pub fn pause(&self) {
        self.session.borrow_mut().pause();
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, period_ms: u32) {
        self.session
            .borrow_mut()
            .set_speed(Duration::from_millis(period_ms.into()));
    }

    pub fn cursor(&self) -> usize {
        self.session.borrow().cursor()
    }

    pub fn len(&self) -> usize {
        self.session.borrow().len()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.session.borrow().is_playing()
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.pause();
        }
    }
}

/// HTML for the results panel. `map_text` is the content of the map the run
/// used, when the page could fetch it.
#[wasm_bindgen(js_name = renderResults)]
pub fn render_results(mode: &str, content: Option<String>, map_text: Option<String>) -> String {
    let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
        return results::html::render_no_results();
    };
    let dims = map_text
        .as_deref()
        .map(MapDimensions::parse)
        .unwrap_or_default();
    results::html::render_view(&results::interpret(mode, &content), dims)
}

/// Structured parse of result text as JSON, for pages that draw it
/// themselves.
#[wasm_bindgen(js_name = parseResults)]
pub fn parse_results_json(mode: &str, content: &str) -> Result<String, JsValue> {
    let mode: Mode = mode
        .parse()
        .map_err(|e: common::ParseError| JsValue::from_str(&e.to_string()))?;
    let parsed = results::parse(mode, content).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&parsed)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize results: {}", e)))
}

#[wasm_bindgen(js_name = commandPreview)]
pub fn command_preview(config_json: &str) -> Result<String, JsValue> {
    let config: RunConfig = serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid run configuration: {}", e)))?;
    Ok(config.command_preview())
}

#[wasm_bindgen(js_name = escapeHtml)]
pub fn escape_html(text: &str) -> String {
    results::html::escape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_show_placeholder() {
        assert!(render_results("basic", None, None).contains("No results available"));
        assert!(render_results("basic", Some("  \n".into()), None).contains("No results available"));
    }

    #[test]
    fn unknown_mode_falls_back_to_raw_text() {
        let html = render_results("tournament", Some("a < b".into()), None);
        assert_eq!(html, "<pre>a &lt; b</pre>");
    }

    #[test]
    fn preview_from_page_json() {
        let preview = command_preview(
            r#"{"mode":"basic","gameMap":"m.txt","gameManager":"gm.so","algorithm1":"a.so","algorithm2":"b.so"}"#,
        )
        .unwrap();
        assert!(preview.ends_with(
            r#"-basic gameMap="m.txt" gameManager="gm.so" algorithm1="a.so" algorithm2="b.so""#
        ));
    }
}
