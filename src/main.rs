#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

pub mod icons;
pub mod logger;
mod api;
mod reader;

use gpui::*;
use gpui_component::*;
use reader::ReaderViewer;

const WINDOW_SIZE_TREE: &str = "window_size";
const WINDOW_SIZE_KEY_WIDTH: &str = "width";
const WINDOW_SIZE_KEY_HEIGHT: &str = "height";
const LOCAL_STATE_DB_DIR_NAME: &str = "mikan_db";

const DEFAULT_WINDOW_WIDTH: f32 = 1080.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 840.0;

fn window_size_db_path() -> std::path::PathBuf {
    if let Some(app_data) = std::env::var_os("APPDATA") {
        return std::path::PathBuf::from(app_data)
            .join("mikan")
            .join(LOCAL_STATE_DB_DIR_NAME);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return std::path::PathBuf::from(home)
            .join(".mikan")
            .join(LOCAL_STATE_DB_DIR_NAME);
    }
    std::path::PathBuf::from(LOCAL_STATE_DB_DIR_NAME)
}

fn load_saved_window_size() -> Option<(f32, f32)> {
    let db_path = window_size_db_path();
    let db = match sled::open(&db_path) {
        Ok(db) => db,
        Err(_) => return None,
    };
    let store = match db.open_tree(WINDOW_SIZE_TREE) {
        Ok(tree) => tree,
        Err(_) => return None,
    };
    let width_bytes = store.get(WINDOW_SIZE_KEY_WIDTH).ok().flatten()?;
    let height_bytes = store.get(WINDOW_SIZE_KEY_HEIGHT).ok().flatten()?;
    if width_bytes.len() != 4 || height_bytes.len() != 4 {
        return None;
    }
    let width = f32::from_be_bytes(width_bytes.as_ref().try_into().ok()?);
    let height = f32::from_be_bytes(height_bytes.as_ref().try_into().ok()?);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width, height))
}

fn main() {
    logger::initialize();

    let app = Application::new().with_assets(icons::Assets);

    app.run(move |cx| {
        gpui_component::init(cx);
        Theme::change(cx.window_appearance(), None, cx);

        #[cfg(target_os = "macos")]
        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        cx.spawn(async move |cx| {
            let (width, height) =
                load_saved_window_size().unwrap_or((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
            let window_bounds =
                cx.update(|app| WindowBounds::centered(size(px(width), px(height)), app))?;

            let window_options = WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some("Mikan".into()),
                    ..TitlebarOptions::default()
                }),
                window_bounds: Some(window_bounds),
                ..WindowOptions::default()
            };

            cx.open_window(window_options, |window, cx| {
                let view = cx.new(|cx| ReaderViewer::new(window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })?;
            Ok::<_, anyhow::Error>(())
        })
        .detach();

        cx.activate(true);
    });
}
