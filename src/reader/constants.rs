const TITLE_BAR_HEIGHT: f32 = 44.0;
const FOOTER_HEIGHT: f32 = 30.0;
const PROGRESS_BAR_HEIGHT: f32 = 3.0;
const SIDEBAR_WIDTH: f32 = 260.0;
const NARROW_VIEWPORT_WIDTH: f32 = 768.0;

const CLICK_ZONE_WIDTH: f32 = 110.0;
const THUMB_STRIP_HEIGHT: f32 = 84.0;
const THUMB_TILE_WIDTH: f32 = 48.0;

const FALLBACK_PAGE_ASPECT: f32 = 1.4;
const COLUMN_PAGE_GAP: f32 = 8.0;

const SAVE_DEBOUNCE_MS: u64 = 600;
const SCROLL_SYNC_DELAY_MS: u64 = 120;
const TOAST_DURATION_MS: u64 = 3000;

// A trackpad pinch reaches the app as a ctrl/meta-modified wheel stream; the
// stream is mapped onto a synthetic two-finger span for the recognizer and
// the session ends after a quiet period.
const PINCH_BASE_SPAN: f32 = 200.0;
const PINCH_SPAN_MIN: f32 = 20.0;
const PINCH_SPAN_MAX: f32 = 2000.0;
const PINCH_WHEEL_SPAN_FACTOR: f32 = 0.01;
const PINCH_IDLE_END_MS: u64 = 350;
const WHEEL_LINE_PIXELS: f32 = 24.0;

const PAGE_MAX_PARALLEL_TASKS: usize = 3;
const PAGE_BATCH_SIZE: usize = 4;
const SINGLE_PRELOAD_RADIUS: usize = 2;
const NEXT_CHAPTER_PRELOAD_PAGES: usize = 5;

const READER_POSITION_TREE: &str = "reader_position";
const READER_POSITION_KEY: &str = "current";
const WINDOW_SIZE_TREE: &str = "window_size";
const WINDOW_SIZE_KEY_WIDTH: &str = "width";
const WINDOW_SIZE_KEY_HEIGHT: &str = "height";
