mod chapter_list;
mod gestures;
mod menu_bar;
mod page_stage;
mod utils;
mod zoom;

use crate::api::{self, ChapterSummary, ReaderPosition, ReadingMode};
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::input::{InputEvent, InputState};
use gpui_component::{button::*, *};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

include!("types.rs");
include!("constants.rs");

use self::gestures::{GestureRecognizer, SwipeKind};
use self::utils::fetch_page_image;
use self::zoom::PanZoomController;

pub struct ReaderViewer {
    focus_handle: FocusHandle,
    client: Option<Arc<api::SourceClient>>,
    position_store: Option<sled::Tree>,
    window_size_store: Option<sled::Tree>,
    last_window_size: Option<(f32, f32)>,

    chapters: Vec<ChapterSummary>,
    current_chapter_id: Option<String>,
    pages: Vec<PageView>,
    // 1-based, clamped to [1, pages.len().max(1)].
    page_index: usize,
    mode: ReadingMode,
    nav_direction: NavDirection,
    ui_hidden: bool,
    sidebar_open: bool,
    is_loading: bool,

    chapter_epoch: u64,
    page_inflight_tasks: usize,
    page_loading: HashSet<usize>,
    image_cache: HashMap<String, (Arc<RenderImage>, (u32, u32))>,

    zoom_scale: f32,
    pan_zoom: Option<PanZoomController>,
    column_layout: zoom::ColumnLayout,
    pinch_span: f32,
    pinch_epoch: u64,
    hscroll_restore_epoch: u64,
    last_cursor: Option<Point<Pixels>>,
    gestures: GestureRecognizer,
    pan_drag_last: Option<Point<Pixels>>,

    vertical_scroll: VirtualListScrollHandle,
    stage_hscroll: ScrollHandle,
    chapter_list_scroll: ScrollHandle,
    thumb_strip_scroll: ScrollHandle,
    last_scroll_offset: Option<Point<Pixels>>,
    last_visible_range: Option<std::ops::Range<usize>>,
    scroll_sync_epoch: u64,
    suppress_scroll_sync_once: bool,

    save_epoch: u64,
    last_saved_index: Option<(String, usize)>,

    chapter_filter: String,
    chapter_filter_input: Entity<InputState>,
    chapter_filter_focused: bool,
    _chapter_filter_subscription: Subscription,

    toast: Option<Toast>,
    toast_epoch: u64,

    stage_size: (f32, f32),
    stage_origin: (f32, f32),
    needs_initial_focus: bool,
}

impl ReaderViewer {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let (position_store, window_size_store) = Self::open_persistent_stores();
        let client = match api::SourceClient::new() {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                crate::debug_log!("[api] client init failed: {:#}", err);
                None
            }
        };

        let chapter_filter_input =
            cx.new(|cx| InputState::new(window, cx).placeholder("Search chapters"));
        let chapter_filter_input_for_sub = chapter_filter_input.clone();
        let chapter_filter_subscription = cx.subscribe(
            &chapter_filter_input_for_sub,
            |this, input, event: &InputEvent, cx| match event {
                InputEvent::Change => {
                    let next_query = input.read(cx).value().to_string();
                    if this.chapter_filter != next_query {
                        this.chapter_filter = next_query;
                        cx.notify();
                    }
                }
                InputEvent::Focus => {
                    this.chapter_filter_focused = true;
                }
                InputEvent::Blur => {
                    this.chapter_filter_focused = false;
                }
                _ => {}
            },
        );

        let mut viewer = Self {
            focus_handle: cx.focus_handle(),
            client,
            position_store,
            window_size_store,
            last_window_size: None,
            chapters: Vec::new(),
            current_chapter_id: None,
            pages: Vec::new(),
            page_index: 1,
            mode: ReadingMode::Vertical,
            nav_direction: NavDirection::Forward,
            ui_hidden: false,
            sidebar_open: true,
            is_loading: false,
            chapter_epoch: 0,
            page_inflight_tasks: 0,
            page_loading: HashSet::new(),
            image_cache: HashMap::new(),
            zoom_scale: 1.0,
            pan_zoom: None,
            column_layout: zoom::ColumnLayout::default(),
            pinch_span: PINCH_BASE_SPAN,
            pinch_epoch: 0,
            hscroll_restore_epoch: 0,
            last_cursor: None,
            gestures: GestureRecognizer::default(),
            pan_drag_last: None,
            vertical_scroll: VirtualListScrollHandle::new(),
            stage_hscroll: ScrollHandle::new(),
            chapter_list_scroll: ScrollHandle::new(),
            thumb_strip_scroll: ScrollHandle::new(),
            last_scroll_offset: None,
            last_visible_range: None,
            scroll_sync_epoch: 0,
            suppress_scroll_sync_once: false,
            save_epoch: 0,
            last_saved_index: None,
            chapter_filter: String::new(),
            chapter_filter_input,
            chapter_filter_focused: false,
            _chapter_filter_subscription: chapter_filter_subscription,
            toast: None,
            toast_epoch: 0,
            stage_size: (0.0, 0.0),
            stage_origin: (0.0, 0.0),
            needs_initial_focus: true,
        };

        viewer.load_initial_state(cx);
        viewer
    }
}

include!("core.rs");
include!("navigation.rs");
include!("persistence.rs");
include!("page_rendering.rs");
include!("interactions.rs");

impl Focusable for ReaderViewer {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for ReaderViewer {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.needs_initial_focus {
            self.needs_initial_focus = false;
            cx.focus_self(window);
        }

        window.set_rem_size(cx.theme().font_size);

        let bounds = window.bounds();
        let current_size = (f32::from(bounds.size.width), f32::from(bounds.size.height));
        if self.last_window_size != Some(current_size) {
            let is_first_measure = self.last_window_size.is_none();
            self.last_window_size = Some(current_size);
            if !window.is_maximized() && !window.is_fullscreen() {
                self.save_window_size(current_size.0, current_size.1);
            }
            if !is_first_measure {
                self.handle_viewport_resized(cx);
            }
        }

        let viewport = window.viewport_size();
        let viewport_width = f32::from(viewport.width);
        let viewport_height = f32::from(viewport.height);
        let narrow = viewport_width < NARROW_VIEWPORT_WIDTH;
        let sidebar_inline = self.sidebar_open && !self.ui_hidden && !narrow;

        let chrome_height = if self.ui_hidden {
            0.0
        } else {
            TITLE_BAR_HEIGHT + FOOTER_HEIGHT + PROGRESS_BAR_HEIGHT
        };
        self.stage_size = (
            (viewport_width - if sidebar_inline { SIDEBAR_WIDTH } else { 0.0 }).max(1.0),
            (viewport_height - chrome_height).max(1.0),
        );
        self.stage_origin = (
            if sidebar_inline { SIDEBAR_WIDTH } else { 0.0 },
            if self.ui_hidden { 0.0 } else { TITLE_BAR_HEIGHT },
        );

        if self.mode == ReadingMode::Vertical {
            self.on_column_scroll_offset_changed(cx);
        }

        let toast = self.toast.clone();
        let drawer = (narrow && self.sidebar_open && !self.ui_hidden)
            .then(|| self.render_sidebar_drawer(cx));

        div()
            .size_full()
            .v_flex()
            .relative()
            .bg(cx.theme().background)
            .track_focus(&self.focus_handle)
            .capture_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                this.handle_key_down(event, window, cx);
            }))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, window, cx| {
                    this.handle_root_mouse_down(event.position, narrow, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, event: &MouseMoveEvent, _, _| {
                this.handle_root_mouse_move(event.position);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _: &MouseUpEvent, _, cx| {
                    this.handle_root_mouse_up(cx);
                }),
            )
            .when(!self.ui_hidden, |this| {
                this.child(self.render_title_bar(cx))
            })
            .child(
                h_flex()
                    .flex_1()
                    .w_full()
                    .overflow_hidden()
                    .when(sidebar_inline, |this| {
                        this.child(self.render_chapter_sidebar(narrow, cx))
                    })
                    .child(self.render_page_stage(narrow, cx)),
            )
            .when(!self.ui_hidden, |this| this.child(self.render_footer(cx)))
            .when_some(drawer, |this, drawer| this.child(drawer))
            .when(self.is_loading, |this| {
                this.child(
                    div()
                        .absolute()
                        .top_0()
                        .left_0()
                        .right_0()
                        .bottom_0()
                        .flex()
                        .items_center()
                        .justify_center()
                        .bg(cx.theme().background.opacity(0.6))
                        .child(
                            spinner::Spinner::new()
                                .large()
                                .icon(Icon::new(crate::icons::IconName::LoaderCircle))
                                .color(cx.theme().muted_foreground),
                        ),
                )
            })
            .when_some(toast, |this, toast| {
                let border = match toast.kind {
                    ToastKind::Info => cx.theme().border,
                    ToastKind::Error => cx.theme().danger,
                };
                this.child(
                    div()
                        .absolute()
                        .bottom(px(FOOTER_HEIGHT + 16.0))
                        .right_4()
                        .px_3()
                        .py_2()
                        .rounded_md()
                        .border_1()
                        .border_color(border)
                        .bg(cx.theme().secondary.opacity(0.95))
                        .shadow_lg()
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().foreground)
                                .child(toast.message),
                        ),
                )
            })
    }
}
