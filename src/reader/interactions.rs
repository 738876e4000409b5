impl ReaderViewer {
    fn set_mode(&mut self, mode: ReadingMode, cx: &mut Context<Self>) {
        self.mode = mode;
        // Zoom state does not survive a mode switch, and neither does the
        // transform controller.
        self.zoom_scale = 1.0;
        self.pan_zoom = None;
        self.column_layout = zoom::ColumnLayout::default();
        self.stage_hscroll.set_offset(point(px(0.), px(0.)));

        match self.mode {
            ReadingMode::Vertical => {
                if !self.pages.is_empty() {
                    self.suppress_scroll_sync_once = true;
                    self.vertical_scroll
                        .scroll_to_item(self.page_index - 1, ScrollStrategy::Top);
                }
            }
            ReadingMode::Single => {
                self.preload_single_page_neighbors(cx);
            }
        }

        self.save_position(cx);
        cx.notify();
    }

    fn toggle_mode(&mut self, cx: &mut Context<Self>) {
        self.set_mode(self.mode.toggled(), cx);
    }

    fn toggle_ui_visibility(&mut self, cx: &mut Context<Self>) {
        self.ui_hidden = !self.ui_hidden;
        if self.ui_hidden && self.sidebar_open {
            self.sidebar_open = false;
        }
        self.save_position(cx);
        cx.notify();
    }

    fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        self.sidebar_open = !self.sidebar_open;
        cx.notify();
    }

    fn zoom_in(&mut self, cx: &mut Context<Self>) {
        self.set_zoom(self.zoom_scale + zoom::ZOOM_STEP, None, cx);
    }

    fn zoom_out(&mut self, cx: &mut Context<Self>) {
        self.set_zoom(self.zoom_scale - zoom::ZOOM_STEP, None, cx);
    }

    fn zoom_reset(&mut self, cx: &mut Context<Self>) {
        self.set_zoom(1.0, None, cx);
    }

    /// Applies a clamped scale through the strategy for the active mode.
    /// `focus_x` is stage-local; without it the last tracked cursor position
    /// is the focal point, and without that the stage center.
    fn set_zoom(&mut self, target: f32, focus_x: Option<f32>, cx: &mut Context<Self>) {
        let scale = zoom::round_scale(zoom::clamp_scale(target));
        self.zoom_scale = scale;

        match self.mode {
            ReadingMode::Single => {
                let focal = self.single_mode_focal(focus_x);
                if let Some(transform) = self.pan_zoom.as_mut() {
                    transform.zoom_to(scale, focal);
                }
            }
            ReadingMode::Vertical => {
                let focus = focus_x.or_else(|| self.tracked_cursor_stage_x());
                self.apply_column_zoom(focus, cx);
            }
        }
        cx.notify();
    }

    fn tracked_cursor_stage_x(&self) -> Option<f32> {
        let cursor = self.last_cursor?;
        let x = f32::from(cursor.x) - self.stage_origin.0;
        (0.0..=self.stage_size.0).contains(&x).then_some(x)
    }

    fn single_mode_focal(&self, focus_x: Option<f32>) -> Option<(f32, f32)> {
        let cursor_y = self
            .last_cursor
            .map(|cursor| f32::from(cursor.y) - self.stage_origin.1)
            .filter(|y| (0.0..=self.stage_size.1).contains(y));
        match (focus_x, self.tracked_cursor_stage_x()) {
            (Some(x), _) => Some((x, cursor_y.unwrap_or(self.stage_size.1 / 2.0))),
            (None, Some(x)) => Some((x, cursor_y.unwrap_or(self.stage_size.1 / 2.0))),
            (None, None) => None,
        }
    }

    /// Two-pass width rescale: commit the new layout, then restore the focal
    /// scroll position once the column has laid out at its new width.
    fn apply_column_zoom(&mut self, focus_x: Option<f32>, cx: &mut Context<Self>) {
        let next = zoom::column_layout(
            self.stage_size.0,
            self.zoom_scale,
            &self.column_layout,
            focus_x,
        );
        let scroll_left = next.scroll_left;
        let hscroll_enabled = next.hscroll_enabled;
        self.column_layout = next;

        self.hscroll_restore_epoch = self.hscroll_restore_epoch.wrapping_add(1);
        let restore_epoch = self.hscroll_restore_epoch;

        cx.spawn(async move |view, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(16))
                .await;

            let _ = view.update(cx, |this, cx| {
                if this.hscroll_restore_epoch != restore_epoch {
                    return;
                }
                let offset = if hscroll_enabled { -scroll_left } else { 0.0 };
                this.stage_hscroll.set_offset(point(px(offset), px(0.)));
                cx.notify();
            });
        })
        .detach();
    }

    fn handle_viewport_resized(&mut self, cx: &mut Context<Self>) {
        // The transform controller is bound to the old stage geometry.
        self.pan_zoom = None;

        let narrow = self
            .last_window_size
            .is_some_and(|(width, _)| width < NARROW_VIEWPORT_WIDTH);
        if narrow && self.sidebar_open {
            self.sidebar_open = false;
        }

        if self.mode == ReadingMode::Vertical && !zoom::is_identity(self.zoom_scale) {
            self.apply_column_zoom(None, cx);
        }
        cx.notify();
    }

    fn handle_key_down(
        &mut self,
        event: &KeyDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let key = event.keystroke.key.as_str();

        if self.chapter_filter_focused {
            if key == "escape" {
                window.focus(&self.focus_handle);
                cx.stop_propagation();
            }
            // Everything else belongs to the search field.
            return;
        }

        match key {
            "left" | "a" | "k" => {
                self.go_to_prev(cx);
                cx.stop_propagation();
            }
            "right" | "d" | "j" => {
                self.go_to_next(cx);
                cx.stop_propagation();
            }
            "home" => {
                self.go_to_page(1, cx);
                cx.stop_propagation();
            }
            "end" => {
                self.go_to_page(self.page_count(), cx);
                cx.stop_propagation();
            }
            "m" => {
                self.toggle_mode(cx);
                cx.stop_propagation();
            }
            "h" => {
                self.toggle_ui_visibility(cx);
                cx.stop_propagation();
            }
            "s" => {
                self.toggle_sidebar(cx);
                cx.stop_propagation();
            }
            "f" => {
                window.toggle_fullscreen();
                cx.stop_propagation();
            }
            "+" | "=" => {
                self.zoom_in(cx);
                cx.stop_propagation();
            }
            "-" | "_" => {
                self.zoom_out(cx);
                cx.stop_propagation();
            }
            "0" => {
                self.zoom_reset(cx);
                cx.stop_propagation();
            }
            "escape" => {
                if self.sidebar_open {
                    self.sidebar_open = false;
                    cx.notify();
                    cx.stop_propagation();
                }
            }
            _ => {}
        }
    }

    /// Ctrl/meta-modified wheel input is zoom: a trackpad pinch (delivered as
    /// exactly that stream) or a deliberate mouse-wheel zoom. Plain wheel
    /// scroll passes through untouched.
    fn handle_stage_wheel(&mut self, event: &ScrollWheelEvent, cx: &mut Context<Self>) {
        if !(event.modifiers.control || event.modifiers.platform) {
            return;
        }
        // Never let the stream reach any native zoom handling.
        cx.stop_propagation();

        let delta_y = match event.delta {
            ScrollDelta::Pixels(delta) => f32::from(delta.y),
            ScrollDelta::Lines(delta) => delta.y * WHEEL_LINE_PIXELS,
        };
        if delta_y == 0.0 {
            return;
        }

        let focus_x =
            (f32::from(event.position.x) - self.stage_origin.0).clamp(0.0, self.stage_size.0);

        match self.mode {
            ReadingMode::Vertical => {
                if !self.gestures.is_pinching() {
                    self.pinch_span = PINCH_BASE_SPAN;
                    self.gestures
                        .begin_pinch(PINCH_BASE_SPAN, self.zoom_scale, focus_x);
                }
                self.pinch_span = (self.pinch_span
                    * (1.0 + delta_y * PINCH_WHEEL_SPAN_FACTOR))
                    .clamp(PINCH_SPAN_MIN, PINCH_SPAN_MAX);
                let focus = self.gestures.pinch_focus_x();
                if let Some(scale) = self.gestures.pinch_scale(self.pinch_span) {
                    self.set_zoom(scale, focus, cx);
                }
                self.schedule_pinch_end(cx);
            }
            ReadingMode::Single => {
                let step = delta_y.signum() * (delta_y.abs() * 0.01).min(zoom::ZOOM_STEP);
                self.set_zoom(self.zoom_scale + step, Some(focus_x), cx);
            }
        }
    }

    /// A pinch has no explicit end on the wheel stream; a quiet period closes
    /// the session, which in turn suppresses trailing taps.
    fn schedule_pinch_end(&mut self, cx: &mut Context<Self>) {
        self.pinch_epoch = self.pinch_epoch.wrapping_add(1);
        let pinch_epoch = self.pinch_epoch;

        cx.spawn(async move |view, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(PINCH_IDLE_END_MS))
                .await;

            let _ = view.update(cx, |this, _| {
                if this.pinch_epoch != pinch_epoch {
                    return;
                }
                this.gestures.end_pinch(Self::now_unix_millis());
            });
        })
        .detach();
    }

    fn handle_stage_mouse_down(
        &mut self,
        position: Point<Pixels>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        window.focus(&self.focus_handle);

        let x = f32::from(position.x) - self.stage_origin.0;
        let y = f32::from(position.y) - self.stage_origin.1;
        if self.gestures.tap(x, y, Self::now_unix_millis()) {
            self.toggle_ui_visibility(cx);
            return;
        }

        if self.mode == ReadingMode::Single
            && self
                .pan_zoom
                .as_ref()
                .is_some_and(|transform| transform.scale() > 1.0)
        {
            self.pan_drag_last = Some(position);
        }
    }

    fn handle_stage_mouse_move(&mut self, position: Point<Pixels>, cx: &mut Context<Self>) {
        self.last_cursor = Some(position);

        if let Some(last) = self.pan_drag_last {
            let delta_x = f32::from(position.x) - f32::from(last.x);
            let delta_y = f32::from(position.y) - f32::from(last.y);
            self.pan_drag_last = Some(position);
            if let Some(transform) = self.pan_zoom.as_mut() {
                transform.pan_by(delta_x, delta_y);
                cx.notify();
            }
        }
    }

    fn handle_stage_mouse_up(&mut self) {
        self.pan_drag_last = None;
    }

    fn handle_stage_hover(&mut self, hovered: bool) {
        if !hovered {
            self.last_cursor = None;
            self.pan_drag_last = None;
        }
    }

    /// Narrow-viewport edge swipes for the sidebar drawer. A press within the
    /// edge zone arms an open gesture; with the drawer open, any press arms a
    /// close gesture (the drawer and its dim overlay both count).
    fn handle_root_mouse_down(
        &mut self,
        position: Point<Pixels>,
        narrow: bool,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) {
        if !narrow {
            return;
        }
        let x = f32::from(position.x);
        let y = f32::from(position.y);
        if let Some(kind) = gestures::swipe_arm_kind(self.sidebar_open, x) {
            self.gestures.begin_swipe(kind, x, y);
        }
    }

    fn handle_root_mouse_move(&mut self, position: Point<Pixels>) {
        if self.gestures.swipe_in_progress() {
            self.gestures
                .update_swipe(f32::from(position.x), f32::from(position.y));
        }
    }

    fn handle_root_mouse_up(&mut self, cx: &mut Context<Self>) {
        match self.gestures.end_swipe() {
            Some(SwipeKind::OpenSidebar) => {
                self.sidebar_open = true;
                cx.notify();
            }
            Some(SwipeKind::CloseSidebar) => {
                self.sidebar_open = false;
                cx.notify();
            }
            None => {}
        }
    }
}
