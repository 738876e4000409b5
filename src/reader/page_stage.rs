use super::*;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::scroll::{Scrollbar, ScrollbarShow};
use gpui_component::*;

impl ReaderViewer {
    pub(super) fn render_page_stage(
        &mut self,
        narrow: bool,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let _ = narrow;
        let content = match self.mode {
            ReadingMode::Vertical => self.render_column_view(cx),
            ReadingMode::Single => self.render_single_view(cx),
        };
        let pan_grabbable = self.mode == ReadingMode::Single
            && self
                .pan_zoom
                .as_ref()
                .is_some_and(|transform| transform.scale() > 1.0);

        div()
            .id("page-stage")
            .flex_1()
            .h_full()
            .relative()
            .overflow_hidden()
            .bg(cx.theme().muted)
            .when(pan_grabbable, |this| this.cursor_grab())
            .on_scroll_wheel(cx.listener(|this, event: &ScrollWheelEvent, _, cx| {
                this.handle_stage_wheel(event, cx);
            }))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, event: &MouseDownEvent, window, cx| {
                    this.handle_stage_mouse_down(event.position, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, event: &MouseMoveEvent, _, cx| {
                this.handle_stage_mouse_move(event.position, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _: &MouseUpEvent, _, _| {
                    this.handle_stage_mouse_up();
                }),
            )
            .on_hover({
                let viewer = cx.entity();
                move |hovered, _, cx| {
                    let _ = viewer.update(cx, |this, _| {
                        this.handle_stage_hover(*hovered);
                    });
                }
            })
            .child(content)
    }

    fn render_column_view(&mut self, cx: &mut Context<Self>) -> AnyElement {
        if self.pages.is_empty() {
            return self.render_empty_state(cx);
        }

        let stage_width = self.stage_size.0;
        let content_width = self.column_content_width(stage_width);
        let item_heights = self.column_item_heights(stage_width);
        let hscroll_enabled = self.column_layout.hscroll_enabled;

        div()
            .id("column-hscroll")
            .size_full()
            .relative()
            .when(hscroll_enabled, |this| {
                this.overflow_x_scroll().track_scroll(&self.stage_hscroll)
            })
            .child(
                div()
                    .h_full()
                    .w(px(content_width.max(stage_width)))
                    .child(
                        v_virtual_list(
                            cx.entity(),
                            "page-column",
                            item_heights,
                            move |viewer, visible_range, _window, cx| {
                                viewer.request_page_load_for_visible_range(
                                    visible_range.clone(),
                                    cx,
                                );
                                visible_range
                                    .map(|ix| viewer.render_column_page(ix, content_width, cx))
                                    .collect::<Vec<_>>()
                            },
                        )
                        .track_scroll(&self.vertical_scroll),
                    ),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .right_0()
                    .bottom_0()
                    .child(
                        Scrollbar::vertical(&self.vertical_scroll)
                            .scrollbar_show(ScrollbarShow::Always),
                    ),
            )
            .into_any_element()
    }

    fn render_column_page(
        &self,
        ix: usize,
        content_width: f32,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let Some(page) = self.pages.get(ix) else {
            return div().into_any_element();
        };
        let height = content_width * page.aspect_ratio();

        div()
            .id(("column-page", ix))
            .w_full()
            .h_full()
            .flex()
            .justify_center()
            .child(
                div()
                    .w(px(content_width))
                    .h(px(height))
                    .bg(cx.theme().background)
                    .when_some(page.image.clone(), |this, image| {
                        this.child(img(image).size_full().object_fit(ObjectFit::Contain))
                    })
                    .when(page.image.is_none(), |this| {
                        this.child(self.render_page_placeholder(page, cx))
                    }),
            )
            .into_any_element()
    }

    fn render_single_view(&mut self, cx: &mut Context<Self>) -> AnyElement {
        if self.pages.is_empty() {
            return self.render_empty_state(cx);
        }

        self.ensure_current_page_requested(cx);

        let current_ix = self.page_index.saturating_sub(1);
        let page = self.pages[current_ix.min(self.pages.len() - 1)].clone();

        // The transform controller binds to the freshly built image element;
        // any previous instance was dropped when the view was rebuilt.
        if let (Some(_), Some(natural_size)) = (page.image.as_ref(), page.natural_size) {
            if self.pan_zoom.is_none() {
                let fitted = fitted_image_size(natural_size, self.stage_size);
                let mut transform = PanZoomController::new(fitted, self.stage_size);
                if !zoom::is_identity(self.zoom_scale) {
                    transform.zoom_to(self.zoom_scale, None);
                }
                self.pan_zoom = Some(transform);
            }
        }

        let controls = self.current_nav_controls();
        let image_layer = match (page.image.clone(), self.pan_zoom.as_ref()) {
            (Some(image), Some(transform)) => {
                let (left, top) = transform.top_left();
                let (width, height) = transform.scaled_size();
                let slide_from = match self.nav_direction {
                    NavDirection::Forward => 32.0,
                    NavDirection::Backward => -32.0,
                };
                img(image)
                    .absolute()
                    .top(px(top))
                    .left(px(left))
                    .w(px(width))
                    .h(px(height))
                    .with_animation(
                        ("page-slide", self.page_index),
                        Animation::new(Duration::from_millis(200)),
                        move |image, delta| {
                            image.left(px(left + slide_from * (1.0 - delta)))
                        },
                    )
                    .into_any_element()
            }
            _ => div()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .child(self.render_page_placeholder(&page, cx))
                .into_any_element(),
        };

        div()
            .size_full()
            .relative()
            .overflow_hidden()
            .child(image_layer)
            .child(self.render_click_zone(false, controls.prev_enabled, cx))
            .child(self.render_click_zone(true, controls.next_enabled, cx))
            .when(!self.ui_hidden, |this| {
                this.child(self.render_thumb_strip(cx))
            })
            .into_any_element()
    }

    fn render_page_placeholder(&self, page: &PageView, cx: &mut Context<Self>) -> AnyElement {
        if page.failed {
            div()
                .size_full()
                .v_flex()
                .items_center()
                .justify_center()
                .gap_2()
                .text_color(cx.theme().muted_foreground)
                .child(
                    Icon::new(crate::icons::IconName::File)
                        .size_8()
                        .text_color(cx.theme().muted_foreground),
                )
                .child(
                    div()
                        .text_xs()
                        .child(format!("Failed to load page {}", page.index)),
                )
                .into_any_element()
        } else {
            div()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .child(
                    spinner::Spinner::new()
                        .large()
                        .icon(Icon::new(crate::icons::IconName::LoaderCircle))
                        .color(cx.theme().muted_foreground),
                )
                .into_any_element()
        }
    }

    fn render_click_zone(
        &self,
        forward: bool,
        enabled: bool,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let icon = if forward {
            crate::icons::IconName::ChevronRight
        } else {
            crate::icons::IconName::ChevronLeft
        };

        div()
            .id(if forward { "zone-next" } else { "zone-prev" })
            .absolute()
            .top_0()
            .bottom(px(THUMB_STRIP_HEIGHT))
            .w(px(CLICK_ZONE_WIDTH))
            .map(|this| if forward { this.right_0() } else { this.left_0() })
            .flex()
            .items_center()
            .justify_center()
            // Presses here navigate; they never count as chrome taps.
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|_, _: &MouseDownEvent, _, cx| {
                    cx.stop_propagation();
                }),
            )
            .when(enabled, |this| {
                this.cursor_pointer()
                    .hover(|this| this.bg(cx.theme().foreground.opacity(0.05)))
                    .on_click(cx.listener(move |this, _, _, cx| {
                        if forward {
                            this.go_to_next(cx);
                        } else {
                            this.go_to_prev(cx);
                        }
                    }))
                    .child(
                        Icon::new(icon)
                            .size_6()
                            .text_color(cx.theme().muted_foreground.opacity(0.6)),
                    )
            })
            .into_any_element()
    }

    fn render_thumb_strip(&self, cx: &mut Context<Self>) -> AnyElement {
        let current_index = self.page_index;

        div()
            .absolute()
            .bottom_2()
            .left_2()
            .right_2()
            .flex()
            .justify_center()
            .child(
                h_flex()
                    .id("thumb-strip")
                    .max_w_full()
                    .overflow_x_scroll()
                    .track_scroll(&self.thumb_strip_scroll)
                    .gap_1()
                    .p_1()
                    .rounded_md()
                    .bg(cx.theme().secondary.opacity(0.88))
                    .shadow_md()
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(|_, _: &MouseDownEvent, _, cx| {
                            cx.stop_propagation();
                        }),
                    )
                    .children(self.pages.iter().enumerate().map(|(ix, page)| {
                        let is_active = page.index == current_index;
                        let target = page.index;
                        let thumb = self
                            .image_cache
                            .get(&page.url)
                            .map(|(image, _)| image.clone());

                        div()
                            .id(("thumb", ix))
                            .w(px(THUMB_TILE_WIDTH))
                            .h(px(THUMB_STRIP_HEIGHT - 20.0))
                            .flex_shrink_0()
                            .rounded_sm()
                            .overflow_hidden()
                            .border_1()
                            .border_color(if is_active {
                                cx.theme().primary
                            } else {
                                cx.theme().border
                            })
                            .bg(cx.theme().muted)
                            .cursor_pointer()
                            .when_some(thumb, |this, image| {
                                this.child(img(image).size_full().object_fit(ObjectFit::Cover))
                            })
                            .child(
                                div()
                                    .absolute()
                                    .bottom_0()
                                    .left_0()
                                    .right_0()
                                    .text_xs()
                                    .flex()
                                    .justify_center()
                                    .bg(cx.theme().secondary.opacity(0.7))
                                    .text_color(cx.theme().foreground)
                                    .child(format!("{target}")),
                            )
                            .on_click(cx.listener(move |this, _, _, cx| {
                                this.nav_direction = if target > this.page_index {
                                    NavDirection::Forward
                                } else {
                                    NavDirection::Backward
                                };
                                this.go_to_page(target, cx);
                            }))
                    })),
            )
            .into_any_element()
    }

    fn render_empty_state(&self, cx: &mut Context<Self>) -> AnyElement {
        let message = if self.chapters.is_empty() {
            "No chapters found"
        } else {
            "No pages found in this chapter"
        };

        div()
            .size_full()
            .v_flex()
            .items_center()
            .justify_center()
            .gap_3()
            .child(
                Icon::new(crate::icons::IconName::BookOpen)
                    .size_8()
                    .text_color(cx.theme().muted_foreground),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child(message),
            )
            .into_any_element()
    }
}

/// Contain-fit of the natural image size into the stage.
fn fitted_image_size(natural: (u32, u32), stage: (f32, f32)) -> (f32, f32) {
    let (natural_width, natural_height) = (natural.0 as f32, natural.1 as f32);
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return stage;
    }
    let fit = (stage.0 / natural_width).min(stage.1 / natural_height);
    (natural_width * fit, natural_height * fit)
}
