use super::*;
use super::TITLE_BAR_HEIGHT;
use crate::icons;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{button::*, *};

impl ReaderViewer {
    pub(super) fn render_title_bar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let controls = self.current_nav_controls();
        let page_count = self.page_count();
        let current_page = if page_count == 0 { 0 } else { self.page_index };
        let chapter_title = self.current_chapter_title();
        let zoom_cluster_visible = !self.pages.is_empty()
            && (self.mode == ReadingMode::Single || !zoom::is_identity(self.zoom_scale));
        let mode_icon = match self.mode {
            ReadingMode::Vertical => icons::IconName::Rows,
            ReadingMode::Single => icons::IconName::BookOpen,
        };

        div()
            .id("title-bar")
            .h(px(TITLE_BAR_HEIGHT))
            .w_full()
            .flex_shrink_0()
            .border_b_1()
            .border_color(cx.theme().border)
            .bg(cx.theme().title_bar)
            .flex()
            .items_center()
            .justify_between()
            .px_2()
            .gap_2()
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .min_w(px(0.))
                    .child(
                        Button::new("sidebar-toggle")
                            .ghost()
                            .small()
                            .icon(
                                Icon::new(icons::IconName::PanelLeftDashed)
                                    .text_color(cx.theme().foreground),
                            )
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.toggle_sidebar(cx);
                            })),
                    )
                    .child(
                        div()
                            .text_sm()
                            .font_medium()
                            .whitespace_nowrap()
                            .overflow_hidden()
                            .text_color(cx.theme().foreground)
                            .when(!chapter_title.is_empty(), |this| {
                                this.child(format!("Chapter {chapter_title}"))
                            }),
                    ),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new("prev")
                            .ghost()
                            .small()
                            .disabled(!controls.prev_enabled)
                            .icon(
                                Icon::new(icons::IconName::ChevronLeft)
                                    .text_color(cx.theme().foreground),
                            )
                            .label(controls.prev_label)
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.go_to_prev(cx);
                            })),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(cx.theme().muted_foreground)
                            .whitespace_nowrap()
                            .child(format!("{current_page} / {page_count}")),
                    )
                    .child(
                        Button::new("next")
                            .ghost()
                            .small()
                            .disabled(!controls.next_enabled)
                            .label(controls.next_label)
                            .icon(
                                Icon::new(icons::IconName::ChevronRight)
                                    .text_color(cx.theme().foreground),
                            )
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.go_to_next(cx);
                            })),
                    ),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_1()
                    .when(zoom_cluster_visible, |this| {
                        this.child(
                            Button::new("zoom-out")
                                .ghost()
                                .small()
                                .icon(
                                    Icon::new(icons::IconName::Minus)
                                        .text_color(cx.theme().foreground),
                                )
                                .on_click(cx.listener(|this, _, _, cx| {
                                    this.zoom_out(cx);
                                })),
                        )
                        .child(
                            Button::new("zoom-reset")
                                .ghost()
                                .small()
                                .label(self.zoom_label())
                                .on_click(cx.listener(|this, _, _, cx| {
                                    this.zoom_reset(cx);
                                })),
                        )
                        .child(
                            Button::new("zoom-in")
                                .ghost()
                                .small()
                                .icon(
                                    Icon::new(icons::IconName::Plus)
                                        .text_color(cx.theme().foreground),
                                )
                                .on_click(cx.listener(|this, _, _, cx| {
                                    this.zoom_in(cx);
                                })),
                        )
                    })
                    .child(
                        Button::new("mode-toggle")
                            .ghost()
                            .small()
                            .icon(Icon::new(mode_icon).text_color(cx.theme().foreground))
                            .label(self.mode.label())
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.toggle_mode(cx);
                            })),
                    )
                    .child(
                        Button::new("fullscreen-toggle")
                            .ghost()
                            .small()
                            .icon(
                                Icon::new(icons::IconName::Maximize)
                                    .text_color(cx.theme().foreground),
                            )
                            .on_click(cx.listener(|_, _, window, _| {
                                window.toggle_fullscreen();
                            })),
                    ),
            )
    }

    pub(super) fn render_footer(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let fraction = self.progress_fraction();
        let page_count = self.page_count();
        let current_page = if page_count == 0 { 0 } else { self.page_index };

        div()
            .w_full()
            .flex_shrink_0()
            .v_flex()
            .child(
                div()
                    .h(px(PROGRESS_BAR_HEIGHT))
                    .w_full()
                    .bg(cx.theme().secondary)
                    .child(
                        div()
                            .h_full()
                            .w(relative(fraction))
                            .bg(cx.theme().primary),
                    ),
            )
            .child(
                div()
                    .h(px(FOOTER_HEIGHT))
                    .w_full()
                    .border_t_1()
                    .border_color(cx.theme().border)
                    .bg(cx.theme().title_bar)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(
                        div()
                            .text_xs()
                            .text_color(cx.theme().muted_foreground)
                            .child(format!("Page {current_page} / {page_count}")),
                    ),
            )
    }
}
