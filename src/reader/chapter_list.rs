use super::*;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::input::Input;
use gpui_component::*;

impl ReaderViewer {
    pub(super) fn render_chapter_sidebar(
        &self,
        narrow: bool,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let query = self.chapter_filter.to_lowercase().trim().to_string();
        let current_id = self.current_chapter_id.clone();

        let filtered: Vec<(usize, ChapterSummary)> = self
            .chapters
            .iter()
            .enumerate()
            .filter(|(_, chapter)| {
                query.is_empty()
                    || chapter.title.to_lowercase().contains(&query)
                    || chapter.id.to_lowercase().contains(&query)
            })
            .map(|(ix, chapter)| (ix, chapter.clone()))
            .collect();
        let nothing_matched = filtered.is_empty() && !self.chapters.is_empty();

        div()
            .id("chapter-sidebar")
            .w(px(SIDEBAR_WIDTH))
            .h_full()
            .flex_shrink_0()
            .v_flex()
            .border_r_1()
            .border_color(cx.theme().border)
            .bg(cx.theme().secondary)
            .child(
                div()
                    .p_2()
                    .w_full()
                    .border_b_1()
                    .border_color(cx.theme().border)
                    .child(Input::new(&self.chapter_filter_input)),
            )
            .child(
                div()
                    .id("chapter-list")
                    .flex_1()
                    .overflow_y_scroll()
                    .track_scroll(&self.chapter_list_scroll)
                    .v_flex()
                    .p_1()
                    .gap_1()
                    .when(nothing_matched, |this| {
                        this.child(
                            div()
                                .p_2()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child("No matching chapters"),
                        )
                    })
                    .children(filtered.into_iter().map(|(ix, chapter)| {
                        let is_active = current_id.as_deref() == Some(chapter.id.as_str());
                        let chapter_id = chapter.id.clone();

                        div()
                            .id(("chapter", ix))
                            .w_full()
                            .px_2()
                            .py_1()
                            .rounded_md()
                            .flex()
                            .items_center()
                            .justify_between()
                            .gap_2()
                            .cursor_pointer()
                            .when(is_active, |this| this.bg(cx.theme().selection))
                            .when(!is_active, |this| {
                                this.hover(|this| this.bg(cx.theme().secondary.opacity(0.6)))
                            })
                            .on_click(cx.listener(move |this, _, _, cx| {
                                this.select_chapter(chapter_id.clone(), 1, cx);
                                if narrow {
                                    this.sidebar_open = false;
                                }
                            }))
                            .child(
                                div()
                                    .text_sm()
                                    .whitespace_nowrap()
                                    .overflow_hidden()
                                    .text_color(if is_active {
                                        cx.theme().foreground
                                    } else {
                                        cx.theme().muted_foreground
                                    })
                                    .child(format!("Ch. {}", chapter.title)),
                            )
                            .child(
                                div()
                                    .text_xs()
                                    .flex_shrink_0()
                                    .text_color(cx.theme().muted_foreground.opacity(0.8))
                                    .child(format!("{}p", chapter.page_count)),
                            )
                    })),
            )
    }

    /// Narrow viewports get the sidebar as an overlay drawer above a dim
    /// backdrop; tapping the backdrop closes it.
    pub(super) fn render_sidebar_drawer(&self, cx: &mut Context<Self>) -> AnyElement {
        div()
            .absolute()
            .top_0()
            .left_0()
            .right_0()
            .bottom_0()
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .right_0()
                    .bottom_0()
                    .bg(gpui::black().opacity(0.4))
                    .on_mouse_up(
                        MouseButton::Left,
                        cx.listener(|this, _: &MouseUpEvent, _, cx| {
                            this.gestures.cancel_swipe();
                            this.sidebar_open = false;
                            cx.notify();
                        }),
                    ),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .bottom_0()
                    .w(px(SIDEBAR_WIDTH))
                    .shadow_lg()
                    .child(self.render_chapter_sidebar(true, cx)),
            )
            .into_any_element()
    }
}
