/// Requested indices are 1-based and clamped to the current page set; an
/// empty chapter still pins the index at 1.
pub(super) fn clamp_page_index(requested: usize, page_count: usize) -> usize {
    requested.max(1).min(page_count.max(1))
}

/// Enablement and labels for the prev/next controls. In continuous mode the
/// controls always traverse chapters; in paged mode they step pages and only
/// mean a chapter at the corresponding edge of the current one.
pub(super) fn nav_controls(
    mode: ReadingMode,
    page_index: usize,
    page_count: usize,
    has_prev_chapter: bool,
    has_next_chapter: bool,
) -> NavControls {
    if mode == ReadingMode::Vertical {
        return NavControls {
            prev_enabled: has_prev_chapter,
            next_enabled: has_next_chapter,
            prev_label: "Prev Ch",
            next_label: "Next Ch",
        };
    }

    let at_first = page_index <= 1;
    let at_last = page_index >= page_count;

    let (prev_enabled, prev_label) = if at_first && !has_prev_chapter {
        (false, "Prev")
    } else if at_first {
        (true, "Prev Ch")
    } else {
        (true, "Prev")
    };

    let (next_enabled, next_label) = if at_last && !has_next_chapter {
        (false, "Next")
    } else if at_last {
        (true, "Next Ch")
    } else {
        (true, "Next")
    };

    NavControls {
        prev_enabled,
        next_enabled,
        prev_label,
        next_label,
    }
}

impl ReaderViewer {
    fn current_nav_controls(&self) -> NavControls {
        nav_controls(
            self.mode,
            self.page_index,
            self.page_count(),
            self.has_prev_chapter(),
            self.has_next_chapter(),
        )
    }

    fn go_to_page(&mut self, requested: usize, cx: &mut Context<Self>) {
        let clamped = clamp_page_index(requested, self.page_count());
        // The slide direction must come from the index we are leaving.
        if self.mode == ReadingMode::Single && clamped != self.page_index {
            self.nav_direction = if clamped > self.page_index {
                NavDirection::Forward
            } else {
                NavDirection::Backward
            };
        }
        self.page_index = clamped;

        match self.mode {
            ReadingMode::Vertical => {
                if !self.pages.is_empty() {
                    self.suppress_scroll_sync_once = true;
                    self.vertical_scroll
                        .scroll_to_item(clamped - 1, ScrollStrategy::Top);
                }
            }
            ReadingMode::Single => {
                self.pan_zoom = None;
                self.preload_single_page_neighbors(cx);
            }
        }

        self.save_position(cx);
        cx.notify();
    }

    fn go_to_next(&mut self, cx: &mut Context<Self>) {
        if self.mode == ReadingMode::Single {
            self.nav_direction = NavDirection::Forward;
            if self.page_index < self.page_count() {
                self.go_to_page(self.page_index + 1, cx);
                return;
            }
        }
        self.go_to_next_chapter(cx);
    }

    fn go_to_prev(&mut self, cx: &mut Context<Self>) {
        if self.mode == ReadingMode::Single {
            self.nav_direction = NavDirection::Backward;
            if self.page_index > 1 {
                self.go_to_page(self.page_index - 1, cx);
                return;
            }
        }
        self.go_to_prev_chapter(cx);
    }

    fn go_to_next_chapter(&mut self, cx: &mut Context<Self>) {
        if let Some(ix) = self.current_chapter_index()
            && ix + 1 < self.chapters.len()
        {
            let next_id = self.chapters[ix + 1].id.clone();
            self.select_chapter(next_id, 1, cx);
        }
    }

    fn go_to_prev_chapter(&mut self, cx: &mut Context<Self>) {
        if let Some(ix) = self.current_chapter_index()
            && ix > 0
        {
            let prev_id = self.chapters[ix - 1].id.clone();
            self.select_chapter(prev_id, 1, cx);
        }
    }

    /// Replaces the page set with the selected chapter's pages. The previous
    /// pages stay in place until the fetch resolves, so a failure keeps the
    /// reader on its last good state. Concurrent selections are not fenced;
    /// the last fetch to resolve wins.
    fn select_chapter(&mut self, chapter_id: String, requested_index: usize, cx: &mut Context<Self>) {
        let Some(client) = self.client.clone() else {
            return;
        };

        self.is_loading = true;
        self.current_chapter_id = Some(chapter_id.clone());
        cx.notify();

        cx.spawn(async move |view, cx| {
            let fetched = cx
                .background_executor()
                .spawn({
                    let client = client.clone();
                    let chapter_id = chapter_id.clone();
                    async move { client.chapter_pages(&chapter_id) }
                })
                .await;

            let _ = view.update(cx, |this, cx| {
                this.is_loading = false;
                match fetched {
                    Ok(page_refs) => {
                        // Invalidate in-flight image loads for the old set.
                        this.chapter_epoch = this.chapter_epoch.wrapping_add(1);
                        this.page_loading.clear();
                        this.page_inflight_tasks = 0;

                        this.pages = page_refs
                            .into_iter()
                            .map(|page| {
                                let cached = this.image_cache.get(&page.url).cloned();
                                PageView {
                                    index: page.index,
                                    url: page.url,
                                    image: cached.as_ref().map(|(image, _)| image.clone()),
                                    natural_size: cached.map(|(_, size)| size),
                                    failed: false,
                                }
                            })
                            .collect();
                        this.page_index = clamp_page_index(requested_index, this.pages.len());
                        this.nav_direction = NavDirection::Forward;
                        this.pan_zoom = None;
                        this.last_visible_range = None;
                        this.last_scroll_offset = None;

                        if this.mode == ReadingMode::Vertical && !this.pages.is_empty() {
                            this.suppress_scroll_sync_once = true;
                            this.vertical_scroll
                                .scroll_to_item(this.page_index - 1, ScrollStrategy::Top);
                        }
                        this.scroll_chapter_list_to_active();

                        this.save_position(cx);
                        this.preload_next_chapter(cx);
                        if this.mode == ReadingMode::Single {
                            this.preload_single_page_neighbors(cx);
                        }
                    }
                    Err(err) => {
                        crate::debug_log!("[chapter] load failed: {} | {:#}", chapter_id, err);
                        this.show_toast(ToastKind::Error, "Failed to load chapter", cx);
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }

    fn scroll_chapter_list_to_active(&self) {
        if let Some(ix) = self.current_chapter_index() {
            self.chapter_list_scroll.scroll_to_item(ix);
        }
    }
}

#[cfg(test)]
mod navigation_tests {
    use super::*;

    #[::core::prelude::v1::test]
    fn requested_indices_clamp_into_the_page_range() {
        assert_eq!(clamp_page_index(0, 5), 1);
        assert_eq!(clamp_page_index(1, 5), 1);
        assert_eq!(clamp_page_index(3, 5), 3);
        assert_eq!(clamp_page_index(9, 5), 5);
        // An empty chapter pins the index at 1.
        assert_eq!(clamp_page_index(7, 0), 1);
        assert_eq!(clamp_page_index(0, 0), 1);
    }

    #[::core::prelude::v1::test]
    fn continuous_mode_controls_always_mean_chapters() {
        let controls = nav_controls(ReadingMode::Vertical, 3, 10, false, true);
        assert_eq!(controls.prev_label, "Prev Ch");
        assert_eq!(controls.next_label, "Next Ch");
        assert!(!controls.prev_enabled);
        assert!(controls.next_enabled);
    }

    #[::core::prelude::v1::test]
    fn paged_first_page_without_prev_chapter_disables_prev() {
        let controls = nav_controls(ReadingMode::Single, 1, 5, false, true);
        assert!(!controls.prev_enabled);
        assert_eq!(controls.prev_label, "Prev");
    }

    #[::core::prelude::v1::test]
    fn paged_first_page_with_prev_chapter_relabels_prev() {
        let controls = nav_controls(ReadingMode::Single, 1, 5, true, true);
        assert!(controls.prev_enabled);
        assert_eq!(controls.prev_label, "Prev Ch");
    }

    #[::core::prelude::v1::test]
    fn paged_last_page_without_next_chapter_disables_next() {
        let controls = nav_controls(ReadingMode::Single, 5, 5, true, false);
        assert!(!controls.next_enabled);
        assert_eq!(controls.next_label, "Next");
    }

    #[::core::prelude::v1::test]
    fn paged_last_page_with_next_chapter_relabels_next() {
        let controls = nav_controls(ReadingMode::Single, 5, 5, false, true);
        assert!(controls.next_enabled);
        assert_eq!(controls.next_label, "Next Ch");
    }

    #[::core::prelude::v1::test]
    fn paged_interior_pages_step_within_the_chapter() {
        let controls = nav_controls(ReadingMode::Single, 3, 5, false, false);
        assert!(controls.prev_enabled);
        assert!(controls.next_enabled);
        assert_eq!(controls.prev_label, "Prev");
        assert_eq!(controls.next_label, "Next");
    }
}
