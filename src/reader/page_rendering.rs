impl ReaderViewer {
    /// Width every page image in the continuous column renders at. Identity
    /// scale keeps the responsive default; zoomed scales carry the explicit
    /// override from the column layout.
    fn column_content_width(&self, stage_width: f32) -> f32 {
        self.column_layout
            .page_width
            .unwrap_or_else(|| zoom::column_page_width(stage_width, 1.0))
    }

    fn column_item_heights(&self, stage_width: f32) -> Rc<Vec<gpui::Size<Pixels>>> {
        let width = self.column_content_width(stage_width);
        Rc::new(
            self.pages
                .iter()
                .map(|page| size(px(0.), px(width * page.aspect_ratio() + COLUMN_PAGE_GAP)))
                .collect(),
        )
    }

    fn column_content_height(&self, stage_width: f32) -> f32 {
        let width = self.column_content_width(stage_width);
        self.pages
            .iter()
            .map(|page| width * page.aspect_ratio() + COLUMN_PAGE_GAP)
            .sum()
    }

    /// Continuous-mode reading progress as a scroll fraction; paged mode is
    /// a plain index fraction.
    fn progress_fraction(&self) -> f32 {
        if self.pages.is_empty() {
            return 0.0;
        }
        match self.mode {
            ReadingMode::Vertical => {
                let scrollable = self.column_content_height(self.stage_size.0) - self.stage_size.1;
                if scrollable <= 0.0 {
                    return 0.0;
                }
                let scrolled = (-f32::from(self.vertical_scroll.offset().y)).max(0.0);
                (scrolled / scrollable).clamp(0.0, 1.0)
            }
            ReadingMode::Single => self.page_index as f32 / self.pages.len() as f32,
        }
    }

    fn request_page_load_for_visible_range(
        &mut self,
        visible_range: std::ops::Range<usize>,
        cx: &mut Context<Self>,
    ) {
        if visible_range.is_empty() || self.pages.is_empty() {
            return;
        }

        if self.page_inflight_tasks == 0 && !self.page_loading.is_empty() {
            self.page_loading.clear();
        }

        self.last_visible_range = Some(visible_range.clone());

        let candidate_order: Vec<usize> = visible_range.collect();
        self.request_page_load_from_candidates(candidate_order, cx);
    }

    /// Fetches and decodes page images on the background executor. Results
    /// carry the chapter epoch they were requested under; anything that
    /// resolves after the page set was replaced is dropped.
    fn request_page_load_from_candidates(
        &mut self,
        candidate_order: Vec<usize>,
        cx: &mut Context<Self>,
    ) {
        let Some(client) = self.client.clone() else {
            return;
        };
        if candidate_order.is_empty() || self.pages.is_empty() {
            return;
        }
        if self.page_inflight_tasks >= PAGE_MAX_PARALLEL_TASKS {
            return;
        }

        let mut pending = Vec::new();
        let mut seen = HashSet::new();
        for ix in candidate_order {
            if !seen.insert(ix) {
                continue;
            }
            let Some(page) = self.pages.get(ix) else {
                continue;
            };
            if page.image.is_none() && !page.failed && !self.page_loading.contains(&ix) {
                pending.push((ix, page.url.clone()));
                if pending.len() >= PAGE_BATCH_SIZE {
                    break;
                }
            }
        }

        if pending.is_empty() {
            return;
        }

        for (ix, _) in &pending {
            self.page_loading.insert(*ix);
        }
        self.page_inflight_tasks = self.page_inflight_tasks.saturating_add(1);
        let epoch = self.chapter_epoch;

        cx.spawn(async move |view, cx| {
            let load_result = cx
                .background_executor()
                .spawn(async move {
                    pending
                        .into_iter()
                        .map(|(ix, url)| {
                            let fetched = fetch_page_image(&client, &url);
                            (ix, url, fetched)
                        })
                        .collect::<Vec<_>>()
                })
                .await;

            let _ = view.update(cx, |this, cx| {
                if this.chapter_epoch != epoch {
                    // The page set was replaced while we were fetching.
                    return;
                }

                this.page_inflight_tasks = this.page_inflight_tasks.saturating_sub(1);

                for (ix, url, fetched) in load_result {
                    this.page_loading.remove(&ix);
                    match fetched {
                        Ok(page) => {
                            this.image_cache
                                .insert(url, (page.image.clone(), page.size));
                            if let Some(view) = this.pages.get_mut(ix) {
                                view.image = Some(page.image);
                                view.natural_size = Some(page.size);
                                view.failed = false;
                            }
                        }
                        Err(err) => {
                            crate::debug_log!("[page] load failed: {} | {:#}", url, err);
                            if let Some(view) = this.pages.get_mut(ix) {
                                view.failed = true;
                            }
                        }
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }

    /// Paged mode keeps the current page plus its neighbors warm.
    fn preload_single_page_neighbors(&mut self, cx: &mut Context<Self>) {
        if self.pages.is_empty() {
            return;
        }
        let current = self.page_index.saturating_sub(1);
        let mut candidates = vec![current];
        for distance in 1..=SINGLE_PRELOAD_RADIUS {
            if current >= distance {
                candidates.push(current - distance);
            }
            candidates.push(current + distance);
        }
        candidates.retain(|ix| *ix < self.pages.len());
        self.request_page_load_from_candidates(candidates, cx);
    }

    fn ensure_current_page_requested(&mut self, cx: &mut Context<Self>) {
        let current = self.page_index.saturating_sub(1);
        let needs_load = self
            .pages
            .get(current)
            .is_some_and(|page| page.image.is_none() && !page.failed)
            && !self.page_loading.contains(&current);
        if needs_load {
            self.request_page_load_from_candidates(vec![current], cx);
        }
    }

    /// Opportunistic warm-up of the next chapter's opening pages. Entirely
    /// best-effort: every failure is swallowed.
    fn preload_next_chapter(&mut self, cx: &mut Context<Self>) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let Some(ix) = self.current_chapter_index() else {
            return;
        };
        let Some(next) = self.chapters.get(ix + 1) else {
            return;
        };
        let next_id = next.id.clone();

        cx.spawn(async move |view, cx| {
            let preloaded = cx
                .background_executor()
                .spawn(async move {
                    let pages = match client.chapter_pages(&next_id) {
                        Ok(pages) => pages,
                        Err(err) => {
                            crate::debug_log!("[preload] {} skipped: {:#}", next_id, err);
                            return Vec::new();
                        }
                    };
                    pages
                        .into_iter()
                        .take(NEXT_CHAPTER_PRELOAD_PAGES)
                        .filter_map(|page| match fetch_page_image(&client, &page.url) {
                            Ok(fetched) => Some((page.url, fetched.image, fetched.size)),
                            Err(_) => None,
                        })
                        .collect::<Vec<_>>()
                })
                .await;

            if preloaded.is_empty() {
                return;
            }

            let _ = view.update(cx, |this, _| {
                for (url, image, natural_size) in preloaded {
                    this.image_cache.insert(url, (image, natural_size));
                }
            });
        })
        .detach();
    }

    fn on_column_scroll_offset_changed(&mut self, cx: &mut Context<Self>) {
        let offset = self.vertical_scroll.offset();
        let has_changed = self
            .last_scroll_offset
            .map(|last| last != offset)
            .unwrap_or(false);
        self.last_scroll_offset = Some(offset);

        if has_changed && !self.pages.is_empty() {
            if self.suppress_scroll_sync_once {
                self.suppress_scroll_sync_once = false;
                return;
            }
            self.schedule_scroll_position_sync(cx);
        }
    }

    /// After the column settles, adopt the closest visible page as the
    /// current index — and only re-save the position when it actually moved.
    fn schedule_scroll_position_sync(&mut self, cx: &mut Context<Self>) {
        self.scroll_sync_epoch = self.scroll_sync_epoch.wrapping_add(1);
        let sync_epoch = self.scroll_sync_epoch;

        cx.spawn(async move |view, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(SCROLL_SYNC_DELAY_MS))
                .await;

            let _ = view.update(cx, |this, cx| {
                if this.scroll_sync_epoch != sync_epoch
                    || this.mode != ReadingMode::Vertical
                    || this.pages.is_empty()
                {
                    return;
                }

                let closest = this
                    .last_visible_range
                    .as_ref()
                    .map(|range| range.start.min(this.pages.len().saturating_sub(1)))
                    .unwrap_or(this.page_index.saturating_sub(1));
                let next_index = closest + 1;

                if next_index != this.page_index {
                    this.page_index = next_index;
                    let position = this.current_chapter_id.clone().map(|id| (id, next_index));
                    if position.is_some() && position != this.last_saved_index {
                        this.save_position(cx);
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }
}
