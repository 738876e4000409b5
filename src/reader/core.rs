impl ReaderViewer {
    const LOCAL_STATE_DB_DIR_NAME: &'static str = "mikan_db";

    fn now_unix_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or(0)
    }

    fn open_persistent_stores() -> (Option<sled::Tree>, Option<sled::Tree>) {
        let db_path = Self::local_state_db_path();
        if let Some(parent) = db_path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                crate::debug_log!("[store] create dir failed: {}", parent.to_string_lossy());
                return (None, None);
            }
        }

        let db = match sled::open(&db_path) {
            Ok(db) => db,
            Err(err) => {
                crate::debug_log!(
                    "[store] open db failed: {} | {}",
                    db_path.to_string_lossy(),
                    err
                );
                return (None, None);
            }
        };

        let position_store = match db.open_tree(READER_POSITION_TREE) {
            Ok(tree) => Some(tree),
            Err(err) => {
                crate::debug_log!("[store] open tree failed: {} | {}", READER_POSITION_TREE, err);
                None
            }
        };
        let window_size_store = match db.open_tree(WINDOW_SIZE_TREE) {
            Ok(tree) => Some(tree),
            Err(err) => {
                crate::debug_log!("[store] open tree failed: {} | {}", WINDOW_SIZE_TREE, err);
                None
            }
        };

        crate::debug_log!(
            "[store] init position={} window_size={} path={}",
            position_store.is_some(),
            window_size_store.is_some(),
            db_path.to_string_lossy()
        );

        (position_store, window_size_store)
    }

    fn local_state_db_path() -> std::path::PathBuf {
        if let Some(app_data) = std::env::var_os("APPDATA") {
            return std::path::PathBuf::from(app_data)
                .join("mikan")
                .join(Self::LOCAL_STATE_DB_DIR_NAME);
        }

        if let Some(home) = std::env::var_os("HOME") {
            return std::path::PathBuf::from(home)
                .join(".mikan")
                .join(Self::LOCAL_STATE_DB_DIR_NAME);
        }

        std::path::PathBuf::from(".mikan").join(Self::LOCAL_STATE_DB_DIR_NAME)
    }

    fn save_window_size(&self, width: f32, height: f32) {
        let Some(store) = self.window_size_store.as_ref() else {
            return;
        };
        let width_bytes = width.to_be_bytes();
        let height_bytes = height.to_be_bytes();
        if store
            .insert(WINDOW_SIZE_KEY_WIDTH, width_bytes.as_slice())
            .is_err()
        {
            crate::debug_log!("[window_size] save width failed");
        }
        if store
            .insert(WINDOW_SIZE_KEY_HEIGHT, height_bytes.as_slice())
            .is_err()
        {
            crate::debug_log!("[window_size] save height failed");
        }
        let _ = store.flush();
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_chapter_index(&self) -> Option<usize> {
        let current_id = self.current_chapter_id.as_deref()?;
        self.chapters.iter().position(|c| c.id == current_id)
    }

    fn has_prev_chapter(&self) -> bool {
        self.current_chapter_index().is_some_and(|ix| ix > 0)
    }

    fn has_next_chapter(&self) -> bool {
        self.current_chapter_index()
            .is_some_and(|ix| ix + 1 < self.chapters.len())
    }

    fn current_chapter_title(&self) -> String {
        let Some(current_id) = self.current_chapter_id.as_deref() else {
            return String::new();
        };
        self.chapters
            .iter()
            .find(|chapter| chapter.id == current_id)
            .map(|chapter| chapter.title.clone())
            .unwrap_or_else(|| current_id.to_string())
    }

    fn zoom_label(&self) -> SharedString {
        format!("{:.0}%", self.zoom_scale * 100.0).into()
    }

    fn show_toast(
        &mut self,
        kind: ToastKind,
        message: impl Into<SharedString>,
        cx: &mut Context<Self>,
    ) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
        });
        self.toast_epoch = self.toast_epoch.wrapping_add(1);
        let toast_epoch = self.toast_epoch;
        cx.notify();

        cx.spawn(async move |view, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(TOAST_DURATION_MS))
                .await;

            let _ = view.update(cx, |this, cx| {
                if this.toast_epoch != toast_epoch {
                    return;
                }
                this.toast = None;
                cx.notify();
            });
        })
        .detach();
    }

    /// Startup: fetch the chapter list and the remote position together,
    /// reconcile against the local store, and land on the winning chapter
    /// (or the first one when nothing was persisted).
    fn load_initial_state(&mut self, cx: &mut Context<Self>) {
        let Some(client) = self.client.clone() else {
            self.show_toast(ToastKind::Error, "Failed to initialize viewer", cx);
            return;
        };

        self.is_loading = true;

        cx.spawn(async move |view, cx| {
            let fetched = cx
                .background_executor()
                .spawn({
                    let client = client.clone();
                    async move {
                        let chapters = client.list_chapters()?;
                        // An unreachable position endpoint reads as "absent".
                        let remote = client.load_position().unwrap_or_else(|err| {
                            crate::debug_log!("[state] remote load failed: {:#}", err);
                            None
                        });
                        Ok::<_, anyhow::Error>((chapters, remote))
                    }
                })
                .await;

            let _ = view.update(cx, |this, cx| {
                this.is_loading = false;
                match fetched {
                    Ok((chapters, remote)) => {
                        this.chapters = chapters;
                        let local = this.load_local_position();
                        let restored = resolve_position(local, remote);

                        let Some(restored) = restored.filter(|position| {
                            this.chapters.iter().any(|c| c.id == position.chapter_id)
                        }) else {
                            if let Some(first) = this.chapters.first() {
                                let first_id = first.id.clone();
                                this.select_chapter(first_id, 1, cx);
                            } else {
                                cx.notify();
                            }
                            return;
                        };

                        this.mode = restored.mode;
                        if restored.ui_hidden {
                            this.ui_hidden = true;
                            this.sidebar_open = false;
                        }
                        this.select_chapter(restored.chapter_id, restored.page_index, cx);
                    }
                    Err(err) => {
                        crate::debug_log!("[init] failed: {:#}", err);
                        this.show_toast(ToastKind::Error, "Failed to initialize viewer", cx);
                        cx.notify();
                    }
                }
            });
        })
        .detach();
    }
}
