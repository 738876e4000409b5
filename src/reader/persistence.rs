/// Last-write-wins merge of the two optionally-present position records.
/// Ties go to the local copy.
pub(super) fn resolve_position(
    local: Option<ReaderPosition>,
    remote: Option<ReaderPosition>,
) -> Option<ReaderPosition> {
    match (local, remote) {
        (None, None) => None,
        (Some(local), None) => Some(local),
        (None, Some(remote)) => Some(remote),
        (Some(local), Some(remote)) => {
            if local.updated_at >= remote.updated_at {
                Some(local)
            } else {
                Some(remote)
            }
        }
    }
}

/// Debounce bookkeeping for the remote save timer: every new mutation arms a
/// fresh epoch, and a timer only fires if its epoch is still the armed one.
pub(super) fn debounce_arm(epoch: u64) -> u64 {
    epoch.wrapping_add(1)
}

pub(super) fn debounce_should_fire(scheduled: u64, current: u64) -> bool {
    scheduled == current
}

impl ReaderViewer {
    fn load_local_position(&self) -> Option<ReaderPosition> {
        let store = self.position_store.as_ref()?;
        let value = store.get(READER_POSITION_KEY).ok().flatten()?;
        match serde_json::from_slice::<ReaderPosition>(&value) {
            Ok(position) => Some(position),
            Err(err) => {
                crate::debug_log!("[state] local decode failed: {}", err);
                None
            }
        }
    }

    fn write_local_position(&self, position: &ReaderPosition) {
        let Some(store) = self.position_store.as_ref() else {
            return;
        };
        let Ok(value) = serde_json::to_vec(position) else {
            return;
        };
        let _ = store.insert(READER_POSITION_KEY, value);
        let _ = store.flush();
    }

    fn current_position(&self) -> Option<ReaderPosition> {
        let chapter_id = self.current_chapter_id.clone()?;
        Some(ReaderPosition {
            chapter_id,
            page_index: clamp_page_index(self.page_index, self.page_count()),
            mode: self.mode,
            ui_hidden: self.ui_hidden,
            updated_at: Self::now_unix_millis(),
        })
    }

    /// Called on every position-relevant mutation (chapter, page, mode,
    /// chrome visibility — never zoom): local write is synchronous, the
    /// remote write rides a debounce timer and failures stay silent.
    fn save_position(&mut self, cx: &mut Context<Self>) {
        let Some(position) = self.current_position() else {
            return;
        };

        self.write_local_position(&position);
        self.last_saved_index = Some((position.chapter_id.clone(), position.page_index));
        self.schedule_remote_save(position, cx);
    }

    fn schedule_remote_save(&mut self, position: ReaderPosition, cx: &mut Context<Self>) {
        let Some(client) = self.client.clone() else {
            return;
        };

        self.save_epoch = debounce_arm(self.save_epoch);
        let scheduled_epoch = self.save_epoch;

        cx.spawn(async move |view, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(SAVE_DEBOUNCE_MS))
                .await;

            let still_armed = view
                .update(cx, |this, _| {
                    debounce_should_fire(scheduled_epoch, this.save_epoch)
                })
                .unwrap_or(false);
            if !still_armed {
                return;
            }

            cx.background_executor()
                .spawn(async move {
                    if let Err(err) = client.save_position(&position) {
                        crate::debug_log!("[state] remote save failed: {:#}", err);
                    }
                })
                .await;
        })
        .detach();
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    fn position(updated_at: u64) -> ReaderPosition {
        ReaderPosition {
            chapter_id: format!("c{updated_at}"),
            page_index: 1,
            mode: ReadingMode::Vertical,
            ui_hidden: false,
            updated_at,
        }
    }

    #[::core::prelude::v1::test]
    fn newer_remote_record_wins() {
        let chosen = resolve_position(Some(position(100)), Some(position(200))).unwrap();
        assert_eq!(chosen.updated_at, 200);
    }

    #[::core::prelude::v1::test]
    fn equal_timestamps_prefer_local() {
        let mut local = position(150);
        local.chapter_id = "local".into();
        let chosen = resolve_position(Some(local), Some(position(150))).unwrap();
        assert_eq!(chosen.chapter_id, "local");
    }

    #[::core::prelude::v1::test]
    fn a_single_present_record_wins() {
        assert_eq!(
            resolve_position(Some(position(5)), None).unwrap().updated_at,
            5
        );
        assert_eq!(
            resolve_position(None, Some(position(7))).unwrap().updated_at,
            7
        );
    }

    #[::core::prelude::v1::test]
    fn both_absent_resolves_to_absent() {
        assert!(resolve_position(None, None).is_none());
    }

    #[::core::prelude::v1::test]
    fn only_the_latest_armed_save_fires() {
        let mut epoch = 0;
        let first = debounce_arm(epoch);
        epoch = first;
        let second = debounce_arm(epoch);
        epoch = second;

        // The first timer was superseded inside the debounce window.
        assert!(!debounce_should_fire(first, epoch));
        assert!(debounce_should_fire(second, epoch));
    }
}
