#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NavDirection {
    Forward,
    Backward,
}

/// Enablement and labels for the prev/next controls, recomputed after every
/// navigation, mode change, or chapter-list change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct NavControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub prev_label: &'static str,
    pub next_label: &'static str,
}

/// One page of the current chapter. Replaced wholesale when another chapter
/// is selected; the decoded image arrives later from the loader.
#[derive(Clone)]
pub(super) struct PageView {
    pub index: usize,
    pub url: String,
    pub image: Option<Arc<RenderImage>>,
    pub natural_size: Option<(u32, u32)>,
    pub failed: bool,
}

impl PageView {
    pub(super) fn aspect_ratio(&self) -> f32 {
        match self.natural_size {
            Some((width, height)) if width > 0 => height as f32 / width as f32,
            _ => FALLBACK_PAGE_ASPECT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub(super) struct Toast {
    pub message: SharedString,
    pub kind: ToastKind,
}
