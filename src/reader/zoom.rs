//! The two zoom strategies: a pan/zoom transform for the single-page view and
//! width-rescale math for the continuous column.

pub(super) const ZOOM_MIN: f32 = 0.5;
pub(super) const ZOOM_MAX: f32 = 4.0;
pub(super) const ZOOM_STEP: f32 = 0.25;

const COLUMN_MAX_WIDTH: f32 = 900.0;
const COLUMN_VIEWPORT_FRACTION: f32 = 0.95;

// Keep at least this much of the image on-stage while panning.
const PAN_MIN_VISIBLE_PX: f32 = 48.0;

pub(super) fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Scales are kept at two decimals so `scale == 1.0` is a meaningful check
/// for "not zoomed" after arbitrary pinch arithmetic.
pub(super) fn round_scale(scale: f32) -> f32 {
    (scale * 100.0).round() / 100.0
}

pub(super) fn is_identity(scale: f32) -> bool {
    scale == 1.0
}

/// Continuous-column page width at the given scale.
pub(super) fn column_page_width(stage_width: f32, scale: f32) -> f32 {
    COLUMN_MAX_WIDTH.min(stage_width * COLUMN_VIEWPORT_FRACTION) * scale
}

/// Explicit sizing state of the continuous column. Identity scale means no
/// width override, no horizontal scrolling, zero offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct ColumnLayout {
    pub page_width: Option<f32>,
    pub hscroll_enabled: bool,
    pub scroll_left: f32,
}

/// Recomputes the column layout for a new scale while keeping the content
/// under `focus_offset` (stage-local x, or the stage center) visually fixed.
/// The caller applies `scroll_left` once the new widths have laid out.
pub(super) fn column_layout(
    stage_width: f32,
    scale: f32,
    previous: &ColumnLayout,
    focus_offset: Option<f32>,
) -> ColumnLayout {
    if is_identity(scale) {
        return ColumnLayout::default();
    }

    let page_width = column_page_width(stage_width, scale);
    if page_width <= stage_width {
        return ColumnLayout {
            page_width: Some(page_width),
            hscroll_enabled: false,
            scroll_left: 0.0,
        };
    }

    let focus_offset = focus_offset
        .unwrap_or(stage_width / 2.0)
        .clamp(0.0, stage_width);
    let prev_scroll_width = previous.page_width.unwrap_or(stage_width).max(stage_width);
    let scroll_left = preserved_scroll_left(
        prev_scroll_width,
        previous.scroll_left,
        focus_offset,
        page_width,
    );

    ColumnLayout {
        page_width: Some(page_width),
        hscroll_enabled: true,
        scroll_left,
    }
}

/// The same content fraction sits under the same focus offset before and
/// after a resize.
pub(super) fn preserved_scroll_left(
    prev_scroll_width: f32,
    prev_scroll_left: f32,
    focus_offset: f32,
    next_scroll_width: f32,
) -> f32 {
    let ratio = if prev_scroll_width > 0.0 {
        ((prev_scroll_left + focus_offset) / prev_scroll_width).clamp(0.0, 1.0)
    } else {
        0.5
    };
    (next_scroll_width * ratio - focus_offset).max(0.0)
}

/// The transform controller for the single-page view. At most one instance is
/// alive at a time; the view drops it before every page-view rebuild and
/// constructs a fresh one against the new image element.
#[derive(Debug)]
pub(super) struct PanZoomController {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    image_size: (f32, f32),
    stage_size: (f32, f32),
}

impl PanZoomController {
    /// `image_size` is the fitted size at identity scale; `stage_size` the
    /// stage the image is centered in.
    pub(super) fn new(image_size: (f32, f32), stage_size: (f32, f32)) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            image_size,
            stage_size,
        }
    }

    pub(super) fn scale(&self) -> f32 {
        self.scale
    }

    pub(super) fn scaled_size(&self) -> (f32, f32) {
        (
            self.image_size.0 * self.scale,
            self.image_size.1 * self.scale,
        )
    }

    /// Stage-local position of the image's top-left corner.
    pub(super) fn top_left(&self) -> (f32, f32) {
        let (width, height) = self.scaled_size();
        (
            (self.stage_size.0 - width) / 2.0 + self.offset_x,
            (self.stage_size.1 - height) / 2.0 + self.offset_y,
        )
    }

    /// Applies a new scale. With a focal point (stage-local), the content
    /// under it stays fixed; without one the image scales about its center.
    /// Exactly 1.0 recenters, since panning may have moved the focus away.
    pub(super) fn zoom_to(&mut self, target: f32, focal: Option<(f32, f32)>) {
        let next = clamp_scale(target);
        if is_identity(round_scale(next)) {
            self.reset();
            return;
        }

        if let Some((focal_x, focal_y)) = focal {
            let ratio = next / self.scale;
            let center_x = self.stage_size.0 / 2.0;
            let center_y = self.stage_size.1 / 2.0;
            self.offset_x = (focal_x - center_x) - (focal_x - center_x - self.offset_x) * ratio;
            self.offset_y = (focal_y - center_y) - (focal_y - center_y - self.offset_y) * ratio;
        }

        self.scale = next;
        self.clamp_offset();
    }

    pub(super) fn pan_by(&mut self, delta_x: f32, delta_y: f32) {
        if is_identity(round_scale(self.scale)) {
            return;
        }
        self.offset_x += delta_x;
        self.offset_y += delta_y;
        self.clamp_offset();
    }

    pub(super) fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    fn clamp_offset(&mut self) {
        let (width, height) = self.scaled_size();
        let max_x = ((width + self.stage_size.0) / 2.0 - PAN_MIN_VISIBLE_PX).max(0.0);
        let max_y = ((height + self.stage_size.1) / 2.0 - PAN_MIN_VISIBLE_PX).max(0.0);
        self.offset_x = self.offset_x.clamp(-max_x, max_x);
        self.offset_y = self.offset_y.clamp(-max_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_clamped_to_the_bounds() {
        assert_eq!(clamp_scale(0.1), ZOOM_MIN);
        assert_eq!(clamp_scale(9.0), ZOOM_MAX);
        assert_eq!(clamp_scale(1.3), 1.3);
    }

    #[test]
    fn column_width_caps_at_900_and_follows_the_scale() {
        assert_eq!(column_page_width(2000.0, 1.0), 900.0);
        assert_eq!(column_page_width(2000.0, 2.0), 1800.0);
        assert_eq!(column_page_width(800.0, 1.0), 760.0);
    }

    #[test]
    fn identity_layout_clears_all_overrides() {
        let zoomed = ColumnLayout {
            page_width: Some(1800.0),
            hscroll_enabled: true,
            scroll_left: 240.0,
        };
        let cleared = column_layout(1000.0, 1.0, &zoomed, Some(500.0));
        assert_eq!(cleared, ColumnLayout::default());
        // Applying identity again yields the same state: the round trip is
        // idempotent.
        assert_eq!(column_layout(1000.0, 1.0, &cleared, None), cleared);
    }

    #[test]
    fn narrow_result_disables_horizontal_scroll() {
        let layout = column_layout(1000.0, 0.5, &ColumnLayout::default(), None);
        assert_eq!(layout.page_width, Some(450.0));
        assert!(!layout.hscroll_enabled);
        assert_eq!(layout.scroll_left, 0.0);
    }

    #[test]
    fn focal_fraction_is_preserved_across_a_resize() {
        // Focus sits over the middle of a 2000px-wide column scrolled 500px
        // in a 1000px stage; after doubling, the same fraction holds.
        let next = preserved_scroll_left(2000.0, 500.0, 500.0, 4000.0);
        assert_eq!(next, 1500.0);
        let fraction_before = (500.0 + 500.0) / 2000.0;
        let fraction_after = (next + 500.0) / 4000.0;
        assert_eq!(fraction_before, fraction_after);
    }

    #[test]
    fn preserved_scroll_never_goes_negative() {
        assert_eq!(preserved_scroll_left(1000.0, 0.0, 500.0, 1200.0), 100.0);
        assert_eq!(preserved_scroll_left(1000.0, 0.0, 900.0, 1001.0), 0.0);
    }

    #[test]
    fn zoom_about_a_point_keeps_it_fixed() {
        let mut transform = PanZoomController::new((800.0, 1200.0), (1000.0, 1400.0));
        let focal = (700.0, 300.0);

        // Image-space location under the focal point before zooming.
        let (left, top) = transform.top_left();
        let image_x = (focal.0 - left) / transform.scale();
        let image_y = (focal.1 - top) / transform.scale();

        transform.zoom_to(2.0, Some(focal));

        let (left, top) = transform.top_left();
        let image_x_after = (focal.0 - left) / transform.scale();
        let image_y_after = (focal.1 - top) / transform.scale();
        assert!((image_x - image_x_after).abs() < 0.5);
        assert!((image_y - image_y_after).abs() < 0.5);
    }

    #[test]
    fn zooming_back_to_identity_recenters() {
        let mut transform = PanZoomController::new((800.0, 1200.0), (1000.0, 1400.0));
        transform.zoom_to(3.0, Some((100.0, 100.0)));
        transform.pan_by(-250.0, 180.0);
        transform.zoom_to(1.0, None);
        assert_eq!(transform.scale(), 1.0);
        assert_eq!(transform.top_left(), (100.0, 100.0));
    }

    #[test]
    fn panning_cannot_push_the_image_fully_off_stage() {
        let stage = (1000.0, 1400.0);
        let mut transform = PanZoomController::new((800.0, 1200.0), stage);
        transform.zoom_to(2.0, None);
        transform.pan_by(100_000.0, -100_000.0);

        let (width, height) = transform.scaled_size();
        let (left, top) = transform.top_left();
        // A sliver of the image stays inside the stage on both axes.
        assert!(left <= stage.0 - PAN_MIN_VISIBLE_PX);
        assert!(left + width >= PAN_MIN_VISIBLE_PX);
        assert!(top <= stage.1 - PAN_MIN_VISIBLE_PX);
        assert!(top + height >= PAN_MIN_VISIBLE_PX);
    }

    #[test]
    fn panning_at_identity_is_ignored() {
        let mut transform = PanZoomController::new((800.0, 1200.0), (1000.0, 1400.0));
        transform.pan_by(50.0, 50.0);
        assert_eq!(transform.top_left(), (100.0, 100.0));
    }
}
