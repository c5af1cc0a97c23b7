//! View axis: the per-dimension mapping from data indices to pixel spans.
//!
//! A [`ViewAxis`] describes one dimension of the grid (columns or rows).
//! It owns the permutation from view position to data index, the hidden
//! set, sparse per-index size overrides, and the default/header sizes,
//! and answers pixel queries with the shared zoom factor applied at query
//! time.
//!
//! Two index spaces meet here and must never be confused:
//!
//! - **data index**: stable logical index into the model, unaffected by
//!   hide/reorder;
//! - **view position**: slot in the on-screen sequence, connected to data
//!   indices only through the axis `order` permutation.
//!
//! Pixel queries go through a lazily rebuilt cumulative-offset table, so
//! `start_pixel` is O(1) and `index_at` is O(log n) regardless of axis
//! size; mutations and zoom changes invalidate the table.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::Property;
use trellis_core::logging::targets;

/// Which dimension an axis (or an axis-wide operation) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The horizontal axis: view positions are columns.
    Columns,
    /// The vertical axis: view positions are rows.
    Rows,
}

/// A position in the on-screen sequence of one axis.
///
/// This replaces the raw sentinel integers (`HEADER = -1`, body = `0..`,
/// `AFTER = count`) with a tagged type; raw integers appear only at the
/// boundary via [`ViewPos::to_raw`] / [`ViewPos::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPos {
    /// The header band (always unscrolled, before the first body slot).
    Header,
    /// A body slot. Hidden entries still occupy a slot; they just span
    /// zero pixels.
    Body(usize),
    /// The synthetic position past the last body slot, used to terminate
    /// drag selections and to mark full-extent selections.
    After,
    /// Not a position. Returned for coordinates outside the axis.
    Invalid,
}

impl ViewPos {
    /// The first body slot.
    pub const FIRST_CELL: ViewPos = ViewPos::Body(0);

    /// Returns the body slot index, if this is a body position.
    pub fn body(self) -> Option<usize> {
        match self {
            ViewPos::Body(i) => Some(i),
            _ => None,
        }
    }

    /// Returns whether this is a body position.
    pub fn is_body(self) -> bool {
        matches!(self, ViewPos::Body(_))
    }

    /// Converts to the raw integer encoding used at the axis boundary.
    ///
    /// `Invalid` has no raw encoding and maps to `i32::MIN`.
    pub fn to_raw(self, count: usize) -> i32 {
        match self {
            ViewPos::Header => -1,
            ViewPos::Body(i) => i as i32,
            ViewPos::After => count as i32,
            ViewPos::Invalid => i32::MIN,
        }
    }

    /// Converts from the raw integer encoding used at the axis boundary.
    pub fn from_raw(raw: i32, count: usize) -> ViewPos {
        if raw == -1 {
            ViewPos::Header
        } else if raw >= 0 && (raw as usize) < count {
            ViewPos::Body(raw as usize)
        } else if raw >= 0 && raw as usize == count {
            ViewPos::After
        } else {
            ViewPos::Invalid
        }
    }
}

/// Cached cumulative pixel offsets for one zoom level.
///
/// `starts[p]` is the pixel offset of body position `p` relative to the
/// start of the body band; `starts[count]` is the total body span.
struct PixelCache {
    valid: bool,
    zoom: f32,
    starts: Vec<i64>,
}

impl PixelCache {
    fn invalid() -> Self {
        Self {
            valid: false,
            zoom: 1.0,
            starts: Vec::new(),
        }
    }
}

/// One dimension of the grid: ordered mapping from data indices to pixel
/// spans under hide, resize, reorder, and zoom.
///
/// Invariants:
/// - `order` is a bijection over `0..count`;
/// - `hidden` only contains data indices `< count`;
/// - whenever `count > 0`, at least one entry stays visible (hide refuses
///   requests that would violate this).
pub struct ViewAxis {
    orientation: Orientation,
    count: usize,
    default_size: u32,
    header_size: u32,
    size_overrides: HashMap<usize, u32>,
    hidden: HashSet<usize>,
    /// View position -> data index.
    order: Vec<usize>,
    /// Data index -> view position (inverse of `order`).
    positions: Vec<usize>,
    /// Shared scale factor, read at query time and never stored
    /// pre-scaled into sizes.
    zoom: Arc<Property<f32>>,
    cache: RwLock<PixelCache>,
}

impl ViewAxis {
    /// Creates an axis with identity order and no overrides.
    pub fn new(
        orientation: Orientation,
        count: usize,
        default_size: u32,
        header_size: u32,
        zoom: Arc<Property<f32>>,
    ) -> Self {
        Self {
            orientation,
            count,
            default_size,
            header_size,
            size_overrides: HashMap::new(),
            hidden: HashSet::new(),
            order: (0..count).collect(),
            positions: (0..count).collect(),
            zoom,
            cache: RwLock::new(PixelCache::invalid()),
        }
    }

    /// Returns which dimension this axis describes.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of logical (data) indices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Unscaled default entry size in pixels.
    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Unscaled header band size in pixels.
    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom.get()
    }

    // =========================================================================
    // Structure Mutation
    // =========================================================================

    /// Clears overrides and the hidden set, restores identity order, and
    /// installs new default/header sizes.
    pub fn reset(&mut self, default_size: u32, header_size: u32) {
        self.default_size = default_size;
        self.header_size = header_size;
        self.size_overrides.clear();
        self.hidden.clear();
        self.order = (0..self.count).collect();
        self.positions = (0..self.count).collect();
        self.invalidate();
    }

    /// Sets the data-model driven index count.
    ///
    /// Surviving indices keep their relative order, overrides, and hidden
    /// state; new indices append at the end of the order. If shrinking
    /// left nothing visible, the hidden set is cleared to restore the
    /// at-least-one-visible invariant.
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }

        let mut order: Vec<usize> = self.order.iter().copied().filter(|&d| d < count).collect();
        order.extend(self.count.min(count)..count);
        self.count = count;
        self.size_overrides.retain(|&d, _| d < count);
        self.hidden.retain(|&d| d < count);
        self.order = order;
        self.rebuild_positions();

        if count > 0 && self.visible_count() == 0 {
            tracing::debug!(
                target: targets::AXIS,
                orientation = ?self.orientation,
                "count change hid every entry; clearing hidden set"
            );
            self.hidden.clear();
        }
        self.invalidate();
    }

    /// Sets the unscaled default size applied to entries with no override.
    pub fn set_default_size(&mut self, pixels: u32) {
        self.default_size = pixels;
        self.invalidate();
    }

    /// Overrides the size of one data index. Zero pixels behaves like
    /// hiding. Overrides persist across reorder.
    pub fn set_index_size(&mut self, data_index: usize, pixels: u32) {
        debug_assert!(data_index < self.count, "data index out of range");
        self.size_overrides.insert(data_index, pixels);
        self.invalidate();
    }

    /// Removes the size override of one data index, restoring the default.
    pub fn clear_index_size(&mut self, data_index: usize) {
        self.size_overrides.remove(&data_index);
        self.invalidate();
    }

    /// Returns the override for a data index, if any.
    pub fn index_size_override(&self, data_index: usize) -> Option<u32> {
        self.size_overrides.get(&data_index).copied()
    }

    /// All current overrides, keyed by data index.
    pub fn size_overrides(&self) -> &HashMap<usize, u32> {
        &self.size_overrides
    }

    /// Hides the given data indices.
    ///
    /// Refused (returns `false`, axis unchanged) if the request would
    /// leave zero visible indices.
    pub fn hide(&mut self, data_indices: &[usize]) -> bool {
        let requested: HashSet<usize> = data_indices
            .iter()
            .copied()
            .filter(|&d| d < self.count)
            .collect();
        let survivors = (0..self.count)
            .filter(|d| !self.hidden.contains(d) && !requested.contains(d))
            .count();
        if self.count > 0 && survivors == 0 {
            tracing::debug!(
                target: targets::AXIS,
                orientation = ?self.orientation,
                "refusing hide: no visible entries would remain"
            );
            return false;
        }

        self.hidden.extend(requested);
        self.invalidate();
        true
    }

    /// Shows the given data indices. Returns whether anything changed.
    pub fn show(&mut self, data_indices: &[usize]) -> bool {
        let mut changed = false;
        for d in data_indices {
            changed |= self.hidden.remove(d);
        }
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Returns whether a data index is explicitly hidden.
    pub fn is_hidden(&self, data_index: usize) -> bool {
        self.hidden.contains(&data_index)
    }

    /// Number of data indices not explicitly hidden.
    pub fn visible_count(&self) -> usize {
        self.count - self.hidden.len()
    }

    /// Moves the given view positions so they sit contiguously, in their
    /// current relative sequence, immediately before `insert_before`.
    ///
    /// `insert_before` is interpreted in the ORIGINAL position space: the
    /// effective insertion index is reduced by the number of moved entries
    /// that originally sat before it. `After`-equivalent `insert_before ==
    /// count` appends at the end.
    pub fn reorder(&mut self, moving: &BTreeSet<usize>, insert_before: usize) {
        debug_assert!(insert_before <= self.count, "insertion point out of range");
        debug_assert!(moving.iter().all(|&p| p < self.count));
        if moving.is_empty() {
            return;
        }

        let moved: Vec<usize> = moving.iter().map(|&p| self.order[p]).collect();
        let remaining: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|(p, _)| !moving.contains(p))
            .map(|(_, &d)| d)
            .collect();

        let moved_before = moving.iter().take_while(|&&p| p < insert_before).count();
        let at = insert_before - moved_before;

        let mut order = Vec::with_capacity(self.count);
        order.extend_from_slice(&remaining[..at]);
        order.extend_from_slice(&moved);
        order.extend_from_slice(&remaining[at..]);

        self.order = order;
        self.rebuild_positions();
        self.invalidate();
    }

    /// Installs a whole permutation (undo snapshots, sort glue).
    pub fn set_order(&mut self, order: Vec<usize>) {
        debug_assert_eq!(order.len(), self.count);
        debug_assert!(
            {
                let mut seen = vec![false; self.count];
                order.iter().all(|&d| {
                    d < self.count && !std::mem::replace(&mut seen[d], true)
                })
            },
            "order must be a bijection over 0..count"
        );
        self.order = order;
        self.rebuild_positions();
        self.invalidate();
    }

    /// The current permutation, view position -> data index.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Maps a view position to its data index.
    pub fn data_index(&self, view_pos: usize) -> usize {
        self.order[view_pos]
    }

    /// Maps a data index to its view position.
    pub fn view_position(&self, data_index: usize) -> usize {
        self.positions[data_index]
    }

    // =========================================================================
    // Pixel Queries
    // =========================================================================

    /// Effective pixel span of one position at the current zoom.
    ///
    /// Hidden entries span zero pixels, as do entries whose scaled size
    /// rounds to zero (zoom-collapsed); the two remain distinct states.
    pub fn index_pixels(&self, pos: ViewPos) -> i32 {
        match pos {
            ViewPos::Header => self.scaled_header(),
            ViewPos::Body(p) => {
                debug_assert!(p < self.count, "view position out of range");
                self.with_cache(|c| (c.starts[p + 1] - c.starts[p]) as i32)
            }
            ViewPos::After | ViewPos::Invalid => 0,
        }
    }

    /// Pixel offset of the start of a position, relative to the scroll
    /// offset. The header is always unscrolled at offset 0; body
    /// positions shift by `-scroll_offset`.
    pub fn start_pixel(&self, pos: ViewPos, scroll_offset: i32) -> i32 {
        match pos {
            ViewPos::Header => 0,
            ViewPos::Body(p) => {
                debug_assert!(p < self.count, "view position out of range");
                let start = self.with_cache(|c| c.starts[p]);
                self.scaled_header() + start as i32 - scroll_offset
            }
            ViewPos::After => {
                let total = self.with_cache(|c| *c.starts.last().unwrap_or(&0));
                self.scaled_header() + total as i32 - scroll_offset
            }
            ViewPos::Invalid => {
                debug_assert!(false, "start_pixel on Invalid");
                0
            }
        }
    }

    /// Inverse of [`start_pixel`](Self::start_pixel): the position whose
    /// span contains the coordinate.
    ///
    /// Returns `Header` inside the header band, `After` past the last
    /// entry, `Invalid` for negative coordinates. Spans are half-open, so
    /// zero-width entries never match.
    pub fn index_at(&self, pixel: i32, scroll_offset: i32) -> ViewPos {
        if pixel < 0 {
            return ViewPos::Invalid;
        }
        let header = self.scaled_header();
        if pixel < header {
            return ViewPos::Header;
        }

        let rel = (pixel - header + scroll_offset) as i64;
        if rel < 0 {
            // Scrolled-back coordinates between header and first entry.
            return ViewPos::Header;
        }
        self.with_cache(|c| {
            let total = *c.starts.last().unwrap_or(&0);
            if rel >= total {
                return ViewPos::After;
            }
            // Smallest p with starts[p + 1] > rel; zero-width slots are
            // skipped because their start equals their end.
            let p = c.starts[1..].partition_point(|&s| s <= rel);
            ViewPos::Body(p)
        })
    }

    /// Total pixel span: header plus every visible entry, scaled.
    pub fn total_pixels(&self) -> i32 {
        self.scaled_header() + self.content_pixels()
    }

    /// Pixel span of the body band alone (scroll extent).
    pub fn content_pixels(&self) -> i32 {
        self.with_cache(|c| *c.starts.last().unwrap_or(&0) as i32)
    }

    /// Header band size at the current zoom.
    pub fn scaled_header(&self) -> i32 {
        Self::scale(self.header_size, self.zoom.get())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Next position with a nonzero span, saturating at the last visible
    /// position (calling again at the boundary returns the same value).
    pub fn next_visible(&self, pos: ViewPos) -> ViewPos {
        match pos {
            ViewPos::Header => self.first_visible().map_or(ViewPos::Invalid, ViewPos::Body),
            ViewPos::After => self.last_visible().map_or(ViewPos::After, ViewPos::Body),
            ViewPos::Invalid => ViewPos::Invalid,
            ViewPos::Body(_) if self.count == 0 => ViewPos::Invalid,
            ViewPos::Body(p) => self.with_cache(|c| {
                for q in p + 1..self.count {
                    if c.starts[q + 1] > c.starts[q] {
                        return ViewPos::Body(q);
                    }
                }
                // Saturate: stay on the last visible position.
                for q in (0..=p.min(self.count.saturating_sub(1))).rev() {
                    if c.starts[q + 1] > c.starts[q] {
                        return ViewPos::Body(q);
                    }
                }
                ViewPos::Invalid
            }),
        }
    }

    /// Previous position with a nonzero span, saturating at the first
    /// visible position.
    pub fn previous_visible(&self, pos: ViewPos) -> ViewPos {
        match pos {
            ViewPos::Header => ViewPos::Header,
            ViewPos::After => self.last_visible().map_or(ViewPos::After, ViewPos::Body),
            ViewPos::Invalid => ViewPos::Invalid,
            ViewPos::Body(_) if self.count == 0 => ViewPos::Invalid,
            ViewPos::Body(p) => self.with_cache(|c| {
                for q in (0..p.min(self.count)).rev() {
                    if c.starts[q + 1] > c.starts[q] {
                        return ViewPos::Body(q);
                    }
                }
                // Saturate: stay on the first visible position.
                for q in p..self.count {
                    if c.starts[q + 1] > c.starts[q] {
                        return ViewPos::Body(q);
                    }
                }
                ViewPos::Invalid
            }),
        }
    }

    /// First position with a nonzero span.
    pub fn first_visible(&self) -> Option<usize> {
        self.with_cache(|c| (0..self.count).find(|&p| c.starts[p + 1] > c.starts[p]))
    }

    /// Last position with a nonzero span.
    pub fn last_visible(&self) -> Option<usize> {
        self.with_cache(|c| (0..self.count).rev().find(|&p| c.starts[p + 1] > c.starts[p]))
    }

    // =========================================================================
    // Cache
    // =========================================================================

    fn invalidate(&mut self) {
        self.cache.get_mut().valid = false;
    }

    fn rebuild_positions(&mut self) {
        let mut positions = vec![0; self.count];
        for (p, &d) in self.order.iter().enumerate() {
            positions[d] = p;
        }
        self.positions = positions;
    }

    fn scale(raw: u32, zoom: f32) -> i32 {
        let scaled = (raw as f32 * zoom).round();
        if scaled <= 0.0 { 0 } else { scaled as i32 }
    }

    fn effective_size(&self, view_pos: usize, zoom: f32) -> i64 {
        let data = self.order[view_pos];
        if self.hidden.contains(&data) {
            return 0;
        }
        let raw = self
            .size_overrides
            .get(&data)
            .copied()
            .unwrap_or(self.default_size);
        Self::scale(raw, zoom) as i64
    }

    fn with_cache<R>(&self, f: impl FnOnce(&PixelCache) -> R) -> R {
        let zoom = self.zoom.get();
        {
            let cache = self.cache.read();
            if cache.valid && cache.zoom == zoom {
                return f(&cache);
            }
        }
        let mut cache = self.cache.write();
        if !cache.valid || cache.zoom != zoom {
            let mut starts = Vec::with_capacity(self.count + 1);
            let mut acc = 0i64;
            starts.push(0);
            for p in 0..self.count {
                acc += self.effective_size(p, zoom);
                starts.push(acc);
            }
            tracing::trace!(
                target: targets::AXIS,
                orientation = ?self.orientation,
                count = self.count,
                zoom,
                total = acc,
                "rebuilt pixel cache"
            );
            *cache = PixelCache {
                valid: true,
                zoom,
                starts,
            };
        }
        f(&cache)
    }
}

impl std::fmt::Debug for ViewAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewAxis")
            .field("orientation", &self.orientation)
            .field("count", &self.count)
            .field("default_size", &self.default_size)
            .field("header_size", &self.header_size)
            .field("hidden", &self.hidden.len())
            .field("overrides", &self.size_overrides.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(count: usize) -> ViewAxis {
        ViewAxis::new(
            Orientation::Columns,
            count,
            20,
            20,
            Arc::new(Property::new(1.0)),
        )
    }

    fn axis_with_zoom(count: usize, zoom: f32) -> (ViewAxis, Arc<Property<f32>>) {
        let zoom_prop = Arc::new(Property::new(zoom));
        let axis = ViewAxis::new(Orientation::Columns, count, 20, 20, zoom_prop.clone());
        (axis, zoom_prop)
    }

    #[test]
    fn test_start_pixel_defaults() {
        // 10 entries, default 20px, header 20px.
        let a = axis(10);
        assert_eq!(a.start_pixel(ViewPos::FIRST_CELL, 0), 20);
        assert_eq!(a.start_pixel(ViewPos::Body(5), 0), 120);
        assert_eq!(a.total_pixels(), 220);
    }

    #[test]
    fn test_start_pixel_scroll_offset() {
        let a = axis(10);
        // Header stays unscrolled, body shifts.
        assert_eq!(a.start_pixel(ViewPos::Header, 35), 0);
        assert_eq!(a.start_pixel(ViewPos::Body(0), 35), -15);
        assert_eq!(a.start_pixel(ViewPos::Body(5), 35), 85);
    }

    #[test]
    fn test_index_at_bands() {
        let a = axis(10);
        assert_eq!(a.index_at(-5, 0), ViewPos::Invalid);
        assert_eq!(a.index_at(0, 0), ViewPos::Header);
        assert_eq!(a.index_at(19, 0), ViewPos::Header);
        assert_eq!(a.index_at(20, 0), ViewPos::Body(0));
        assert_eq!(a.index_at(39, 0), ViewPos::Body(0));
        assert_eq!(a.index_at(40, 0), ViewPos::Body(1));
        assert_eq!(a.index_at(219, 0), ViewPos::Body(9));
        assert_eq!(a.index_at(220, 0), ViewPos::After);
    }

    #[test]
    fn test_round_trip_under_hide_override_zoom() {
        for zoom in [0.5f32, 1.0, 2.0] {
            let (mut a, _z) = axis_with_zoom(12, zoom);
            a.set_index_size(3, 45);
            a.set_index_size(7, 1);
            assert!(a.hide(&[2, 5, 6]));

            for p in 0..12 {
                if a.index_pixels(ViewPos::Body(p)) == 0 {
                    continue;
                }
                let x = a.start_pixel(ViewPos::Body(p), 0);
                assert_eq!(a.index_at(x, 0), ViewPos::Body(p), "zoom {zoom} pos {p}");
            }
        }
    }

    #[test]
    fn test_hide_show_restores_span() {
        let mut a = axis(10);
        a.set_index_size(2, 50);
        let before = a.total_pixels();

        assert!(a.hide(&[2, 3]));
        assert!(a.total_pixels() < before);
        assert!(a.show(&[2, 3]));
        assert_eq!(a.total_pixels(), before);
    }

    #[test]
    fn test_hide_all_refused() {
        let mut a = axis(4);
        assert!(a.hide(&[0, 1]));
        assert!(!a.hide(&[0, 1, 2, 3]));
        // Axis unchanged by the refusal.
        assert_eq!(a.visible_count(), 2);
        assert!(!a.is_hidden(2));

        // Hiding everything but one is still allowed.
        assert!(a.hide(&[2]));
        assert_eq!(a.visible_count(), 1);
    }

    #[test]
    fn test_next_previous_visible_skip_hidden() {
        let mut a = axis(10);
        assert!(a.hide(&[2, 3]));
        assert_eq!(a.next_visible(ViewPos::Body(1)), ViewPos::Body(4));
        assert_eq!(a.previous_visible(ViewPos::Body(4)), ViewPos::Body(1));
    }

    #[test]
    fn test_next_previous_visible_saturate() {
        let mut a = axis(5);
        assert!(a.hide(&[4]));
        // Last visible is 3; next from there stays put.
        assert_eq!(a.next_visible(ViewPos::Body(3)), ViewPos::Body(3));
        assert_eq!(a.next_visible(ViewPos::Body(4)), ViewPos::Body(3));
        assert_eq!(a.previous_visible(ViewPos::Body(0)), ViewPos::Body(0));
    }

    #[test]
    fn test_sole_visible_entry_saturates_both_ways() {
        let mut a = axis(5);
        assert!(a.hide(&[0, 1, 3, 4]));
        assert_eq!(a.next_visible(ViewPos::Body(2)), ViewPos::Body(2));
        assert_eq!(a.previous_visible(ViewPos::Body(2)), ViewPos::Body(2));
        assert_eq!(a.next_visible(ViewPos::Body(0)), ViewPos::Body(2));
        assert_eq!(a.previous_visible(ViewPos::Body(4)), ViewPos::Body(2));
    }

    #[test]
    fn test_reorder_front_pair_before_three() {
        let mut a = axis(5);
        let moving: BTreeSet<usize> = [0, 1].into_iter().collect();
        a.reorder(&moving, 3);
        assert_eq!(a.order(), &[2, 0, 1, 3, 4]);
    }

    #[test]
    fn test_reorder_non_contiguous() {
        let mut a = axis(6);
        let moving: BTreeSet<usize> = [1, 4].into_iter().collect();
        a.reorder(&moving, 0);
        assert_eq!(a.order(), &[1, 4, 0, 2, 3, 5]);
    }

    #[test]
    fn test_reorder_to_after_end() {
        let mut a = axis(4);
        let moving: BTreeSet<usize> = [0].into_iter().collect();
        a.reorder(&moving, 4);
        assert_eq!(a.order(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_reorder_snapshot_restores_exactly() {
        let mut a = axis(6);
        let before = a.order().to_vec();
        let moving: BTreeSet<usize> = [0, 2, 5].into_iter().collect();
        a.reorder(&moving, 3);
        assert_ne!(a.order(), before.as_slice());
        a.set_order(before.clone());
        assert_eq!(a.order(), before.as_slice());
    }

    #[test]
    fn test_overrides_persist_across_reorder() {
        let mut a = axis(5);
        a.set_index_size(0, 60);
        let moving: BTreeSet<usize> = [0].into_iter().collect();
        a.reorder(&moving, 5);
        // Data index 0 now sits at view position 4, still 60px wide.
        assert_eq!(a.view_position(0), 4);
        assert_eq!(a.index_pixels(ViewPos::Body(4)), 60);
    }

    #[test]
    fn test_zoom_scales_at_query_time() {
        let (a, zoom) = axis_with_zoom(10, 1.0);
        assert_eq!(a.start_pixel(ViewPos::Body(5), 0), 120);

        zoom.set_silent(2.0);
        assert_eq!(a.start_pixel(ViewPos::Body(5), 0), 240);
        assert_eq!(a.scaled_header(), 40);

        zoom.set_silent(0.5);
        assert_eq!(a.start_pixel(ViewPos::Body(5), 0), 60);
    }

    #[test]
    fn test_zoom_collapsed_is_not_hidden() {
        let (mut a, zoom) = axis_with_zoom(5, 1.0);
        a.set_index_size(2, 1);
        zoom.set_silent(0.25);

        // 1px * 0.25 rounds to 0: collapsed, skipped by navigation...
        assert_eq!(a.index_pixels(ViewPos::Body(2)), 0);
        assert_eq!(a.next_visible(ViewPos::Body(1)), ViewPos::Body(3));
        // ...but not in the hidden set.
        assert!(!a.is_hidden(2));

        zoom.set_silent(1.0);
        assert_eq!(a.index_pixels(ViewPos::Body(2)), 1);
    }

    #[test]
    fn test_zero_size_override_behaves_like_hiding() {
        let mut a = axis(5);
        a.set_index_size(1, 0);
        assert_eq!(a.index_pixels(ViewPos::Body(1)), 0);
        assert_eq!(a.next_visible(ViewPos::Body(0)), ViewPos::Body(2));
        assert_eq!(a.total_pixels(), 20 + 4 * 20);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut a = axis(5);
        a.set_index_size(0, 99);
        assert!(a.hide(&[1]));
        a.reorder(&[3].into_iter().collect(), 0);

        a.reset(25, 30);
        assert_eq!(a.order(), &[0, 1, 2, 3, 4]);
        assert!(!a.is_hidden(1));
        assert_eq!(a.index_pixels(ViewPos::Body(0)), 25);
        assert_eq!(a.scaled_header(), 30);
    }

    #[test]
    fn test_set_count_preserves_survivors() {
        let mut a = axis(5);
        a.reorder(&[4].into_iter().collect(), 0);
        assert_eq!(a.order(), &[4, 0, 1, 2, 3]);
        a.set_index_size(1, 77);
        assert!(a.hide(&[2]));

        a.set_count(3);
        assert_eq!(a.order(), &[0, 1, 2]);
        assert_eq!(a.index_size_override(1), Some(77));
        assert!(a.is_hidden(2));

        a.set_count(6);
        assert_eq!(a.order(), &[0, 1, 2, 3, 4, 5]);
        assert!(a.is_hidden(2));
    }

    #[test]
    fn test_set_count_clears_hidden_when_nothing_survives() {
        let mut a = axis(4);
        assert!(a.hide(&[0, 1]));
        // Shrink so only hidden indices remain.
        a.set_count(2);
        assert_eq!(a.visible_count(), 2);
    }

    #[test]
    fn test_view_pos_raw_encoding() {
        assert_eq!(ViewPos::Header.to_raw(5), -1);
        assert_eq!(ViewPos::Body(3).to_raw(5), 3);
        assert_eq!(ViewPos::After.to_raw(5), 5);
        assert_eq!(ViewPos::from_raw(-1, 5), ViewPos::Header);
        assert_eq!(ViewPos::from_raw(3, 5), ViewPos::Body(3));
        assert_eq!(ViewPos::from_raw(5, 5), ViewPos::After);
        assert_eq!(ViewPos::from_raw(9, 5), ViewPos::Invalid);
    }

    #[test]
    fn test_index_at_skips_zero_width_boundary() {
        let mut a = axis(3);
        assert!(a.hide(&[1]));
        // Position 1 spans zero pixels at the boundary between 0 and 2.
        assert_eq!(a.index_at(20 + 19, 0), ViewPos::Body(0));
        assert_eq!(a.index_at(20 + 20, 0), ViewPos::Body(2));
    }
}
