/*
[INPUT]:  Droppable regions registered per frame, the dragged rectangle or pointer
[OUTPUT]: The single drop target the drag is over
[POS]:    Engine core - closest-corners collision detection
[UPDATE]: When the layout gains new kinds of droppable regions
*/

use devflow_adapter::TaskId;

use crate::resolver::DropTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle; `width`/`height` of zero describe a bare point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn point(point: Point) -> Self {
        Self::new(point.x, point.y, 0, 0)
    }

    fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        span_overlaps(self.x, self.right(), point.x, point.x)
            && span_overlaps(self.y, self.bottom(), point.y, point.y)
    }

    /// Overlap test; edges are half-open so adjacent regions never both match.
    pub fn intersects(&self, other: &Rect) -> bool {
        span_overlaps(self.x, self.right(), other.x, other.right())
            && span_overlaps(self.y, self.bottom(), other.y, other.bottom())
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    fn mean_corner_distance(&self, other: &Rect) -> f64 {
        self.corners()
            .iter()
            .zip(other.corners())
            .map(|(a, b)| a.distance(b))
            .sum::<f64>()
            / 4.0
    }
}

/// Does `[start, end)` overlap `[other_start, other_end)`? An empty other span
/// is a single coordinate and must lie inside.
fn span_overlaps(start: i32, end: i32, other_start: i32, other_end: i32) -> bool {
    if other_start == other_end {
        start <= other_start && other_start < end
    } else {
        other_start < end && start < other_end
    }
}

/// Droppable regions of the current frame, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DroppableRegistry {
    regions: Vec<(DropTarget, Rect)>,
}

impl DroppableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, target: DropTarget, rect: Rect) {
        self.regions.push((target, rect));
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn rect_of(&self, target: &DropTarget) -> Option<Rect> {
        self.regions
            .iter()
            .rev()
            .find(|(registered, _)| registered == target)
            .map(|(_, rect)| *rect)
    }

    /// Closest-corners pick among regions intersecting `dragged`.
    ///
    /// Equal distances go to the region registered last.
    pub fn closest(&self, dragged: Rect) -> Option<DropTarget> {
        let mut best: Option<(&DropTarget, f64)> = None;
        for (target, rect) in &self.regions {
            if !rect.intersects(&dragged) {
                continue;
            }
            let distance = rect.mean_corner_distance(&dragged);
            if best.is_none_or(|(_, best_distance)| distance <= best_distance) {
                best = Some((target, distance));
            }
        }
        best.map(|(target, _)| target.clone())
    }

    pub fn closest_to_point(&self, point: Point) -> Option<DropTarget> {
        self.closest(Rect::point(point))
    }

    /// The card under `point`, topmost (last registered) first.
    pub fn card_at(&self, point: Point) -> Option<TaskId> {
        self.regions.iter().rev().find_map(|(target, rect)| match target {
            DropTarget::Card(id) if rect.contains(point) => Some(id.clone()),
            _ => None,
        })
    }
}
