use crate::canvas::{Node, NodeKind};
use crate::geometry::{DimensionLookup, Point, Rect, Size};

/// Probe directions for the radial search, tried in this order at each radius:
/// N, NE, E, SE, S, SW, W, NW.
const COMPASS: [(f64, f64); 8] = [
    (0.0, -1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
];

/// Sibling fan-out offsets relative to the parent, cycled by existing child
/// count. Spaced so that consecutive children of the same parent land clear of
/// each other without displacement.
pub const CHILD_OFFSETS: [(f64, f64); 5] = [
    (480.0, 0.0),
    (480.0, 320.0),
    (480.0, -320.0),
    (0.0, 320.0),
    (0.0, -320.0),
];

/// Tunable knobs for the placement search.
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Required clearance between node rectangles, applied on every side.
    pub margin: f64,
    /// Radial search step. Defaults to the margin.
    pub step: f64,
    /// Search gives up past this radius and falls back to a deterministic
    /// offset along the positive x axis.
    pub max_radius: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            step: 40.0,
            max_radius: 2000.0,
        }
    }
}

impl PlacementConfig {
    /// Static footprint of a node card by type.
    pub fn footprint(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Tweet => Size::new(400.0, 200.0),
            NodeKind::Question => Size::new(400.0, 250.0),
            NodeKind::Note => Size::new(350.0, 100.0),
        }
    }

    fn size_of(&self, node: &Node, lookup: Option<&dyn DimensionLookup>) -> Size {
        lookup
            .and_then(|l| l.dimensions(&node.id))
            .unwrap_or_else(|| self.footprint(node.kind()))
    }
}

/// Finds a collision-free position for a new node of the given size, starting
/// from the desired position.
///
/// The desired position is returned unchanged when the canvas is empty or the
/// spot is already free. Otherwise the search probes the eight compass
/// directions at increasing radii (stepped by [`PlacementConfig::step`]) and
/// returns the first free probe. An exhausted search degrades to the desired
/// position pushed `max_radius` units along the positive x axis rather than
/// failing.
pub fn find_free_position(
    config: &PlacementConfig,
    desired: Point,
    size: Size,
    nodes: &[Node],
    lookup: Option<&dyn DimensionLookup>,
) -> Point {
    if nodes.is_empty() {
        return desired;
    }

    if is_position_free(config, desired, size, nodes, lookup) {
        return desired;
    }

    let mut radius = config.step;
    while radius <= config.max_radius {
        for (dx, dy) in COMPASS {
            let probe = desired.offset_by(dx * radius, dy * radius);
            if is_position_free(config, probe, size, nodes, lookup) {
                return probe;
            }
        }
        radius += config.step;
    }

    desired.offset_by(config.max_radius, 0.0)
}

/// Desired position for a new child of a parent at `parent`, before collision
/// resolution: one of the five fan-out offsets, cycled by the number of
/// children the parent already has.
pub fn child_desired_position(parent: Point, existing_children: usize) -> Point {
    let (dx, dy) = CHILD_OFFSETS[existing_children % CHILD_OFFSETS.len()];
    parent.offset_by(dx, dy)
}

/// Tests whether a rectangle of `size` at `position` keeps the configured
/// clearance from every existing node.
pub fn is_position_free(
    config: &PlacementConfig,
    position: Point,
    size: Size,
    nodes: &[Node],
    lookup: Option<&dyn DimensionLookup>,
) -> bool {
    let candidate = Rect::new(position, size);
    nodes.iter().all(|node| {
        let occupied = Rect::new(node.position, config.size_of(node, lookup));
        !candidate.intersects(&occupied.expanded(config.margin))
    })
}
