use crate::spatial::boundary::{Boundary, BoundaryLayer};
use geo::{BoundingRect, Intersects, Point};
use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

/// Bounding box of one boundary, tagged with its position in the layer.
#[derive(Debug, Clone, PartialEq)]
struct IndexedBoundary {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    /// `[x, y]`, i.e. `[lng, lat]` for WGS84 layers.
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedBoundary {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope.distance_2(point)
    }

    // Points on the box edge count as inside, so boundary-edge stations
    // still reach the exact test.
    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.envelope.contains_point(point)
    }
}

/// Point-in-polygon lookup over a boundary layer.
///
/// Candidates come from an R-tree of bounding boxes and are confirmed with
/// the exact `intersects` predicate, so points on a polygon edge match.
#[derive(Debug, Clone)]
pub struct BoundaryIndex {
    layer: BoundaryLayer,
    tree: RTree<IndexedBoundary>,
}

impl BoundaryIndex {
    pub fn new(layer: BoundaryLayer) -> Self {
        let entries = layer
            .boundaries
            .iter()
            .enumerate()
            .filter_map(|(position, boundary)| {
                let rect = boundary.geometry.bounding_rect()?;
                Some(IndexedBoundary {
                    position,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self {
            layer,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn layer(&self) -> &BoundaryLayer {
        &self.layer
    }

    /// The boundary containing `point`. When several do, the one that comes
    /// first in the layer wins.
    pub fn locate(&self, point: Point<f64>) -> Option<(usize, &Boundary)> {
        self.tree
            .locate_all_at_point(&[point.x(), point.y()])
            .map(|candidate| candidate.position)
            .filter(|&position| self.layer.boundaries[position].geometry.intersects(&point))
            .min()
            .map(|position| (position, &self.layer.boundaries[position]))
    }
}
