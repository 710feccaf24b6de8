//! Bounding boxes for the initial map view.

use serde::Serialize;

use crate::cluster::LatLng;
use crate::point::GeoPoint;

/// Padding applied around the data when fitting the view.
const FIT_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Mainland Portugal; the view when there is nothing to fit.
pub const PORTUGAL_BOUNDS: Bounds = Bounds {
    south: 36.8,
    west: -9.6,
    north: 42.2,
    east: -6.0,
};

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let mut iter = points.iter();
        let first = iter.next()?;
        let mut b = Bounds {
            south: first.latitude(),
            west: first.longitude(),
            north: first.latitude(),
            east: first.longitude(),
        };
        for p in iter {
            b.south = b.south.min(p.latitude());
            b.north = b.north.max(p.latitude());
            b.west = b.west.min(p.longitude());
            b.east = b.east.max(p.longitude());
        }
        Some(b)
    }

    /// The box around `points` padded by 10%, or [`PORTUGAL_BOUNDS`].
    pub fn around(points: &[GeoPoint]) -> Self {
        Self::from_points(points)
            .map(|b| b.pad(FIT_PADDING))
            .unwrap_or(PORTUGAL_BOUNDS)
    }

    /// Grow each side by `ratio` of the box's extent.
    pub fn pad(&self, ratio: f64) -> Self {
        let dlat = (self.north - self.south) * ratio;
        let dlng = (self.east - self.west) * ratio;
        Bounds {
            south: self.south - dlat,
            west: self.west - dlng,
            north: self.north + dlat,
            east: self.east + dlng,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn contains(&self, at: LatLng) -> bool {
        at.lat >= self.south && at.lat <= self.north && at.lng >= self.west && at.lng <= self.east
    }
}
