//! Great-circle distances between coordinates.

use std::cmp::Ordering;

use crate::catalog::{Community, NearbyCommunity};

/// Earth radius used for distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.138;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine distance in metres, rounded to two decimals.
#[must_use]
pub fn distance_meters(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat1 - lat2;
    let d_lng = a.lng.to_radians() - b.lng.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let meters = 2.0 * h.sqrt().asin() * EARTH_RADIUS_KM * 1000.0;
    (meters * 100.0).round() / 100.0
}

/// Attach distances from `origin` and sort nearest first.
///
/// Without an origin every distance is `None` and the input order is kept.
/// Communities without coordinates sort last.
#[must_use]
pub fn rank_by_distance(communities: Vec<Community>, origin: Option<Point>) -> Vec<NearbyCommunity> {
    let mut ranked: Vec<NearbyCommunity> = communities
        .into_iter()
        .map(|community| {
            let distance = match (origin, community.lat, community.lng) {
                (Some(origin), Some(lat), Some(lng)) => {
                    Some(distance_meters(origin, Point::new(lat, lng)))
                }
                _ => None,
            };
            NearbyCommunity {
                community,
                distance,
            }
        })
        .collect();

    if origin.is_some() {
        ranked.sort_by(|a, b| match (a.distance, b.distance) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
    ranked
}
