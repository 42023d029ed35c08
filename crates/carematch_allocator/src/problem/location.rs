use crate::problem::travel_cost_matrix::{Cost, DISTANCE_SCALE};

/// A geographic position. Coordinates are treated as planar: all hospitals and
/// helpers of a problem are expected to lie in the same region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn is_finite(&self) -> bool {
        self.point.x().is_finite() && self.point.y().is_finite()
    }

    /// Planar distance in degrees, written out as `sqrt(dx² + dy²)` rather than
    /// `geo::Euclidean`, which computes it through `hypot`. The two can differ in
    /// the last bit, and that flips the truncated travel cost of distances
    /// sitting on a tenth.
    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        let delta = self.point - to.point;
        (delta.x() * delta.x() + delta.y() * delta.y()).sqrt()
    }

    /// Distance quantized to one decimal place, truncated toward zero.
    pub fn travel_cost(&self, to: &Location) -> Cost {
        (DISTANCE_SCALE * self.euclidean_distance(to)) as Cost
    }
}

impl From<[f64; 2]> for Location {
    fn from(value: [f64; 2]) -> Self {
        Location::from_lat_lon(value[0], value[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_cost_same_point_is_zero() {
        let a = Location::from_lat_lon(50.9, 6.9);
        assert_eq!(a.travel_cost(&a), 0);
    }

    #[test]
    fn test_travel_cost_scales_by_ten() {
        let a = Location::from_lat_lon(0.0, 0.0);
        let b = Location::from_lat_lon(3.0, 4.0);

        assert_eq!(a.euclidean_distance(&b), 5.0);
        assert_eq!(a.travel_cost(&b), 50);
    }

    #[test]
    fn test_travel_cost_truncates_toward_zero() {
        let a = Location::from_lat_lon(0.0, 0.0);
        // 10 * 0.29 = 2.9
        let b = Location::from_lat_lon(0.29, 0.0);
        assert_eq!(a.travel_cost(&b), 2);

        // 10 * sqrt(2) = 14.14...
        let c = Location::from_lat_lon(1.0, 1.0);
        assert_eq!(a.travel_cost(&c), 14);
    }

    #[test]
    fn test_travel_cost_is_symmetric() {
        let cologne = Location::from_lat_lon(50.9, 6.9);
        let wuppertal = Location::from_lat_lon(51.2, 7.15);

        assert_eq!(cologne.travel_cost(&wuppertal), 3);
        assert_eq!(wuppertal.travel_cost(&cologne), 3);
    }

    #[test]
    fn test_lat_lon_accessors() {
        let location = Location::from([52.5, 13.4]);
        assert_eq!(location.lat(), 52.5);
        assert_eq!(location.lon(), 13.4);
        assert!(location.is_finite());
        assert!(!Location::from_lat_lon(f64::NAN, 1.0).is_finite());
    }
}
