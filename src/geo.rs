use serde::Serialize;
use utoipa::ToSchema;

/// Reference ellipsoid used for geodetic conversions and surface distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis_m: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis_m: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    pub fn semi_minor_axis_m(&self) -> f64 {
        self.semi_major_axis_m * (1.0 - self.flattening)
    }

    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Longitude and latitude in radians, height in meters above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeodeticPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl GeodeticPosition {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64, height: f64) -> Self {
        Self::new(longitude_deg.to_radians(), latitude_deg.to_radians(), height)
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude.to_degrees()
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude.to_degrees()
    }

    /// Same longitude and latitude, projected onto the ellipsoid surface.
    pub fn at_sea_level(&self) -> Self {
        Self {
            height: 0.0,
            ..*self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.height.is_finite()
    }

    pub fn to_ecef_m(&self, ellipsoid: &Ellipsoid) -> [f64; 3] {
        let a = ellipsoid.semi_major_axis_m;
        let e2 = ellipsoid.eccentricity_squared();
        let sin_lat = self.latitude.sin();
        let cos_lat = self.latitude.cos();
        let sin_lon = self.longitude.sin();
        let cos_lon = self.longitude.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let x = (n + self.height) * cos_lat * cos_lon;
        let y = (n + self.height) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + self.height) * sin_lat;
        [x, y, z]
    }

    /// Iterative (Bowring) conversion from earth-fixed cartesian meters.
    pub fn from_ecef_m(ecef: [f64; 3], ellipsoid: &Ellipsoid) -> Self {
        let [x, y, z] = ecef;
        let a = ellipsoid.semi_major_axis_m;
        let e2 = ellipsoid.eccentricity_squared();
        let p = (x * x + y * y).sqrt();
        let longitude = y.atan2(x);

        let mut latitude = z.atan2(p * (1.0 - e2));
        for _ in 0..10 {
            let sin_lat = latitude.sin();
            let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            latitude = (z + e2 * n * sin_lat).atan2(p);
        }

        let sin_lat = latitude.sin();
        let cos_lat = latitude.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let height = if cos_lat.abs() > 1e-10 {
            p / cos_lat - n
        } else {
            z.abs() / sin_lat.abs() - n * (1.0 - e2)
        };

        Self {
            longitude,
            latitude,
            height,
        }
    }
}
