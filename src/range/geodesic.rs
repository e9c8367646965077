use std::f64::consts::PI;

use crate::geo::{Ellipsoid, GeodeticPosition};
use crate::range::error::RangeError;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Surface distance in meters between the sea-level projections of `a` and `b`
/// (Vincenty's inverse formula).
pub fn surface_distance_m(
    ellipsoid: &Ellipsoid,
    a: &GeodeticPosition,
    b: &GeodeticPosition,
) -> Result<f64, RangeError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(RangeError::InvalidPosition);
    }
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return Ok(0.0);
    }

    let major = ellipsoid.semi_major_axis_m;
    let minor = ellipsoid.semi_minor_axis_m();
    let f = ellipsoid.flattening;

    let l = normalize_longitude(b.longitude - a.longitude);
    let u1 = ((1.0 - f) * a.latitude.tan()).atan();
    let u2 = ((1.0 - f) * b.latitude.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;
    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0, 0.0, 0.0);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0, 0.0);

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;

        if sin_sigma == 0.0 {
            return if cos_sigma > 0.0 {
                Ok(0.0)
            } else {
                Err(RangeError::Degenerate)
            };
        }

        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos²α = 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if lambda.abs() > PI || !lambda.is_finite() {
            return Err(RangeError::Degenerate);
        }
        if (lambda - previous).abs() < CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(RangeError::Degenerate);
    }

    let u_sq = cos_sq_alpha * (major * major - minor * minor) / (minor * minor);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    let distance = minor * big_a * (sigma - delta_sigma);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(RangeError::Degenerate)
    }
}

fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + PI).rem_euclid(2.0 * PI) - PI;
    // Keep +π rather than folding it to -π.
    if wrapped == -PI && lon > 0.0 {
        PI
    } else {
        wrapped
    }
}
