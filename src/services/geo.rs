//! Utilidades geográficas
//!
//! Distancia de círculo máximo (haversine) entre dos pares lat/lng WGS84.
//! La usan tanto la búsqueda de flota como el cálculo de distancia recorrida.

use serde::Serialize;

/// Radio medio de la Tierra en metros
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Par de coordenadas para vistas de la API
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Distancia haversine en metros entre dos puntos.
///
/// El término intermedio se recorta a [0, 1] para que puntos antipodales o
/// coincidentes nunca produzcan NaN por ruido de coma flotante.
pub fn distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, lambda1) = (lat1.to_radians(), lng1.to_radians());
    let (phi2, lambda2) = (lat2.to_radians(), lng2.to_radians());

    let dphi = phi2 - phi1;
    let dlambda = lambda2 - lambda1;

    let sin_dphi = (dphi * 0.5).sin();
    let sin_dlambda = (dlambda * 0.5).sin();

    let h = (sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda)
        .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_m(41.3851, 2.1734, 41.3851, 2.1734), 0.0);
        assert_eq!(distance_m(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(distance_m(-90.0, 0.0, -90.0, 0.0), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = distance_m(41.3851, 2.1734, 48.8566, 2.3522);
        let b = distance_m(48.8566, 2.3522, 41.3851, 2.1734);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // Un grado de arco sobre el ecuador: 2 * pi * R / 360
        let expected = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M / 360.0;
        let d = distance_m(0.0, 0.0, 0.0, 1.0);
        assert!((d - expected).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = distance_m(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        // Media circunferencia terrestre
        let expected = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - expected).abs() < 1.0, "got {}", d);
    }
}
