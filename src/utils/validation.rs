//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada: coordenadas, radios de búsqueda, identificadores y tarjetas.

use chrono::{Datelike, Utc};
use validator::ValidationError;

/// Longitud máxima de un identificador de scooter
pub const MAX_SCOOTER_ID_LENGTH: usize = 100;

/// Longitud mínima de contraseña
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || lat < -90.0 || lat > 90.0 {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || lng < -180.0 || lng > 180.0 {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar radio de búsqueda contra el máximo configurado
pub fn validate_radius(radius: f64, max_radius_m: f64) -> Result<(), ValidationError> {
    if let Err(e) = validate_positive(radius) {
        return Err(e);
    }

    if radius > max_radius_m {
        let mut error = ValidationError::new("radius");
        error.add_param("value".into(), &radius);
        error.add_param("max".into(), &max_radius_m);
        return Err(error);
    }

    Ok(())
}

/// Validar y sanitizar un identificador de scooter
pub fn validate_scooter_id(scooter_id: &str) -> Result<String, ValidationError> {
    let scooter_id = scooter_id.trim();

    if scooter_id.is_empty() {
        let mut error = ValidationError::new("scooter_id");
        error.add_param("message".into(), &"Scooter ID cannot be empty".to_string());
        return Err(error);
    }

    if scooter_id.len() > MAX_SCOOTER_ID_LENGTH {
        let mut error = ValidationError::new("scooter_id");
        error.add_param("max_length".into(), &MAX_SCOOTER_ID_LENGTH);
        return Err(error);
    }

    Ok(scooter_id.to_string())
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') || !value.contains('.') {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima de contraseña
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.len() < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password");
        error.add_param("min_length".into(), &MIN_PASSWORD_LENGTH);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + serde::Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

fn card_digits(card_number: &str) -> String {
    card_number.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validar número de tarjeta con el algoritmo de Luhn
///
/// Devuelve los dígitos limpios si la tarjeta es válida.
pub fn validate_card_number(card_number: &str) -> Result<String, ValidationError> {
    let clean = card_digits(card_number);

    if clean.len() < 13 || clean.len() > 19 {
        let mut error = ValidationError::new("card_number");
        error.add_param("message".into(), &"Card number must be 13-19 digits".to_string());
        return Err(error);
    }

    // Algoritmo de Luhn
    let mut total: u32 = 0;
    for (i, c) in clean.chars().rev().enumerate() {
        let mut n = c.to_digit(10).unwrap_or(0);
        if i % 2 == 1 {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        total += n;
    }

    if total % 10 != 0 {
        let mut error = ValidationError::new("card_number");
        error.add_param("message".into(), &"Invalid card number".to_string());
        return Err(error);
    }

    Ok(clean)
}

/// Validar fecha de expiración de tarjeta (formato MM/YY, rechaza expiradas)
pub fn validate_card_expiry(expiry: &str) -> Result<String, ValidationError> {
    let invalid = |msg: &str| {
        let mut error = ValidationError::new("expiry");
        error.add_param("message".into(), &msg.to_string());
        error
    };

    let expiry = expiry.trim();
    let (month_str, year_str) = expiry.split_once('/').ok_or_else(|| {
        invalid("Expiry must be in MM/YY format")
    })?;

    if month_str.is_empty() || month_str.len() > 2 || year_str.len() != 2 {
        return Err(invalid("Expiry must be in MM/YY format"));
    }

    let month: u32 = month_str
        .parse()
        .map_err(|_| invalid("Expiry must be in MM/YY format"))?;
    let year: u32 = year_str
        .parse()
        .map_err(|_| invalid("Expiry must be in MM/YY format"))?;

    if month < 1 || month > 12 {
        return Err(invalid("Invalid month"));
    }

    let full_year = 2000 + year;
    let now = Utc::now();
    let (current_year, current_month) = (now.year() as u32, now.month());

    if full_year < current_year || (full_year == current_year && month < current_month) {
        return Err(invalid("Card has expired"));
    }

    Ok(format!("{:02}/{:02}", month, year))
}

/// Validar CVV (3 o 4 dígitos)
pub fn validate_cvv(cvv: &str) -> Result<(), ValidationError> {
    let clean = card_digits(cvv);
    if clean.len() < 3 || clean.len() > 4 {
        let mut error = ValidationError::new("cvv");
        error.add_param("message".into(), &"CVV must be 3-4 digits".to_string());
        return Err(error);
    }
    Ok(())
}

/// Detectar la marca de la tarjeta a partir del IIN
pub fn detect_card_type(card_number: &str) -> String {
    let clean = card_digits(card_number);

    let iin4 = clean.get(0..4).and_then(|s| s.parse::<u32>().ok());

    let brand = if clean.starts_with('4') {
        "Visa"
    } else if ["51", "52", "53", "54", "55"].iter().any(|p| clean.starts_with(p))
        || iin4.map_or(false, |n| (2221..=2720).contains(&n))
    {
        "Mastercard"
    } else if clean.starts_with("34") || clean.starts_with("37") {
        "American Express"
    } else if clean.starts_with("6011") || clean.starts_with("65") {
        "Discover"
    } else {
        "Credit Card"
    };

    brand.to_string()
}

/// Enmascarar número de tarjeta mostrando solo los últimos 4 dígitos
pub fn mask_card_number(card_number: &str) -> String {
    let clean = card_digits(card_number);
    if clean.len() < 4 {
        return "****".to_string();
    }
    format!("**** **** **** {}", &clean[clean.len() - 4..])
}
