//! Utilidades de validación
//!
//! Funciones usadas por las reglas `#[validate(custom = ...)]` de los DTOs
//! y helpers de conversión compartidos por los controladores.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Número máximo de características por vehículo
pub const MAX_FEATURES: usize = 50;

/// Longitud máxima de cada característica
pub const MAX_FEATURE_LENGTH: usize = 200;

/// Validar nombre de usuario: letras, dígitos y `@.+-_`
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !valid {
        let mut error = ValidationError::new("username");
        error.message = Some("Username may only contain letters, digits and @.+-_".into());
        return Err(error);
    }
    Ok(())
}

/// Validar precio: no negativo y representable en NUMERIC(10, 2)
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut error = ValidationError::new("price");
        error.message = Some("Price cannot be negative".into());
        return Err(error);
    }
    if value.scale() > 2 {
        let mut error = ValidationError::new("price");
        error.message = Some("Price cannot have more than two decimal places".into());
        return Err(error);
    }
    if *value >= Decimal::new(100_000_000, 0) {
        let mut error = ValidationError::new("price");
        error.message = Some("Price must be lower than 100000000".into());
        return Err(error);
    }
    Ok(())
}

/// Validar lista de características
pub fn validate_features(values: &[String]) -> Result<(), ValidationError> {
    if values.len() > MAX_FEATURES {
        let mut error = ValidationError::new("features");
        error.add_param("max".into(), &MAX_FEATURES);
        return Err(error);
    }
    if values
        .iter()
        .any(|f| f.trim().is_empty() || f.chars().count() > MAX_FEATURE_LENGTH)
    {
        let mut error = ValidationError::new("features");
        error.message = Some("Features must be non-empty strings".into());
        return Err(error);
    }
    Ok(())
}

/// Validar URL de imagen alojada externamente
pub fn validate_image_url(value: &str) -> Result<(), ValidationError> {
    let ok = (value.starts_with("https://") || value.starts_with("http://"))
        && !value.chars().any(char::is_whitespace)
        && value.len() <= 2048;
    if !ok {
        let mut error = ValidationError::new("image_url");
        error.message = Some("Image URL must be an absolute http(s) URL".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Escapa los comodines de `LIKE`/`ILIKE` y envuelve el término en `%...%`
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Interpreta valores booleanos de formularios (`true`, `1`, `on`, `yes`)
pub fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin_test").is_ok());
        assert!(validate_username("john.doe+cars@x").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::from_str("14000").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("14000.99").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_price(&Decimal::from_str("1.999").unwrap()).is_err());
        assert!(validate_price(&Decimal::from_str("100000000").unwrap()).is_err());
    }

    #[test]
    fn test_validate_features() {
        assert!(validate_features(&["Navigation".to_string()]).is_ok());
        assert!(validate_features(&[]).is_ok());
        assert!(validate_features(&["  ".to_string()]).is_err());
        let too_many: Vec<String> = (0..=MAX_FEATURES).map(|i| format!("f{i}")).collect();
        assert!(validate_features(&too_many).is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://cdn.example.com/a.jpg").is_ok());
        assert!(validate_image_url("/media/abc.png").is_err());
        assert!(validate_image_url("../media/abc.png").is_err());
        assert!(validate_image_url("ftp://example.com/a.jpg").is_err());
        assert!(validate_image_url("https://example.com/a b.jpg").is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bmw"), "%bmw%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn test_parse_form_bool() {
        assert_eq!(parse_form_bool("true"), Some(true));
        assert_eq!(parse_form_bool("ON"), Some(true));
        assert_eq!(parse_form_bool("0"), Some(false));
        assert_eq!(parse_form_bool("maybe"), None);
    }
}
