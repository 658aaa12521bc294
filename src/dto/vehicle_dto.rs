//! DTOs de vehículos
//!
//! Los requests de creación y actualización llegan como JSON (con
//! `image_urls`) o como multipart (con ficheros en `uploaded_images`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    dto::{image_dto::VehicleImageResponse, FromForm},
    models::{
        vehicle::{
            BodyType, FuelType, NewVehicle, Transmission, VehicleChanges, VehicleFilter,
            VehicleSummary, VehicleWithOwner,
        },
        vehicle_image::VehicleImage,
    },
    utils::{
        errors::{validation_error, AppError, AppResult},
        multipart::FormData,
        validation::{validate_features, validate_image_url, validate_not_blank, validate_price},
    },
};

/// Tamaño máximo de página del listado
pub const MAX_PAGE_SIZE: i64 = 100;

fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    urls.iter().try_for_each(|url| validate_image_url(url))
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: String,
    #[validate(range(min = 1886, max = 2100))]
    pub year: i32,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    #[validate(length(min = 1, max = 50))]
    pub mileage: String,
    pub body_type: BodyType,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    #[validate(length(min = 1, max = 100))]
    pub engine: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    #[validate(custom = "validate_features")]
    pub features: Vec<String>,
    #[serde(default)]
    #[validate(custom = "validate_image_urls")]
    pub image_urls: Vec<String>,
}

impl CreateVehicleRequest {
    /// Separa los datos del vehículo de las URLs de imágenes
    pub fn into_parts(self) -> (NewVehicle, Vec<String>) {
        let vehicle = NewVehicle {
            title: self.title.trim().to_string(),
            year: self.year,
            price: self.price,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            mileage: self.mileage,
            body_type: self.body_type,
            color: self.color,
            engine: self.engine,
            description: self.description,
            features: self.features,
        };
        (vehicle, self.image_urls)
    }
}

fn required<T: FromStr>(form: &FormData, name: &'static str) -> AppResult<T> {
    form.parse(name)?
        .ok_or_else(|| validation_error(name, "This field is required."))
}

fn optional_text(form: &FormData, name: &str) -> Option<String> {
    form.text(name).map(str::to_string)
}

/// `features` en un formulario: campo repetido o un único array JSON
fn form_features(form: &FormData) -> AppResult<Option<Vec<String>>> {
    match form.texts("features") {
        [] => Ok(None),
        [single] if single.trim_start().starts_with('[') => serde_json::from_str(single)
            .map(Some)
            .map_err(|_| AppError::BadRequest("features must be a JSON array of strings".to_string())),
        values => Ok(Some(
            values
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
        )),
    }
}

impl FromForm for CreateVehicleRequest {
    fn from_form(form: &FormData) -> AppResult<Self> {
        Ok(Self {
            title: required(form, "title")?,
            year: required(form, "year")?,
            price: required(form, "price")?,
            fuel_type: required(form, "fuel_type")?,
            transmission: required(form, "transmission")?,
            mileage: required(form, "mileage")?,
            body_type: required(form, "body_type")?,
            color: required(form, "color")?,
            engine: required(form, "engine")?,
            description: required(form, "description")?,
            features: form_features(form)?.unwrap_or_default(),
            image_urls: form.texts("image_urls").to_vec(),
        })
    }
}

// Request para actualizar un vehículo (PUT y PATCH son parciales)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: Option<String>,
    #[validate(range(min = 1886, max = 2100))]
    pub year: Option<i32>,
    #[validate(custom = "validate_price")]
    pub price: Option<Decimal>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    #[validate(length(min = 1, max = 50))]
    pub mileage: Option<String>,
    pub body_type: Option<BodyType>,
    #[validate(length(min = 1, max = 50))]
    pub color: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub engine: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(custom = "validate_features")]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    #[validate(custom = "validate_image_urls")]
    pub image_urls: Vec<String>,
}

impl UpdateVehicleRequest {
    pub fn into_parts(self) -> (VehicleChanges, Vec<String>) {
        let changes = VehicleChanges {
            title: self.title.map(|title| title.trim().to_string()),
            year: self.year,
            price: self.price,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            mileage: self.mileage,
            body_type: self.body_type,
            color: self.color,
            engine: self.engine,
            description: self.description,
            features: self.features,
        };
        (changes, self.image_urls)
    }
}

impl FromForm for UpdateVehicleRequest {
    fn from_form(form: &FormData) -> AppResult<Self> {
        Ok(Self {
            title: optional_text(form, "title"),
            year: form.parse("year")?,
            price: form.parse("price")?,
            fuel_type: form.parse("fuel_type")?,
            transmission: form.parse("transmission")?,
            mileage: optional_text(form, "mileage"),
            body_type: form.parse("body_type")?,
            color: optional_text(form, "color"),
            engine: optional_text(form, "engine"),
            description: optional_text(form, "description"),
            features: form_features(form)?,
            image_urls: form.texts("image_urls").to_vec(),
        })
    }
}

/// Parámetros de query del listado, tal como llegan
#[derive(Debug, Default, Deserialize)]
pub struct VehicleListQuery {
    pub search: Option<String>,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub transmission: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Valor no vacío de un parámetro, ya recortado
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(
    value: &Option<String>,
    field: &'static str,
    message: &'static str,
) -> AppResult<Option<T>> {
    present(value)
        .map(|raw| raw.parse::<T>().map_err(|_| validation_error(field, message)))
        .transpose()
}

impl VehicleListQuery {
    /// Interpreta los parámetros; vacío equivale a ausente
    pub fn into_filter(self) -> AppResult<VehicleFilter> {
        let limit: Option<i64> = parse_param(&self.limit, "limit", "A valid integer is required.")?;
        let offset: Option<i64> =
            parse_param(&self.offset, "offset", "A valid integer is required.")?;

        if limit.is_some_and(|limit| !(1..=MAX_PAGE_SIZE).contains(&limit)) {
            return Err(validation_error("limit", "Ensure this value is between 1 and 100."));
        }
        if offset.is_some_and(|offset| offset < 0) {
            return Err(validation_error("offset", "Ensure this value is greater than or equal to 0."));
        }

        Ok(VehicleFilter {
            search: present(&self.search).map(str::to_string),
            fuel_type: parse_param(&self.fuel_type, "fuel_type", "Select a valid choice.")?,
            body_type: parse_param(&self.body_type, "body_type", "Select a valid choice.")?,
            transmission: parse_param(&self.transmission, "transmission", "Select a valid choice.")?,
            min_price: parse_param(&self.min_price, "min_price", "Enter a number.")?,
            max_price: parse_param(&self.max_price, "max_price", "Enter a number.")?,
            min_year: parse_param(&self.min_year, "min_year", "Enter a whole number.")?,
            max_year: parse_param(&self.max_year, "max_year", "Enter a whole number.")?,
            limit,
            offset,
        })
    }
}

/// Elemento ligero del listado
#[derive(Debug, Serialize)]
pub struct VehicleListItem {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub price: Decimal,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub mileage: String,
    pub body_type: BodyType,
    pub color: String,
    pub primary_image: Option<String>,
    pub is_wishlisted: bool,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleSummary> for VehicleListItem {
    fn from(summary: VehicleSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            year: summary.year,
            price: summary.price,
            fuel_type: summary.fuel_type,
            transmission: summary.transmission,
            mileage: summary.mileage,
            body_type: summary.body_type,
            color: summary.color,
            primary_image: summary.primary_image,
            is_wishlisted: summary.is_wishlisted,
            created_by_username: summary.created_by_username,
            created_at: summary.created_at,
        }
    }
}

// Response de vehículo con imágenes
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub price: Decimal,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub mileage: String,
    pub body_type: BodyType,
    pub color: String,
    pub engine: String,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<VehicleImageResponse>,
    pub is_wishlisted: bool,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl VehicleDetailResponse {
    pub fn new(detail: VehicleWithOwner, images: Vec<VehicleImage>) -> Self {
        let vehicle = detail.vehicle;
        Self {
            id: vehicle.id,
            title: vehicle.title,
            year: vehicle.year,
            price: vehicle.price,
            fuel_type: vehicle.fuel_type,
            transmission: vehicle.transmission,
            mileage: vehicle.mileage,
            body_type: vehicle.body_type,
            color: vehicle.color,
            engine: vehicle.engine,
            description: vehicle.description,
            features: vehicle.features,
            images: images.into_iter().map(VehicleImageResponse::from).collect(),
            is_wishlisted: detail.is_wishlisted,
            created_by: vehicle.created_by,
            created_by_username: detail.created_by_username,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
            is_active: vehicle.status.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_json() -> serde_json::Value {
        json!({
            "title": "2017 Volkswagen Golf",
            "year": 2017,
            "price": "14000.00",
            "fuel_type": "petrol",
            "transmission": "manual",
            "mileage": "60,000 miles",
            "body_type": "hatchback",
            "color": "Red",
            "engine": "1.4 TSI",
            "description": "One owner",
            "features": ["ABS", "Navigation"]
        })
    }

    #[test]
    fn test_create_request_from_json() {
        let request: CreateVehicleRequest = serde_json::from_value(create_json()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.price, Decimal::new(1_400_000, 2));
        assert!(request.image_urls.is_empty());
    }

    #[test]
    fn test_create_request_rejects_unknown_fuel_type() {
        let mut body = create_json();
        body["fuel_type"] = json!("steam");
        assert!(serde_json::from_value::<CreateVehicleRequest>(body).is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let mut body = create_json();
        body["title"] = json!("   ");
        body["price"] = json!("-5");
        body["image_urls"] = json!(["not a url"]);
        let request: CreateVehicleRequest = serde_json::from_value(body).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("image_urls"));
    }

    #[test]
    fn test_create_request_from_form() {
        let mut form = FormData::default();
        for (name, value) in [
            ("title", "Golf"),
            ("year", "2017"),
            ("price", "14000"),
            ("fuel_type", "diesel"),
            ("transmission", "automatic"),
            ("mileage", "10,000 miles"),
            ("body_type", "saloon"),
            ("color", "Blue"),
            ("engine", "2.0 TDI"),
            ("description", "Clean"),
            ("features", r#"["ABS","Heated seats"]"#),
        ] {
            form.insert_text(name, value);
        }

        let request = CreateVehicleRequest::from_form(&form).unwrap();
        assert_eq!(request.fuel_type, FuelType::Diesel);
        assert_eq!(request.body_type, BodyType::Saloon);
        assert_eq!(request.features, vec!["ABS", "Heated seats"]);
    }

    #[test]
    fn test_create_form_missing_field() {
        let mut form = FormData::default();
        form.insert_text("title", "Golf");
        match CreateVehicleRequest::from_form(&form) {
            Err(AppError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("year"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_update_form_repeated_features() {
        let mut form = FormData::default();
        form.insert_text("features", "ABS");
        form.insert_text("features", "Sunroof");
        form.insert_text("color", "Green");

        let request = UpdateVehicleRequest::from_form(&form).unwrap();
        let (changes, urls) = request.into_parts();
        assert_eq!(changes.features, Some(vec!["ABS".to_string(), "Sunroof".to_string()]));
        assert_eq!(changes.color.as_deref(), Some("Green"));
        assert!(changes.title.is_none());
        assert!(urls.is_empty());
    }

    #[test]
    fn test_list_query_empty_values_are_ignored() {
        let query = VehicleListQuery {
            search: Some("  ".to_string()),
            fuel_type: Some(String::new()),
            min_price: Some("10000".to_string()),
            max_year: Some("2020".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.fuel_type, None);
        assert_eq!(filter.min_price, Some(Decimal::new(10_000, 0)));
        assert_eq!(filter.max_year, Some(2020));
    }

    #[test]
    fn test_list_query_invalid_values() {
        let query = VehicleListQuery {
            body_type: Some("truck".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));

        let query = VehicleListQuery {
            limit: Some("0".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }
}
