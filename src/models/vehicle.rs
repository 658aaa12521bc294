//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus enumerados tipados y la fila
//! resumida que usan los listados. Mapea exactamente al schema PostgreSQL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Implementa `as_str`, `Display`, `FromStr` y `ALL` para un enumerado
/// cuyo valor en texto coincide con el de PostgreSQL.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "'{}' is not a valid {}",
                        other,
                        stringify!($name)
                    )),
                }
            }
        }
    };
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    HybridElectric,
    Gas,
}

text_enum!(FuelType {
    Petrol => "petrol",
    Diesel => "diesel",
    Electric => "electric",
    Hybrid => "hybrid",
    HybridElectric => "hybrid_electric",
    Gas => "gas",
});

/// Transmisión - mapea al ENUM transmission_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Automatic,
    Cvt,
}

text_enum!(Transmission {
    Manual => "manual",
    Automatic => "automatic",
    Cvt => "cvt",
});

/// Carrocería - mapea al ENUM body_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "body_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Sedan,
    Saloon,
    Hatchback,
    Suv,
    Coupe,
    Convertible,
    Wagon,
    Pickup,
    Van,
}

text_enum!(BodyType {
    Sedan => "sedan",
    Saloon => "saloon",
    Hatchback => "hatchback",
    Suv => "suv",
    Coupe => "coupe",
    Convertible => "convertible",
    Wagon => "wagon",
    Pickup => "pickup",
    Van => "van",
});

/// Estado del vehículo - mapea al ENUM vehicle_status.
/// `Deleted` es el borrado lógico: ninguna lectura devuelve esos vehículos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Deleted,
}

text_enum!(VehicleStatus {
    Active => "active",
    Deleted => "deleted",
});

impl VehicleStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, VehicleStatus::Active)
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
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
    pub status: VehicleStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehicle con el nombre del propietario y el estado de wishlist del actor
#[derive(Debug, Clone, FromRow)]
pub struct VehicleWithOwner {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,
    pub created_by_username: String,
    pub is_wishlisted: bool,
}

/// Fila de listado: campos ligeros más imagen de portada
#[derive(Debug, Clone, FromRow)]
pub struct VehicleSummary {
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

/// Campos de un vehículo nuevo ya validados
#[derive(Debug, Clone)]
pub struct NewVehicle {
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
}

/// Cambios parciales sobre un vehículo existente
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub price: Option<Decimal>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub mileage: Option<String>,
    pub body_type: Option<BodyType>,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
}

impl VehicleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.fuel_type.is_none()
            && self.transmission.is_none()
            && self.mileage.is_none()
            && self.body_type.is_none()
            && self.color.is_none()
            && self.engine.is_none()
            && self.description.is_none()
            && self.features.is_none()
    }
}

/// Filtros del listado ya interpretados. `None` no restringe ese eje.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    pub search: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub body_type: Option<BodyType>,
    pub transmission: Option<Transmission>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_text_matches_serde() {
        for fuel in FuelType::ALL {
            let json = serde_json::to_string(fuel).unwrap();
            assert_eq!(json, format!("\"{}\"", fuel.as_str()));
            assert_eq!(fuel.as_str().parse::<FuelType>().unwrap(), *fuel);
        }
        for body in BodyType::ALL {
            let json = serde_json::to_string(body).unwrap();
            assert_eq!(json, format!("\"{}\"", body.as_str()));
        }
        for transmission in Transmission::ALL {
            assert_eq!(
                transmission.as_str().parse::<Transmission>().unwrap(),
                *transmission
            );
        }
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        assert!("steam".parse::<FuelType>().is_err());
        assert!("Hybrid_Electric".parse::<FuelType>().is_err());
        assert!("truck".parse::<BodyType>().is_err());
        assert_eq!(" cvt ".parse::<Transmission>().unwrap(), Transmission::Cvt);
    }

    #[test]
    fn test_status() {
        assert!(VehicleStatus::Active.is_active());
        assert!(!VehicleStatus::Deleted.is_active());
    }

    #[test]
    fn test_empty_changes() {
        assert!(VehicleChanges::default().is_empty());
        let changes = VehicleChanges {
            color: Some("Red".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
