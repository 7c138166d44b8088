//! Remote VIN decoding.
//!
//! The local decoder only knows what the VIN structure encodes. Make, model,
//! body and drivetrain details come from an external vehicle-data service
//! behind the [`VinDecoder`] trait. Each call is an independent request:
//! there is no retry, caching or request de-duplication.

mod nhtsa;

use serde::{Deserialize, Serialize};

use crate::config::DecoderConfig;
use crate::error::Result;

pub use nhtsa::{parse_response, NhtsaDecoder};

/// Vehicle details returned by a remote decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VinDecodedData {
    /// Manufacturer brand (make).
    pub brand: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<u16>,
    /// Body class, e.g. "Sedan/Saloon".
    pub body_type: Option<String>,
    /// Engine configuration or model.
    pub engine_type: Option<String>,
    /// Engine displacement in litres.
    pub engine_volume: Option<f64>,
    /// Primary fuel type.
    pub fuel_type: Option<String>,
    /// Transmission style.
    pub transmission: Option<String>,
    /// Drive type, e.g. "FWD".
    pub drive_type: Option<String>,
    /// Exterior color.
    pub color: Option<String>,
    /// Number of doors.
    pub doors: Option<u8>,
    /// Number of seats.
    pub seats: Option<u8>,
    /// The VIN that was decoded.
    pub vin: String,
}

/// A source of vehicle details keyed by VIN.
#[async_trait::async_trait]
pub trait VinDecoder: Send + Sync {
    /// Name of this decoder (for logging).
    fn name(&self) -> &'static str;

    /// Look up vehicle details for a VIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the VIN has the wrong length or illegal
    /// characters, the request fails, or the service has no data for it.
    async fn decode(&self, vin: &str) -> Result<VinDecodedData>;
}

/// Decode a VIN with the configured remote service.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the lookup fails.
pub async fn decode_remote(config: &DecoderConfig, vin: &str) -> Result<VinDecodedData> {
    let decoder = NhtsaDecoder::new(config)?;
    decoder.decode(vin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Decoder that answers from a fixed record.
    #[derive(Debug)]
    struct StaticDecoder {
        data: VinDecodedData,
    }

    #[async_trait::async_trait]
    impl VinDecoder for StaticDecoder {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn decode(&self, vin: &str) -> Result<VinDecodedData> {
            if vin == self.data.vin {
                Ok(self.data.clone())
            } else {
                Err(Error::remote_decode(vin, "no data found for VIN"))
            }
        }
    }

    fn sample() -> VinDecodedData {
        VinDecodedData {
            brand: Some("HONDA".to_string()),
            model: Some("Accord".to_string()),
            year: Some(2003),
            vin: "1HGCM82633A004352".to_string(),
            ..VinDecodedData::default()
        }
    }

    #[tokio::test]
    async fn test_decoder_trait_object() {
        let decoder: Box<dyn VinDecoder> = Box::new(StaticDecoder { data: sample() });

        let data = decoder.decode("1HGCM82633A004352").await.unwrap();
        assert_eq!(data.brand.as_deref(), Some("HONDA"));
        assert_eq!(decoder.name(), "static");

        let err = decoder.decode("1M8GDM9AXKP042788").await.unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_decode_remote_rejects_short_vin_without_request() {
        let config = DecoderConfig {
            // Unroutable; the VIN check must fail first.
            base_url: "http://127.0.0.1:9".to_string(),
            ..DecoderConfig::default()
        };
        let err = decode_remote(&config, "1HGCM8").await.unwrap_err();
        assert!(matches!(err, Error::RemoteDecode { .. }));
        assert!(err.to_string().contains("wrong length"));
    }

    #[test]
    fn test_decoded_data_serialization() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["brand"], "HONDA");
        assert_eq!(json["year"], 2003);
        assert_eq!(json["color"], serde_json::Value::Null);
        assert_eq!(json["vin"], "1HGCM82633A004352");
    }
}
