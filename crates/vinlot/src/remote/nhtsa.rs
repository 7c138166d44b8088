//! NHTSA vPIC decoder.
//!
//! Uses the flat `DecodeVinValues` endpoint, which returns one row of
//! string-valued fields per VIN.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::{VinDecodedData, VinDecoder};
use crate::config::DecoderConfig;
use crate::error::{Error, Result};
use crate::vin::{check, normalize, ValidationError};

/// Placeholder values the service uses for "no data".
const EMPTY_MARKERS: &[&str] = &["", "Not Applicable"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DecodeResponse {
    #[serde(default)]
    results: Vec<HashMap<String, Option<String>>>,
}

/// Decoder backed by the NHTSA vPIC API.
#[derive(Debug, Clone)]
pub struct NhtsaDecoder {
    client: reqwest::Client,
    base_url: String,
}

impl NhtsaDecoder {
    /// Build a decoder from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &DecoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request URL for a VIN.
    #[must_use]
    pub fn url_for(&self, vin: &str) -> String {
        format!("{}/DecodeVinValues/{vin}?format=json", self.base_url)
    }
}

#[async_trait::async_trait]
impl VinDecoder for NhtsaDecoder {
    fn name(&self) -> &'static str {
        "nhtsa"
    }

    async fn decode(&self, vin: &str) -> Result<VinDecodedData> {
        let vin = request_vin(vin)?;
        let url = self.url_for(&vin);
        debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote_decode(
                vin,
                format!("service responded with HTTP {status}"),
            ));
        }

        let body = response.text().await?;
        parse_response(&vin, &body)
    }
}

/// Normalize a VIN and make sure it is safe to place in a URL path.
///
/// Only the check digit may be wrong; the service still decodes such VINs.
fn request_vin(vin: &str) -> Result<String> {
    let vin = normalize(vin);
    match check(&vin) {
        Ok(()) | Err(ValidationError::CheckDigitMismatch) => Ok(vin),
        Err(reason) => Err(Error::remote_decode(vin, format!("VIN rejected: {reason}"))),
    }
}

/// Map a `DecodeVinValues` JSON body into [`VinDecodedData`].
///
/// # Errors
///
/// Returns an error if the body is not valid JSON, has no result rows, or
/// the row carries neither a make nor a model.
pub fn parse_response(vin: &str, body: &str) -> Result<VinDecodedData> {
    let response: DecodeResponse = serde_json::from_str(body)?;
    let Some(row) = response.results.into_iter().next() else {
        return Err(Error::remote_decode(vin, "no data found for VIN"));
    };

    let field = |key: &str| -> Option<String> {
        row.get(key)
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|value| !EMPTY_MARKERS.contains(value))
            .map(str::to_string)
    };

    let data = VinDecodedData {
        brand: field("Make"),
        model: field("Model"),
        year: field("ModelYear").and_then(|y| y.parse().ok()),
        body_type: field("BodyClass"),
        engine_type: field("EngineConfiguration").or_else(|| field("EngineModel")),
        engine_volume: field("DisplacementL").and_then(|d| d.parse().ok()),
        fuel_type: field("FuelTypePrimary"),
        transmission: field("TransmissionStyle"),
        drive_type: field("DriveType"),
        color: None,
        doors: field("Doors").and_then(|d| d.parse().ok()),
        seats: field("Seats").and_then(|s| s.parse().ok()),
        vin: vin.to_string(),
    };

    if data.brand.is_none() && data.model.is_none() {
        return Err(Error::remote_decode(vin, "no data found for VIN"));
    }

    debug!(
        "Decoded {} as {} {}",
        vin,
        data.brand.as_deref().unwrap_or("?"),
        data.model.as_deref().unwrap_or("?")
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCORD: &str = r#"{
        "Count": 1,
        "Message": "Results returned successfully",
        "SearchCriteria": "VIN:1HGCM82633A004352",
        "Results": [{
            "Make": "HONDA",
            "Model": "Accord",
            "ModelYear": "2003",
            "BodyClass": "Coupe",
            "EngineConfiguration": "V-Shaped",
            "EngineModel": "J30A4",
            "DisplacementL": "3.0",
            "FuelTypePrimary": "Gasoline",
            "TransmissionStyle": "Automatic",
            "DriveType": "",
            "Doors": "2",
            "Seats": null,
            "ErrorCode": "0"
        }]
    }"#;

    #[test]
    fn test_parse_full_row() {
        let data = parse_response("1HGCM82633A004352", ACCORD).unwrap();

        assert_eq!(data.brand.as_deref(), Some("HONDA"));
        assert_eq!(data.model.as_deref(), Some("Accord"));
        assert_eq!(data.year, Some(2003));
        assert_eq!(data.body_type.as_deref(), Some("Coupe"));
        assert_eq!(data.engine_type.as_deref(), Some("V-Shaped"));
        assert_eq!(data.engine_volume, Some(3.0));
        assert_eq!(data.fuel_type.as_deref(), Some("Gasoline"));
        assert_eq!(data.transmission.as_deref(), Some("Automatic"));
        assert_eq!(data.drive_type, None);
        assert_eq!(data.color, None);
        assert_eq!(data.doors, Some(2));
        assert_eq!(data.seats, None);
        assert_eq!(data.vin, "1HGCM82633A004352");
    }

    #[test]
    fn test_engine_model_fallback() {
        let body = r#"{"Results":[{"Make":"FORD","EngineConfiguration":"Not Applicable","EngineModel":"Duratec"}]}"#;
        let data = parse_response("1FAFP40634F172825", body).unwrap();
        assert_eq!(data.engine_type.as_deref(), Some("Duratec"));
        assert_eq!(data.model, None);
    }

    #[test]
    fn test_empty_results() {
        let err = parse_response("1HGCM82633A004352", r#"{"Count":0,"Results":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no data found"));
    }

    #[test]
    fn test_row_without_make_or_model() {
        let body = r#"{"Results":[{"Make":"","Model":"","ModelYear":"2003"}]}"#;
        let err = parse_response("1HGCM82633A004352", body).unwrap_err();
        assert!(matches!(err, Error::RemoteDecode { .. }));
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_response("1HGCM82633A004352", "<html>busy</html>").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_unparseable_numbers_are_dropped() {
        let body = r#"{"Results":[{"Make":"BMW","ModelYear":"unknown","Doors":"many"}]}"#;
        let data = parse_response("WBA00000000000000", body).unwrap();
        assert_eq!(data.year, None);
        assert_eq!(data.doors, None);
    }

    #[test]
    fn test_request_vin_normalizes() {
        assert_eq!(
            request_vin(" 1hgcm82633a004352 ").unwrap(),
            "1HGCM82633A004352"
        );
    }

    #[test]
    fn test_request_vin_allows_check_digit_mismatch() {
        assert_eq!(
            request_vin("1HGCM82643A004352").unwrap(),
            "1HGCM82643A004352"
        );
    }

    #[test]
    fn test_request_vin_rejects_path_characters() {
        for input in ["../../../x?a=1#zz", "1HGCM826/3A004352", "1HGCM82633A00435%"] {
            let err = request_vin(input).unwrap_err();
            assert!(matches!(err, Error::RemoteDecode { .. }), "{input}");
        }
    }

    #[test]
    fn test_request_vin_rejects_wrong_length() {
        let err = request_vin("1HGCM826").unwrap_err();
        assert!(err.to_string().contains("wrong length"));
    }

    #[tokio::test]
    async fn test_decode_rejects_before_request() {
        let config = DecoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..DecoderConfig::default()
        };
        let decoder = NhtsaDecoder::new(&config).unwrap();
        let err = decoder.decode("../../../x?a=1#zz").await.unwrap_err();
        assert!(matches!(err, Error::RemoteDecode { .. }));
    }

    #[test]
    fn test_url_for() {
        let config = DecoderConfig {
            base_url: "https://example.test/api/".to_string(),
            ..DecoderConfig::default()
        };
        let decoder = NhtsaDecoder::new(&config).unwrap();
        assert_eq!(
            decoder.url_for("1HGCM82633A004352"),
            "https://example.test/api/DecodeVinValues/1HGCM82633A004352?format=json"
        );
        assert_eq!(decoder.name(), "nhtsa");
    }
}
