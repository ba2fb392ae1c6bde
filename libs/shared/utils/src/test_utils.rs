use std::sync::Arc;
use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub doctors_source_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            doctors_source_url: "http://localhost:54321/doctors.json".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_mock_uri(uri: &str) -> Self {
        Self {
            doctors_source_url: format!("{}{}", uri, MockDoctorResponses::SOURCE_PATH),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::with_source_url(self.doctors_source_url.clone())
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockDoctorResponses;

impl MockDoctorResponses {
    /// Path the fixture document is served from in wiremock-backed tests.
    pub const SOURCE_PATH: &'static str = "/campus-api-mock/doctors.json";

    pub fn doctor_record(
        id: u64,
        name: &str,
        experience: u32,
        fees: f64,
        specialties: &[&str],
        mode: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "experience": experience,
            "fees": fees,
            "specialties": specialties,
            "mode": mode
        })
    }

    /// Five doctors; ids 2 and 4 are the only video consultations (fees 500 and 300).
    pub fn five_doctors() -> serde_json::Value {
        json!([
            Self::doctor_record(1, "Asha Rao", 12, 700.0, &["Dentist"], "in-clinic"),
            Self::doctor_record(2, "Asha Mehta", 8, 500.0, &["General Physician", "Dermatologist"], "video"),
            Self::doctor_record(3, "Bob Fernandes", 20, 400.0, &["Cardiologist"], "in-clinic"),
            Self::doctor_record(4, "Kavya Iyer", 5, 300.0, &["Dermatologist"], "video"),
            Self::doctor_record(5, "Rahul Sen", 15, 900.0, &["Gynaecologist", "Dentist"], "in-clinic"),
        ])
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "error": message
        })
    }
}
