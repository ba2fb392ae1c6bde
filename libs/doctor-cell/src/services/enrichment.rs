use crate::models::{DoctorRecord, EnrichedDoctor};

/// Derives the display-only fields of a doctor.
///
/// Implementations must be pure: the same record always yields the same
/// enrichment, so the listing and the detail page agree.
pub trait Enricher: Send + Sync {
    fn enrich(&self, record: DoctorRecord) -> EnrichedDoctor;
}

pub fn enrich_all(enricher: &dyn Enricher, records: Vec<DoctorRecord>) -> Vec<EnrichedDoctor> {
    records.into_iter().map(|record| enricher.enrich(record)).collect()
}

/// Placeholder enrichment keyed on the doctor id until the source publishes
/// clinic data of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloEnricher;

impl Enricher for ModuloEnricher {
    fn enrich(&self, record: DoctorRecord) -> EnrichedDoctor {
        let id = record.id;

        let doctor_type = if id % 2 == 0 { "General Physician" } else { "Senior Specialist" };
        let clinic = if id % 3 == 0 { "Nursdoctor Clinic" } else { "Yarmocoort" };
        let location = if id % 2 == 0 {
            "Apex Multispeciality and Maternity"
        } else {
            "Dada Heights Clinic"
        };

        EnrichedDoctor {
            record,
            doctor_type: doctor_type.to_string(),
            clinic: clinic.to_string(),
            location: location.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConsultationMode;

    fn record(id: u64) -> DoctorRecord {
        DoctorRecord {
            id,
            name: format!("Doctor {}", id),
            experience: 1,
            fees: 100.0,
            specialties: vec![],
            mode: ConsultationMode::Video,
        }
    }

    #[test]
    fn test_modulo_enrichment_values() {
        let even = ModuloEnricher.enrich(record(4));
        assert_eq!(even.doctor_type, "General Physician");
        assert_eq!(even.clinic, "Yarmocoort");
        assert_eq!(even.location, "Apex Multispeciality and Maternity");

        let multiple_of_three = ModuloEnricher.enrich(record(3));
        assert_eq!(multiple_of_three.doctor_type, "Senior Specialist");
        assert_eq!(multiple_of_three.clinic, "Nursdoctor Clinic");
        assert_eq!(multiple_of_three.location, "Dada Heights Clinic");
    }

    #[test]
    fn test_enrichment_is_deterministic_and_position_independent() {
        let forward = enrich_all(&ModuloEnricher, vec![record(1), record(6)]);
        let reversed = enrich_all(&ModuloEnricher, vec![record(6), record(1)]);

        assert_eq!(forward[0], reversed[1]);
        assert_eq!(forward[1], reversed[0]);
        assert_eq!(ModuloEnricher.enrich(record(6)), ModuloEnricher.enrich(record(6)));
    }
}
