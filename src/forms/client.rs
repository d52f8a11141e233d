use serde::Deserialize;
use validator::Validate;

use crate::domain::ticket::TicketPatch;

#[derive(Deserialize, Validate)]
/// Form data for editing a derived client.
///
/// There is no client record to write to, so the edit is expressed over the
/// editable ticket fields and fanned out to every member ticket. Fields left
/// empty are not written.
pub struct SaveClientForm {
    /// Encoded identity key of the client being edited.
    #[validate(length(min = 1))]
    pub client_id: String,
    pub status: Option<String>,
    pub service_operations: Option<String>,
    pub defect_cause: Option<String>,
    pub observations: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_cost: Option<f64>,
}

impl From<&SaveClientForm> for TicketPatch {
    fn from(form: &SaveClientForm) -> Self {
        TicketPatch {
            status: non_empty(form.status.as_deref()),
            service_operations: non_empty(form.service_operations.as_deref()),
            defect_cause: non_empty(form.defect_cause.as_deref()),
            observations: non_empty(form.observations.as_deref()),
            estimated_cost: form.estimated_cost,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_stay_out_of_the_patch() {
        let form = SaveClientForm {
            client_id: "Ana Pop|0722111222".to_string(),
            status: Some("".to_string()),
            service_operations: None,
            defect_cause: Some("umiditate".to_string()),
            observations: Some("  ".to_string()),
            estimated_cost: None,
        };
        let patch = TicketPatch::from(&form);
        assert_eq!(patch.status, None);
        assert_eq!(patch.defect_cause.as_deref(), Some("umiditate"));
        assert_eq!(patch.observations, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn negative_cost_fails_validation() {
        let form = SaveClientForm {
            client_id: "Ana|1".to_string(),
            status: None,
            service_operations: None,
            defect_cause: None,
            observations: None,
            estimated_cost: Some(-5.0),
        };
        assert!(form.validate().is_err());
    }
}
