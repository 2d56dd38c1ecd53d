use chrono::NaiveDate;

use crate::planner::{Environment, QualificationInput, QualificationRecord, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Add/edit dialog fields as the user typed them
#[derive(Debug, Clone, PartialEq)]
pub struct EditorForm {
    pub name: String,
    pub team: String,
    pub description: String,
    pub environment: Environment,
    pub start_date: String,
    pub end_date: String,
    pub deployed: bool,
}

impl Default for EditorForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            team: String::new(),
            description: String::new(),
            environment: Environment::ALL[0],
            start_date: String::new(),
            end_date: String::new(),
            deployed: false,
        }
    }
}

impl EditorForm {
    /// Blank form with both dates pre-filled
    pub fn starting_on(date: NaiveDate) -> Self {
        let date = date.format(DATE_FORMAT).to_string();
        Self {
            start_date: date.clone(),
            end_date: date,
            ..Self::default()
        }
    }

    pub fn from_record(record: &QualificationRecord) -> Self {
        Self {
            name: record.name.clone(),
            team: record.team.clone(),
            description: record.description_text().to_string(),
            environment: record.environment,
            start_date: record.start_date.format(DATE_FORMAT).to_string(),
            end_date: record.end_date.format(DATE_FORMAT).to_string(),
            deployed: record.deployed,
        }
    }

    pub fn to_input(&self) -> Result<QualificationInput, ValidationError> {
        let description = self.description.trim();
        let input = QualificationInput {
            name: self.name.trim().to_string(),
            team: self.team.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            environment: self.environment,
            start_date: parse_date("start", &self.start_date)?,
            end_date: parse_date("end", &self.end_date)?,
            deployed: self.deployed,
        };
        input.validate()?;
        Ok(input)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{default_records, RecordId};

    fn filled() -> EditorForm {
        EditorForm {
            name: " v4.0.0 ".to_string(),
            team: "Team D".to_string(),
            description: "  ".to_string(),
            environment: Environment::HeavySimulation,
            start_date: "2024-09-02".to_string(),
            end_date: " 2024-09-13".to_string(),
            deployed: true,
        }
    }

    #[test]
    fn valid_form_becomes_trimmed_input() {
        let input = filled().to_input().unwrap();
        assert_eq!(input.name, "v4.0.0");
        assert_eq!(input.description, None);
        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        assert_eq!(input.end_date, NaiveDate::from_ymd_opt(2024, 9, 13).unwrap());
        assert!(input.deployed);
    }

    #[test]
    fn unparsable_dates_name_the_field() {
        let mut form = filled();
        form.start_date = "02/09/2024".to_string();
        assert!(matches!(
            form.to_input(),
            Err(ValidationError::InvalidDate { field: "start", .. })
        ));

        let mut form = filled();
        form.end_date = String::new();
        assert!(matches!(
            form.to_input(),
            Err(ValidationError::InvalidDate { field: "end", .. })
        ));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = filled();
        form.end_date = "2024-09-01".to_string();
        assert!(matches!(form.to_input(), Err(ValidationError::EndBeforeStart { .. })));
    }

    #[test]
    fn missing_team_is_rejected() {
        let mut form = filled();
        form.team = " ".to_string();
        assert_eq!(form.to_input(), Err(ValidationError::MissingTeam));
    }

    #[test]
    fn record_prefills_the_form() {
        let records = default_records();
        let record = records.iter().find(|r| r.id == RecordId(3)).unwrap();
        let form = EditorForm::from_record(record);
        assert_eq!(form.start_date, "2024-10-01");
        assert_eq!(form.environment, Environment::PreExhibition);
        assert!(form.deployed);

        let input = form.to_input().unwrap();
        assert_eq!(input.description.as_deref(), Some("Migration to the new architecture"));
    }

    #[test]
    fn new_form_starts_on_given_date() {
        let form = EditorForm::starting_on(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(form.start_date, "2024-09-01");
        assert_eq!(form.end_date, "2024-09-01");
        assert_eq!(form.environment, Environment::LightSimulation);
    }
}
