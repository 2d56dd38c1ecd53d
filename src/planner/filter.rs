use super::types::{Environment, QualificationRecord};

/// Active filters from the filter bar. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub environment: Option<Environment>,
    pub team: Option<String>,
    pub search: String,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        self.environment.is_some() || self.team.is_some() || !self.search.trim().is_empty()
    }

    pub fn matches(&self, record: &QualificationRecord) -> bool {
        if self.environment.is_some_and(|env| env != record.environment) {
            return false;
        }
        if self.team.as_deref().is_some_and(|team| team != record.team) {
            return false;
        }
        matches_search(record, &self.search)
    }
}

/// Case-insensitive substring match on name, description and team
fn matches_search(record: &QualificationRecord, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    [record.name.as_str(), record.description_text(), record.team.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Rows of one environment section, ordered for display
#[derive(Debug, Clone)]
pub struct EnvironmentGroup<'a> {
    pub environment: Environment,
    pub records: Vec<&'a QualificationRecord>,
}

/// One group per fixed environment, each sorted by start date.
/// The sort is stable so equal starts keep their list order.
pub fn group_by_environment<'a>(
    records: &'a [QualificationRecord],
    filters: &Filters,
) -> Vec<EnvironmentGroup<'a>> {
    Environment::ALL
        .into_iter()
        .map(|environment| {
            let mut rows: Vec<&QualificationRecord> = records
                .iter()
                .filter(|r| r.environment == environment && filters.matches(r))
                .collect();
            rows.sort_by_key(|r| r.start_date);
            EnvironmentGroup {
                environment,
                records: rows,
            }
        })
        .collect()
}

/// Distinct team names in first-seen order
pub fn teams(records: &[QualificationRecord]) -> Vec<String> {
    let mut teams: Vec<String> = Vec::new();
    for record in records {
        if !teams.iter().any(|t| t == &record.team) {
            teams.push(record.team.clone());
        }
    }
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::types::{QualificationInput, RecordId};
    use chrono::NaiveDate;

    fn record(id: i64, team: &str, env: Environment, start_day: u32, description: Option<&str>) -> QualificationRecord {
        let start = NaiveDate::from_ymd_opt(2024, 9, start_day).unwrap();
        QualificationRecord::from_input(
            RecordId(id),
            QualificationInput {
                name: format!("v{}.0.0", id),
                team: team.to_string(),
                description: description.map(String::from),
                environment: env,
                start_date: start,
                end_date: start,
                deployed: false,
            },
        )
    }

    fn ids(group: &EnvironmentGroup<'_>) -> Vec<i64> {
        group.records.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn groups_follow_fixed_environment_order() {
        let records = vec![
            record(1, "Team A", Environment::PreExhibition, 3, None),
            record(2, "Team B", Environment::LightSimulation, 4, None),
        ];
        let groups = group_by_environment(&records, &Filters::default());
        let envs: Vec<_> = groups.iter().map(|g| g.environment).collect();
        assert_eq!(envs, Environment::ALL.to_vec());
        assert_eq!(ids(&groups[0]), vec![2]);
        assert!(groups[1].records.is_empty());
        assert_eq!(ids(&groups[2]), vec![1]);
    }

    #[test]
    fn rows_sorted_by_start_and_stable_for_ties() {
        let records = vec![
            record(1, "Team A", Environment::LightSimulation, 20, None),
            record(2, "Team A", Environment::LightSimulation, 10, None),
            record(3, "Team B", Environment::LightSimulation, 20, None),
            record(4, "Team C", Environment::LightSimulation, 10, None),
        ];
        let groups = group_by_environment(&records, &Filters::default());
        assert_eq!(ids(&groups[0]), vec![2, 4, 1, 3]);
    }

    #[test]
    fn environment_filter_empties_other_groups() {
        let records = vec![
            record(1, "Team A", Environment::LightSimulation, 2, None),
            record(2, "Team A", Environment::HeavySimulation, 2, None),
        ];
        let filters = Filters {
            environment: Some(Environment::HeavySimulation),
            ..Filters::default()
        };
        let groups = group_by_environment(&records, &filters);
        assert!(groups[0].records.is_empty());
        assert_eq!(ids(&groups[1]), vec![2]);
        assert!(filters.is_active());
    }

    #[test]
    fn team_filter_is_exact() {
        let records = vec![
            record(1, "Team A", Environment::LightSimulation, 2, None),
            record(2, "Team AB", Environment::LightSimulation, 3, None),
        ];
        let filters = Filters {
            team: Some("Team A".to_string()),
            ..Filters::default()
        };
        let groups = group_by_environment(&records, &filters);
        assert_eq!(ids(&groups[0]), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let records = vec![
            record(1, "Team A", Environment::LightSimulation, 2, Some("Security update")),
            record(2, "Platform", Environment::LightSimulation, 3, None),
            record(3, "Team B", Environment::LightSimulation, 4, None),
        ];
        let search = |term: &str| {
            let filters = Filters {
                search: term.to_string(),
                ..Filters::default()
            };
            ids(&group_by_environment(&records, &filters)[0])
        };
        assert_eq!(search("SECURITY"), vec![1]);
        assert_eq!(search("platform"), vec![2]);
        assert_eq!(search("v3.0"), vec![3]);
        assert_eq!(search("team"), vec![1, 3]);
        assert_eq!(search(""), vec![1, 2, 3]);
        assert!(search("nothing").is_empty());
    }

    #[test]
    fn blank_search_is_inactive_and_matches_everything() {
        let records = vec![
            record(1, "Team A", Environment::LightSimulation, 2, None),
            record(2, "Platform", Environment::LightSimulation, 3, None),
        ];
        let filters = Filters {
            search: "   ".to_string(),
            ..Filters::default()
        };
        assert!(!filters.is_active());
        assert_eq!(ids(&group_by_environment(&records, &filters)[0]), vec![1, 2]);

        let padded = Filters {
            search: "  platform ".to_string(),
            ..Filters::default()
        };
        assert_eq!(ids(&group_by_environment(&records, &padded)[0]), vec![2]);
    }

    #[test]
    fn teams_are_distinct_in_first_seen_order() {
        let records = vec![
            record(1, "Team B", Environment::LightSimulation, 2, None),
            record(2, "Team A", Environment::HeavySimulation, 2, None),
            record(3, "Team B", Environment::PreExhibition, 2, None),
        ];
        assert_eq!(teams(&records), vec!["Team B".to_string(), "Team A".to_string()]);
    }
}
