use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Record, lenient};
use crate::normalize;

/// One team on one day. The backend stores one row per team per day, ids
/// counting up day by day, so the day is recovered from the id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "ID_Équipe", default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(rename = "Nom_Équipe", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "Chef_Équipe", default, deserialize_with = "lenient::text")]
    pub leader: Option<String>,
    #[serde(rename = "Effectif", default, deserialize_with = "lenient::float")]
    pub staff: Option<f64>,
    #[serde(
        rename = "Nombre_Heures_Travaillées",
        default,
        deserialize_with = "lenient::float"
    )]
    pub hours_worked: Option<f64>,
    #[serde(rename = "Disponibilité", default, deserialize_with = "lenient::text")]
    pub availability: Option<String>,
}

impl TeamRecord {
    pub fn name_label(&self) -> &str {
        normalize::label(self.name.as_deref())
    }

    pub fn staff(&self) -> f64 {
        normalize::number(self.staff)
    }

    pub fn hours_worked(&self) -> f64 {
        normalize::number(self.hours_worked)
    }

    /// `floor((id - 1) / team_count) + 1`. A missing id counts as 0 and lands
    /// on day 0; a zero team count is treated as one team.
    pub fn day(
        &self,
        team_count: usize,
    ) -> i64 {
        let id = self.id.unwrap_or(0);
        let teams = i64::try_from(team_count.max(1)).unwrap_or(i64::MAX);
        id.saturating_sub(1).div_euclid(teams).saturating_add(1)
    }
}

impl Record for TeamRecord {
    const FIELDS: &'static [&'static str] = &[
        "ID_Équipe",
        "Nom_Équipe",
        "Chef_Équipe",
        "Effectif",
        "Nombre_Heures_Travaillées",
        "Disponibilité",
    ];
    const DEFAULT_SORT: &'static str = "ID_Équipe";

    fn field(
        &self,
        name: &str,
    ) -> Option<Value> {
        let value = match name {
            "ID_Équipe" => Value::from(self.id),
            "Nom_Équipe" => Value::from(self.name.clone()),
            "Chef_Équipe" => Value::from(self.leader.clone()),
            "Effectif" => Value::from(self.staff),
            "Nombre_Heures_Travaillées" => Value::from(self.hours_worked),
            "Disponibilité" => Value::from(self.availability.clone()),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::TeamRecord;

    fn team(id: Option<i64>) -> TeamRecord {
        TeamRecord {
            id,
            ..TeamRecord::default()
        }
    }

    #[test]
    fn day_buckets_follow_id_order() {
        assert_eq!(team(Some(1)).day(2), 1);
        assert_eq!(team(Some(2)).day(2), 1);
        assert_eq!(team(Some(3)).day(2), 2);
        assert_eq!(team(Some(7)).day(3), 3);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        assert_eq!(team(None).day(4), 0);
        assert_eq!(team(Some(5)).day(0), 5);
        assert_eq!(team(Some(i64::MIN)).day(1), i64::MIN + 1);
        assert_eq!(team(Some(i64::MAX)).day(1), i64::MAX);
    }
}
