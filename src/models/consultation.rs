use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Consultation lifecycle status. `Pending` and `Confirmed` come from the
/// lighter booking flow; the others from the full scheduling flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ConsultationStatus {
    Pending,
    Confirmed,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl ConsultationStatus {
    pub const ALL: [ConsultationStatus; 7] = [
        ConsultationStatus::Pending,
        ConsultationStatus::Confirmed,
        ConsultationStatus::Scheduled,
        ConsultationStatus::InProgress,
        ConsultationStatus::Completed,
        ConsultationStatus::Cancelled,
        ConsultationStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Confirmed => "confirmed",
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::InProgress => "in_progress",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
            ConsultationStatus::NoShow => "no_show",
        }
    }

    /// Statuses that still hold a booked slot in the future.
    pub fn is_open_booking(&self) -> bool {
        matches!(
            self,
            ConsultationStatus::Scheduled
                | ConsultationStatus::Pending
                | ConsultationStatus::Confirmed
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConsultationStatus::Completed
                | ConsultationStatus::Cancelled
                | ConsultationStatus::NoShow
        )
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsultationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConsultationStatus::Pending),
            "confirmed" => Ok(ConsultationStatus::Confirmed),
            "scheduled" => Ok(ConsultationStatus::Scheduled),
            "in_progress" | "in-progress" => Ok(ConsultationStatus::InProgress),
            "completed" => Ok(ConsultationStatus::Completed),
            "cancelled" => Ok(ConsultationStatus::Cancelled),
            "no_show" | "no-show" => Ok(ConsultationStatus::NoShow),
            other => Err(AppError::InvalidStatus {
                kind: "consultation",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ConsultationStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    Individual,
    Group,
}

/// Who attends. The variant is the consultation type, so a consultation can
/// never carry both a student and a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Participant {
    Individual { student_id: String },
    Group { group_id: String },
}

impl Participant {
    pub fn consultation_type(&self) -> ConsultationType {
        match self {
            Participant::Individual { .. } => ConsultationType::Individual,
            Participant::Group { .. } => ConsultationType::Group,
        }
    }

    pub fn student_id(&self) -> Option<&str> {
        match self {
            Participant::Individual { student_id } => Some(student_id),
            Participant::Group { .. } => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Participant::Group { group_id } => Some(group_id),
            Participant::Individual { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonReport {
    #[serde(default)]
    pub topics_covered: Vec<String>,
    #[serde(default)]
    pub homework: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ConsultationOutcome {
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub report: Option<LessonReport>,
}

/// Validated consultation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Consultation {
    pub id: String,
    pub teacher_id: String,
    pub participant: Participant,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: ConsultationStatus,
    pub subject: Option<String>,
    /// Minor currency units.
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub meeting_url: Option<String>,
    pub outcome: ConsultationOutcome,
}

impl Consultation {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + self.duration()
    }

    pub fn rating(&self) -> Option<u8> {
        self.outcome.rating
    }

    /// Completed while its window is still open. Staff may do this on purpose,
    /// so callers log it rather than reject the snapshot.
    pub fn completed_before_end(&self, now: DateTime<Utc>) -> bool {
        self.status == ConsultationStatus::Completed && self.ends_at() > now
    }
}

/// Consultation as it arrives from the marketplace API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationPayload {
    pub id: String,
    pub teacher_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(rename = "type", default)]
    pub consultation_type: Option<ConsultationType>,
    pub scheduled_at: DateTime<Utc>,
    pub duration: u32,
    pub status: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub report: Option<LessonReport>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub meeting_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_participant(
    consultation_type: Option<ConsultationType>,
    student_id: Option<String>,
    group_id: Option<String>,
) -> AppResult<Participant> {
    match (consultation_type, student_id, group_id) {
        (Some(ConsultationType::Individual) | None, Some(student_id), None) => {
            Ok(Participant::Individual { student_id })
        }
        (Some(ConsultationType::Group) | None, None, Some(group_id)) => {
            Ok(Participant::Group { group_id })
        }
        (_, Some(_), Some(_)) => Err(AppError::ValidationError(
            "consultation has both studentId and groupId".into(),
        )),
        (Some(ConsultationType::Individual), None, _) => Err(AppError::ValidationError(
            "individual consultation without studentId".into(),
        )),
        (Some(ConsultationType::Group), _, None) => Err(AppError::ValidationError(
            "group consultation without groupId".into(),
        )),
        (None, None, None) => Err(AppError::ValidationError(
            "consultation has neither studentId nor groupId".into(),
        )),
    }
}

impl TryFrom<ConsultationPayload> for Consultation {
    type Error = AppError;

    fn try_from(p: ConsultationPayload) -> AppResult<Self> {
        if p.id.trim().is_empty() {
            return Err(AppError::ValidationError("consultation id is empty".into()));
        }
        if p.teacher_id.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "consultation {} has no teacherId",
                p.id
            )));
        }
        if p.duration == 0 {
            return Err(AppError::ValidationError(format!(
                "consultation {} has zero duration",
                p.id
            )));
        }
        if let Some(rating) = p.rating
            && !(1..=5).contains(&rating)
        {
            return Err(AppError::ValidationError(format!(
                "consultation {} has rating {rating} outside 1..=5",
                p.id
            )));
        }
        if let Some(price) = p.price
            && price < 0
        {
            return Err(AppError::ValidationError(format!(
                "consultation {} has negative price",
                p.id
            )));
        }

        let status: ConsultationStatus = p.status.parse()?;
        let participant = resolve_participant(
            p.consultation_type,
            non_blank(p.student_id),
            non_blank(p.group_id),
        )?;

        Ok(Self {
            id: p.id,
            teacher_id: p.teacher_id,
            participant,
            scheduled_at: p.scheduled_at,
            duration_minutes: p.duration,
            status,
            subject: p.subject,
            price: p.price,
            currency: p.currency.map(|c| c.to_ascii_uppercase()),
            meeting_url: p.meeting_url,
            outcome: ConsultationOutcome {
                rating: p.rating,
                feedback: p.feedback,
                report: p.report,
            },
        })
    }
}

impl Consultation {
    /// Parses and validates one upstream JSON object.
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        let payload: ConsultationPayload = serde_json::from_value(value)
            .map_err(|e| AppError::ValidationError(format!("malformed consultation: {e}")))?;
        Self::try_from(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "id": "c-1",
            "teacherId": "t-1",
            "studentId": "s-1",
            "type": "individual",
            "scheduledAt": "2026-03-02T15:00:00Z",
            "duration": 60,
            "status": "scheduled",
            "subject": "Algebra"
        })
    }

    #[test]
    fn test_parse_individual_consultation() {
        let c = Consultation::from_json(payload()).unwrap();
        assert_eq!(c.status, ConsultationStatus::Scheduled);
        assert_eq!(
            c.participant,
            Participant::Individual {
                student_id: "s-1".into()
            }
        );
        assert_eq!(c.ends_at().to_rfc3339(), "2026-03-02T16:00:00+00:00");
        assert_eq!(c.rating(), None);
    }

    #[test]
    fn test_status_aliases_and_unknown() {
        assert_eq!(
            "in-progress".parse::<ConsultationStatus>().unwrap(),
            ConsultationStatus::InProgress
        );
        assert_eq!(
            "no_show".parse::<ConsultationStatus>().unwrap(),
            ConsultationStatus::NoShow
        );
        let err = "archived".parse::<ConsultationStatus>().unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus { kind: "consultation", .. }));

        let mut p = payload();
        p["status"] = json!("Scheduled");
        assert!(matches!(
            Consultation::from_json(p),
            Err(AppError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_status_serde_is_strict() {
        let s: ConsultationStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(s, ConsultationStatus::NoShow);
        assert!(serde_json::from_str::<ConsultationStatus>("\"unknown\"").is_err());
        assert_eq!(
            serde_json::to_string(&ConsultationStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn test_participant_must_match_type() {
        let mut p = payload();
        p["groupId"] = json!("g-1");
        assert!(Consultation::from_json(p).is_err());

        let mut p = payload();
        p["type"] = json!("group");
        assert!(Consultation::from_json(p).is_err());

        let mut p = payload();
        p.as_object_mut().unwrap().remove("type");
        p.as_object_mut().unwrap().remove("studentId");
        p["groupId"] = json!("g-7");
        let c = Consultation::from_json(p).unwrap();
        assert_eq!(c.participant.consultation_type(), ConsultationType::Group);
        assert_eq!(c.participant.group_id(), Some("g-7"));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut p = payload();
        p["duration"] = json!(0);
        assert!(Consultation::from_json(p).is_err());

        let mut p = payload();
        p["rating"] = json!(6);
        assert!(Consultation::from_json(p).is_err());

        let mut p = payload();
        p.as_object_mut().unwrap().remove("scheduledAt");
        assert!(Consultation::from_json(p).is_err());
    }

    #[test]
    fn test_completed_before_end() {
        let mut p = payload();
        p["status"] = json!("completed");
        let c = Consultation::from_json(p).unwrap();
        let during = c.scheduled_at + Duration::minutes(30);
        assert!(c.completed_before_end(during));
        assert!(!c.completed_before_end(c.ends_at()));
    }
}
