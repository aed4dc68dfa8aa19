// src/domain/deadline.rs
use crate::domain::cases::{
    AlerteData, AlerteType, Audience, Avertissement, VoieDeRecours,
};
use chrono::{Days, NaiveDate};

/// Inclusive date range `[today, today + horizon]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DeadlineWindow {
    pub fn new(today: NaiveDate, horizon_days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: today,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    fn days_left(&self, due: NaiveDate) -> i64 {
        (due - self.start).num_days()
    }
}

/// A reminder the scanner wants to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineCandidate {
    pub type_alerte: AlerteType,
    pub reference_id: i64,
    pub affaire_id: Option<i64>,
    pub due: NaiveDate,
    pub message: String,
}

impl DeadlineCandidate {
    pub fn into_alerte(self) -> AlerteData {
        AlerteData {
            affaire_id: self.affaire_id,
            type_alerte: self.type_alerte,
            reference_id: self.reference_id,
            titre: self.type_alerte.title().to_string(),
            message: self.message,
            date_echeance: self.due,
            is_read: false,
        }
    }
}

pub fn avertissement_candidate(
    record: &Avertissement,
    window: &DeadlineWindow,
) -> Option<DeadlineCandidate> {
    if record.is_deleted() || !record.data.is_open() {
        return None;
    }
    let due = record.data.deadline()?;
    if !window.contains(due) {
        return None;
    }
    Some(DeadlineCandidate {
        type_alerte: AlerteType::AvertissementEcheance,
        reference_id: record.id,
        affaire_id: record.data.affaire_id,
        due,
        message: format!(
            "ينتهي أجل الإنذار الموجه إلى {} بتاريخ {} (متبقي {} يوم)",
            record.data.destinataire,
            due.format("%d/%m/%Y"),
            window.days_left(due)
        ),
    })
}

pub fn recours_candidate(
    record: &VoieDeRecours,
    window: &DeadlineWindow,
) -> Option<DeadlineCandidate> {
    if record.is_deleted() || !record.data.is_pending() {
        return None;
    }
    let due = record.data.deadline()?;
    if !window.contains(due) {
        return None;
    }
    Some(DeadlineCandidate {
        type_alerte: AlerteType::RecoursEcheance,
        reference_id: record.id,
        affaire_id: Some(record.data.affaire_id),
        due,
        message: format!(
            "آخر أجل لتقديم الطعن: {} (متبقي {} يوم)",
            due.format("%d/%m/%Y"),
            window.days_left(due)
        ),
    })
}

pub fn audience_candidate(
    record: &Audience,
    window: &DeadlineWindow,
) -> Option<DeadlineCandidate> {
    if record.is_deleted() || !record.data.is_pending() {
        return None;
    }
    let due = record.data.date_audience;
    if !window.contains(due) {
        return None;
    }
    let salle = record
        .data
        .salle
        .as_deref()
        .map(|s| format!(" - القاعة {s}"))
        .unwrap_or_default();
    Some(DeadlineCandidate {
        type_alerte: AlerteType::AudienceProche,
        reference_id: record.id,
        affaire_id: Some(record.data.affaire_id),
        due,
        message: format!("جلسة بتاريخ {}{salle}", due.format("%d/%m/%Y")),
    })
}
