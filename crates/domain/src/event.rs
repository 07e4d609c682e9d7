use crate::date::{self, InvalidDateError};
use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use mongodb::bson::Document;

/// Storage schema fields that callers may not override through the opaque
/// `extra` field bag.
const RESERVED_FIELDS: [&str; 7] = [
    "_id", "id", "title", "date", "sortDate", "likes", "dislikes",
];

/// One tracked event. The store is schema-less beyond the fields named here:
/// anything else the caller supplied on create or update lives in `extra`
/// and is persisted opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub id: ID,
    pub title: String,
    /// `MM/DD/YYYY`, always zero-padded.
    pub date: String,
    /// `YYYY-MM-DD`, derived from `date` on every write that changes it.
    pub sort_date: String,
    pub likes: i64,
    pub dislikes: i64,
    pub extra: Document,
}

impl Entity for TrackedEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Caller input for creating a new event. The store mints the id and zeroes
/// both reaction counters.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    /// `M/D/YYYY`. The current local date is used when absent.
    pub date: Option<String>,
    /// Additional schema-less fields to persist alongside the event.
    pub extra: Document,
}

/// Partial update. Only the fields present here touch the stored record.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub extra: Document,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.extra.is_empty()
    }
}

/// The two reaction counters an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Likes,
    Dislikes,
}

impl ReactionKind {
    /// Permissive parse: an unknown kind yields `None` and the store treats
    /// the whole reaction as a no-op instead of an error.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "likes" => Some(Self::Likes),
            "dislikes" => Some(Self::Dislikes),
            _ => None,
        }
    }

    /// Name of the counter field in the stored document.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Dislikes => "dislikes",
        }
    }
}

impl TrackedEvent {
    /// Builds the record that `create` persists: counters zeroed, the date
    /// defaulted to `today` when absent, then validated and normalized.
    pub fn from_draft(draft: EventDraft, today: NaiveDate) -> Result<Self, InvalidDateError> {
        let raw = draft
            .date
            .unwrap_or_else(|| date::format_date(&today));
        let normalized = date::normalize(&raw)?;
        Ok(Self {
            id: ID::new(),
            title: draft.title,
            date: normalized.date,
            sort_date: normalized.sort_date,
            likes: 0,
            dislikes: 0,
            extra: strip_reserved(draft.extra),
        })
    }

    /// Applies the fields present in `patch`. A patched date is re-validated
    /// and the sort key recomputed; an untouched date leaves both as they
    /// are. Nothing is mutated when the patch turns out to be invalid.
    pub fn apply_patch(&mut self, patch: EventPatch) -> Result<(), InvalidDateError> {
        let normalized = match &patch.date {
            Some(raw) => Some(date::normalize(raw)?),
            None => None,
        };
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(normalized) = normalized {
            self.date = normalized.date;
            self.sort_date = normalized.sort_date;
        }
        for (key, value) in strip_reserved(patch.extra) {
            self.extra.insert(key, value);
        }
        Ok(())
    }

    /// Adjusts one reaction counter by one. Counters may go negative; no
    /// floor is enforced.
    pub fn apply_reaction(&mut self, kind: ReactionKind, increment: bool) {
        let delta: i64 = if increment { 1 } else { -1 };
        match kind {
            ReactionKind::Likes => self.likes += delta,
            ReactionKind::Dislikes => self.dislikes += delta,
        }
    }
}

/// Drops caller supplied keys that would shadow the event schema itself.
pub fn strip_reserved(mut extra: Document) -> Document {
    for field in &RESERVED_FIELDS {
        extra.remove(field);
    }
    extra
}

#[cfg(test)]
mod test {
    use super::*;
    use mongodb::bson::doc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd(2024, 3, 4)
    }

    #[test]
    fn draft_without_date_uses_today() {
        let draft = EventDraft {
            title: "launch party".into(),
            ..Default::default()
        };
        let event = TrackedEvent::from_draft(draft, today()).unwrap();
        assert_eq!(event.date, "03/04/2024");
        assert_eq!(event.sort_date, "2024-03-04");
    }

    #[test]
    fn draft_zeroes_both_counters() {
        let draft = EventDraft {
            title: "launch party".into(),
            date: Some("12/31/1999".into()),
            ..Default::default()
        };
        let event = TrackedEvent::from_draft(draft, today()).unwrap();
        assert_eq!(event.likes, 0);
        assert_eq!(event.dislikes, 0);
    }

    #[test]
    fn draft_strips_reserved_extra_fields() {
        let draft = EventDraft {
            title: "launch party".into(),
            extra: doc! { "venue": "Oslo", "likes": 99, "sortDate": "boom" },
            ..Default::default()
        };
        let event = TrackedEvent::from_draft(draft, today()).unwrap();
        assert_eq!(event.likes, 0);
        assert_eq!(event.extra, doc! { "venue": "Oslo" });
    }

    #[test]
    fn draft_rejects_malformed_dates() {
        let draft = EventDraft {
            title: "launch party".into(),
            date: Some("13/1/2024".into()),
            ..Default::default()
        };
        assert!(TrackedEvent::from_draft(draft, today()).is_err());
    }

    #[test]
    fn patch_without_date_leaves_sort_date() {
        let draft = EventDraft {
            title: "launch party".into(),
            date: Some("3/4/2024".into()),
            ..Default::default()
        };
        let mut event = TrackedEvent::from_draft(draft, today()).unwrap();
        event
            .apply_patch(EventPatch {
                title: Some("after party".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(event.title, "after party");
        assert_eq!(event.sort_date, "2024-03-04");
    }

    #[test]
    fn patch_with_date_recomputes_sort_date() {
        let draft = EventDraft {
            title: "launch party".into(),
            date: Some("3/4/2024".into()),
            ..Default::default()
        };
        let mut event = TrackedEvent::from_draft(draft, today()).unwrap();
        event
            .apply_patch(EventPatch {
                date: Some("1/9/2025".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(event.date, "01/09/2025");
        assert_eq!(event.sort_date, "2025-01-09");
    }

    #[test]
    fn invalid_patch_leaves_the_event_untouched() {
        let draft = EventDraft {
            title: "launch party".into(),
            date: Some("3/4/2024".into()),
            ..Default::default()
        };
        let mut event = TrackedEvent::from_draft(draft, today()).unwrap();
        let res = event.apply_patch(EventPatch {
            title: Some("after party".into()),
            date: Some("2/30/2024".into()),
            ..Default::default()
        });
        assert!(res.is_err());
        assert_eq!(event.title, "launch party");
        assert_eq!(event.date, "03/04/2024");
    }

    #[test]
    fn reactions_have_no_floor() {
        let draft = EventDraft {
            title: "launch party".into(),
            ..Default::default()
        };
        let mut event = TrackedEvent::from_draft(draft, today()).unwrap();
        event.apply_reaction(ReactionKind::Dislikes, false);
        assert_eq!(event.dislikes, -1);
        event.apply_reaction(ReactionKind::Likes, true);
        assert_eq!(event.likes, 1);
    }
}
