use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::PROVISIONAL_EDIT_KIND;
use crate::instant;

/// Locales the notification consumer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing text keyed by locale. Construction always provides the
/// English entry, so resolution has a stable fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new(en: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Locale::En, en.into());
        Self(map)
    }

    pub fn bilingual(en: impl Into<String>, es: impl Into<String>) -> Self {
        Self::new(en).with(Locale::Es, es)
    }

    pub fn with(mut self, locale: Locale, text: impl Into<String>) -> Self {
        self.0.insert(locale, text.into());
        self
    }

    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0.get(&locale).map(String::as_str)
    }

    /// Requested locale, else English, else the first available entry.
    /// The map ordering makes "first" deterministic.
    pub fn resolve(&self, locale: Locale) -> &str {
        self.0
            .get(&locale)
            .or_else(|| self.0.get(&Locale::En))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Notification categories this engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ProvisionalEdit,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ProvisionalEdit => PROVISIONAL_EDIT_KIND,
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PROVISIONAL_EDIT_KIND {
            Ok(NotificationKind::ProvisionalEdit)
        } else {
            Err(format!("unknown notification kind {s:?}"))
        }
    }
}

/// A notification as built by the engine, before the store assigns its
/// identity. The wire field for `kind` is `type`, matching the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub product_sku: String,
    pub dispute_id: String,
    pub message: LocalizedText,
    pub status: String,
}

/// A stored notification. `id` and `created_at` are server-assigned at
/// insert so runner clock skew never leaks into the feed ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub product_sku: String,
    pub dispute_id: String,
    pub message: LocalizedText,
    pub status: String,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "instant::flexible")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Stamp a new notification with a fresh id and the current instant.
    /// Called by the store adapter at insert time.
    pub fn issue(new: NewNotification) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            kind: new.kind,
            product_sku: new.product_sku,
            dispute_id: new.dispute_id,
            message: new.message,
            status: new.status,
            read: false,
            created_at: Utc::now(),
        }
    }
}
