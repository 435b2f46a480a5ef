//! The persisted document: every user's habits and reminder times.

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use streak_core::habit::{normalize_name, ReminderTime};

/// Full store contents, keyed by chat id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub users: BTreeMap<i64, UserRecord>,
}

/// One user's habits and reminders.
///
/// Names are normalized on load, so a hand-edited document still matches
/// what the router and scheduler look up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub habits: HabitBook,
    /// Normalized habit name -> daily reminder time.
    #[serde(default, deserialize_with = "normalized_reminders")]
    pub reminders: BTreeMap<String, ReminderTime>,
}

fn normalized_reminders<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, ReminderTime>, D::Error> {
    let raw = BTreeMap::<String, ReminderTime>::deserialize(deserializer)?;
    let mut reminders = BTreeMap::new();
    for (name, time) in raw {
        reminders.entry(normalize_name(&name)).or_insert(time);
    }
    Ok(reminders)
}

/// A single habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub created: NaiveDate,
    #[serde(default)]
    pub done_dates: BTreeSet<NaiveDate>,
}

impl HabitRecord {
    pub fn new(created: NaiveDate) -> Self {
        Self {
            created,
            done_dates: BTreeSet::new(),
        }
    }

    /// Record a completion. Returns `false` if the day was already marked.
    pub fn mark(&mut self, day: NaiveDate) -> bool {
        self.done_dates.insert(day)
    }
}

/// Habits in insertion order, serialized as a JSON object.
///
/// Object key order in the document is the order habits were added, which is
/// the order they are listed back to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitBook(Vec<(String, HabitRecord)>);

impl HabitBook {
    pub fn get(&self, name: &str) -> Option<&HabitRecord> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut HabitRecord> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a habit. Returns `false` (and changes nothing) if the name exists.
    pub fn insert(&mut self, name: String, habit: HabitRecord) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.0.push((name, habit));
        true
    }

    /// Get a habit, appending one built by `create` if absent. The flag is
    /// `true` when the habit was created by this call.
    pub fn get_or_insert_with(
        &mut self,
        name: String,
        create: impl FnOnce() -> HabitRecord,
    ) -> (&mut HabitRecord, bool) {
        let (idx, created) = match self.0.iter().position(|(n, _)| *n == name) {
            Some(idx) => (idx, false),
            None => {
                self.0.push((name, create()));
                (self.0.len() - 1, true)
            }
        };
        (&mut self.0[idx].1, created)
    }

    /// Remove a habit, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<HabitRecord> {
        let idx = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HabitRecord)> {
        self.0.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for HabitBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, habit) in &self.0 {
            map.serialize_entry(name, habit)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HabitBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BookVisitor;

        impl<'de> Visitor<'de> for BookVisitor {
            type Value = HabitBook;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of habit name to habit")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HabitBook, A::Error> {
                let mut book = HabitBook::default();
                while let Some((name, habit)) = access.next_entry::<String, HabitRecord>()? {
                    // Names that normalize to the same key: first one wins.
                    book.insert(normalize_name(&name), habit);
                }
                Ok(book)
            }
        }

        deserializer.deserialize_map(BookVisitor)
    }
}
