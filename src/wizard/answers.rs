//! Answer store — durable answers keyed by step, mutated only by the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use super::catalog::StepId;

/// Name and email confirmed on the contact-verification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub first_name: String,
    pub email: String,
}

impl ContactDetails {
    pub fn new(first_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            email: email.to_string(),
        }
    }
}

/// A recorded answer. The shape depends on the step kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Single choice, scale, free text, phone, and "Other" elaborations.
    Text(String),
    /// Multiple choice, in selection order.
    Selection(Vec<String>),
    Contact(ContactDetails),
}

/// Key into the store: a step, or the synthetic `"<id>_other"` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerKey {
    Step(StepId),
    Other(StepId),
}

impl std::fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step(id) => write!(f, "{id}"),
            Self::Other(id) => write!(f, "{id}_other"),
        }
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mapping from step to recorded answer. Insertion overwrites; no history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerStore {
    entries: BTreeMap<AnswerKey, Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: AnswerKey, value: Answer) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: AnswerKey) -> Option<&Answer> {
        self.entries.get(&key)
    }

    /// Text answer recorded for a step, if the answer is text.
    pub fn text(&self, step_id: StepId) -> Option<&str> {
        match self.get(AnswerKey::Step(step_id)) {
            Some(Answer::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Selection recorded for a step; empty when nothing was selected.
    pub fn selection(&self, step_id: StepId) -> &[String] {
        match self.get(AnswerKey::Step(step_id)) {
            Some(Answer::Selection(items)) => items,
            _ => &[],
        }
    }

    pub fn contact(&self, step_id: StepId) -> Option<&ContactDetails> {
        match self.get(AnswerKey::Step(step_id)) {
            Some(Answer::Contact(contact)) => Some(contact),
            _ => None,
        }
    }

    pub fn other_text(&self, step_id: StepId) -> Option<&str> {
        match self.get(AnswerKey::Other(step_id)) {
            Some(Answer::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites() {
        let mut store = AnswerStore::new();
        store.set(AnswerKey::Step(4), Answer::Text("Ja".into()));
        store.set(AnswerKey::Step(4), Answer::Text("Nein".into()));
        assert_eq!(store.text(4), Some("Nein"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn typed_getters_ignore_other_shapes() {
        let mut store = AnswerStore::new();
        store.set(AnswerKey::Step(1), Answer::Selection(vec!["PCOS".into()]));
        assert_eq!(store.text(1), None);
        assert_eq!(store.selection(1), ["PCOS".to_string()]);
        assert!(store.selection(2).is_empty());
        assert!(store.contact(1).is_none());
    }

    #[test]
    fn other_slot_is_separate_from_step() {
        let mut store = AnswerStore::new();
        store.set(AnswerKey::Step(5), Answer::Selection(vec!["Sonstige".into()]));
        store.set(AnswerKey::Other(5), Answer::Text("Schilddrüse".into()));
        assert_eq!(store.other_text(5), Some("Schilddrüse"));
        assert_eq!(store.selection(5).len(), 1);
    }

    #[test]
    fn serializes_as_flat_map_with_synthetic_keys() {
        let mut store = AnswerStore::new();
        store.set(AnswerKey::Step(3), Answer::Text("7".into()));
        store.set(AnswerKey::Step(5), Answer::Selection(vec!["Sonstige".into()]));
        store.set(AnswerKey::Other(5), Answer::Text("Gicht".into()));
        store.set(
            AnswerKey::Step(7),
            Answer::Contact(ContactDetails::new("Anna", "a@b.de")),
        );

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["3"], "7");
        assert_eq!(json["5"], serde_json::json!(["Sonstige"]));
        assert_eq!(json["5_other"], "Gicht");
        assert_eq!(json["7"]["firstName"], "Anna");
        assert_eq!(json["7"]["email"], "a@b.de");
    }

    #[test]
    fn answer_key_display() {
        assert_eq!(AnswerKey::Step(9).to_string(), "9");
        assert_eq!(AnswerKey::Other(5).to_string(), "5_other");
    }
}
