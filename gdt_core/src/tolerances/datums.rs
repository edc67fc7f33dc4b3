//! Datum references and datum reference frames.

use serde::{Deserialize, Serialize};

use super::MaterialCondition;

/// One datum feature reference in a feature control frame (e.g. `B Ⓜ`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumReference {
    /// Datum feature letter, e.g. "A" or "A-B" for a common datum
    pub label: String,

    /// Modifier on the datum feature; RFS (RMB) when absent
    #[serde(default)]
    pub material_condition: MaterialCondition,
}

impl DatumReference {
    pub fn new(label: impl Into<String>) -> Self {
        DatumReference {
            label: label.into(),
            material_condition: MaterialCondition::Rfs,
        }
    }

    pub fn with_material_condition(mut self, material_condition: MaterialCondition) -> Self {
        self.material_condition = material_condition;
        self
    }
}

impl std::fmt::Display for DatumReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.material_condition.is_modifier() {
            write!(f, "{}({})", self.label, self.material_condition)
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// Position of a datum within the precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatumSlot {
    Primary,
    Secondary,
    Tertiary,
}

impl std::fmt::Display for DatumSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatumSlot::Primary => write!(f, "primary"),
            DatumSlot::Secondary => write!(f, "secondary"),
            DatumSlot::Tertiary => write!(f, "tertiary"),
        }
    }
}

/// An ordered, gap-free datum reference frame.
///
/// A primary datum always exists and a tertiary datum only exists alongside a
/// secondary one. Both are guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatumReferenceFrame {
    primary: DatumReference,
    secondary: Option<DatumReference>,
    tertiary: Option<DatumReference>,
}

impl DatumReferenceFrame {
    pub fn new(primary: DatumReference) -> Self {
        DatumReferenceFrame {
            primary,
            secondary: None,
            tertiary: None,
        }
    }

    /// Build a frame from three optional slots.
    ///
    /// Returns `Ok(None)` when all slots are empty and `Err(slot)` naming the
    /// first missing slot when precedence is broken (a secondary without a
    /// primary, or a tertiary without a secondary).
    pub fn from_slots(
        primary: Option<&DatumReference>,
        secondary: Option<&DatumReference>,
        tertiary: Option<&DatumReference>,
    ) -> Result<Option<Self>, DatumSlot> {
        match (primary, secondary, tertiary) {
            (None, None, None) => Ok(None),
            (None, _, _) => Err(DatumSlot::Primary),
            (Some(_), None, Some(_)) => Err(DatumSlot::Secondary),
            (Some(p), s, t) => Ok(Some(DatumReferenceFrame {
                primary: p.clone(),
                secondary: s.cloned(),
                tertiary: t.cloned(),
            })),
        }
    }

    pub fn primary(&self) -> &DatumReference {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&DatumReference> {
        self.secondary.as_ref()
    }

    pub fn tertiary(&self) -> Option<&DatumReference> {
        self.tertiary.as_ref()
    }

    /// Datums in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &DatumReference> {
        std::iter::once(&self.primary)
            .chain(self.secondary.as_ref())
            .chain(self.tertiary.as_ref())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false; a frame has at least a primary datum
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First label that appears more than once, if any
    pub fn duplicate_label(&self) -> Option<&str> {
        let labels: Vec<&str> = self.iter().map(|d| d.label.as_str()).collect();
        labels
            .iter()
            .enumerate()
            .find(|&(i, label)| labels[..i].contains(label))
            .map(|(_, label)| *label)
    }

    /// Datums referenced at MMC or LMC
    pub fn modified_datums(&self) -> impl Iterator<Item = &DatumReference> {
        self.iter().filter(|d| d.material_condition.is_modifier())
    }
}

impl std::fmt::Display for DatumReferenceFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", labels.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(label: &str) -> DatumReference {
        DatumReference::new(label)
    }

    #[test]
    fn test_empty_slots() {
        assert_eq!(DatumReferenceFrame::from_slots(None, None, None), Ok(None));
    }

    #[test]
    fn test_precedence_gaps() {
        let b = datum("B");
        let c = datum("C");
        let a = datum("A");
        assert_eq!(
            DatumReferenceFrame::from_slots(None, Some(&b), None),
            Err(DatumSlot::Primary)
        );
        assert_eq!(
            DatumReferenceFrame::from_slots(Some(&a), None, Some(&c)),
            Err(DatumSlot::Secondary)
        );
    }

    #[test]
    fn test_full_frame_display() {
        let a = datum("A");
        let b = datum("B").with_material_condition(MaterialCondition::Mmc);
        let c = datum("C");
        let frame = DatumReferenceFrame::from_slots(Some(&a), Some(&b), Some(&c))
            .unwrap()
            .unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.to_string(), "A|B(MMC)|C");
        assert_eq!(frame.modified_datums().count(), 1);
    }

    #[test]
    fn test_duplicate_label() {
        let a = datum("A");
        let frame = DatumReferenceFrame::from_slots(Some(&a), Some(&datum("B")), Some(&a))
            .unwrap()
            .unwrap();
        assert_eq!(frame.duplicate_label(), Some("A"));

        let clean = DatumReferenceFrame::new(datum("A"));
        assert_eq!(clean.duplicate_label(), None);
    }
}
