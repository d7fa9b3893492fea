// ---------------------------------------------------------------------------
// Item – one synthetic sample to classify
// ---------------------------------------------------------------------------

/// A single synthetic item. Every attribute lies in `[0, 1)` and is fixed at
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub lightning: f64,
    pub focus: f64,
    pub sharpness: f64,
    pub contrast: f64,
    pub saturation: f64,
}

impl Item {
    pub fn new(lightning: f64, focus: f64, sharpness: f64, contrast: f64, saturation: f64) -> Self {
        Self {
            lightning,
            focus,
            sharpness,
            contrast,
            saturation,
        }
    }

    /// Item with every attribute set to `value`.
    #[cfg(test)]
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value)
    }
}

// ---------------------------------------------------------------------------
// ItemSet – positional references into a Dataset
// ---------------------------------------------------------------------------

/// Indices into a [`Dataset`]. Items carry no key of their own, so the
/// position in the dataset is their identity.
pub type ItemSet = Vec<usize>;

// ---------------------------------------------------------------------------
// Dataset – the fixed population for one session
// ---------------------------------------------------------------------------

/// The population generated once per session. Read-only after creation.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Every item of the dataset, in order.
    pub fn all(&self) -> ItemSet {
        (0..self.items.len()).collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_position_in_order() {
        let ds = Dataset::from_items(vec![Item::uniform(0.1), Item::uniform(0.2), Item::uniform(0.3)]);
        assert_eq!(ds.all(), vec![0, 1, 2]);
        assert_eq!(ds.get(2), Some(&Item::uniform(0.3)));
        assert!(ds.get(3).is_none());
    }

    #[test]
    fn empty_dataset() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert!(ds.all().is_empty());
    }
}
